use crate::CLAP_STYLING;
use clap::{arg, command};

const FORMATS: [&str; 4] = ["text", "json", "markdown", "md"];

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("seoscope")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("seoscope")
        .about("On-page SEO auditing: extract, score and crawl web pages")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner and non-essential output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --"verbose" "Log debug output to stderr")
                .required(false)
                .global(true),
        )
        .subcommand_required(false)
        .subcommand(
            command!("analyze")
                .about("Audit a single page, fetched from a URL or read from a local HTML file")
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(false)
                        .help("The page to analyze. https:// is assumed when no scheme is given")
                        .conflicts_with("html-file"),
                )
                .arg(
                    arg!(--"html-file" <PATH>)
                        .required(false)
                        .help("Analyze a saved HTML file instead of fetching a URL")
                        .value_parser(clap::value_parser!(std::path::PathBuf))
                        .requires("base-url"),
                )
                .arg(
                    arg!(--"base-url" <URL>)
                        .required(false)
                        .help("URL the HTML file was served from, used to resolve relative links")
                        .requires("html-file"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json, markdown")
                        .value_parser(FORMATS)
                        .default_value("text"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)"),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("30"),
                ),
        )
        .subcommand(
            command!("crawl")
                .about(
                    "Audit a start page, then breadth-first crawl and audit the same-host pages \
                it links to.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(false)
                        .help("The start page to crawl")
                        .conflicts_with("hosts-file"),
                )
                .arg(
                    arg!(-H --"hosts-file" <PATH>)
                        .required(false)
                        .help("Path to a newline-delimited file of URLs to crawl")
                        .value_parser(clap::value_parser!(std::path::PathBuf))
                        .conflicts_with("url"),
                )
                .arg(
                    arg!(-m --"max-pages" <NUM_PAGES>)
                        .required(false)
                        .help("Maximum number of pages to audit per host, start page included")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("50"),
                )
                .arg(
                    arg!(-b --"batch-size" <NUM_REQUESTS>)
                        .required(false)
                        .help("Number of pages fetched concurrently")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("10"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, json, markdown")
                        .value_parser(FORMATS)
                        .default_value("text"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)"),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("30"),
                ),
        )
}

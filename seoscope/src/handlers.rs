use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use colored::Colorize;
use seoscope_core::crawl::{
    CrawlOptions, CrawlProgressCallback, DEFAULT_TIMEOUT_SECS, audit_html, execute_analysis,
    execute_crawl, generate_crawl_report,
};
use seoscope_core::report::{ReportFormat, render_report, save_report, score_grade};
use seoscope_scanner::SiteAudit;
use seoscope_scanner::crawler::{DEFAULT_BATCH_SIZE, DEFAULT_MAX_PAGES};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Trim, drop embedded whitespace and default to https:// when no scheme is given.
/// Returns `None` unless the result is an absolute URL with a host.
pub fn normalize_url(input: &str) -> Option<String> {
    let compact: String = input.split_whitespace().collect();
    if compact.is_empty() {
        return None;
    }

    let lower = compact.to_ascii_lowercase();
    let candidate = if lower.starts_with("http://") || lower.starts_with("https://") {
        compact
    } else {
        format!("https://{}", compact)
    };

    Url::parse(&candidate)
        .ok()
        .filter(|u| u.host_str().is_some_and(|h| !h.is_empty()))
        .map(|_| candidate)
}

/// Parse a single hosts-file line as a URL
pub fn parse_url_line(line: &str) -> Option<String> {
    let url = normalize_url(line);
    if url.is_none() {
        eprintln!("{}  Skipping invalid URL '{}'", "⚠".yellow(), line);
    }
    url
}

/// Load URLs from either a file or a single URL argument
pub fn load_urls_from_source(
    url: Option<&String>,
    hosts_file: Option<&PathBuf>,
) -> Result<Vec<String>, String> {
    if let Some(hosts_file_path) = hosts_file {
        load_urls_from_file(hosts_file_path)
    } else if let Some(url) = url {
        normalize_url(url)
            .map(|u| vec![u])
            .ok_or_else(|| format!("Invalid URL: {}", url))
    } else {
        Err("Either --url or --hosts-file must be provided".to_string())
    }
}

/// Load and parse URLs from a file
pub fn load_urls_from_file(path: &PathBuf) -> Result<Vec<String>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read hosts file {}: {}", path.display(), e))?;

    let urls: Vec<String> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter(|line| !line.trim_start().starts_with('#'))
        .filter_map(|line| parse_url_line(line.trim()))
        .collect();

    if urls.is_empty() {
        return Err(format!("No valid URLs found in {}", path.display()));
    }

    Ok(urls)
}

/// Read a saved page. Invalid UTF-8 is replaced rather than rejected.
pub fn read_html_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read HTML file {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn parse_format(value: Option<&String>) -> Result<ReportFormat> {
    let value = value.map(String::as_str).unwrap_or("text");
    ReportFormat::from_str(value).ok_or_else(|| anyhow!("Unknown report format '{}'", value))
}

/// Render `audits` and either print them or save them to `output`.
/// A leading `~` in `output` expands to the home directory.
pub fn write_report(
    audits: &[SiteAudit],
    format: ReportFormat,
    output: Option<&str>,
    quiet: bool,
) -> Result<()> {
    let content = render_report(audits, format).context("Failed to render report")?;

    match output {
        Some(path) => {
            let expanded = shellexpand::tilde(path);
            let path = Path::new(expanded.as_ref());
            save_report(&content, path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            if !quiet {
                println!(
                    "{} Report saved to {}",
                    "✓".green().bold(),
                    path.display().to_string().bright_white()
                );
            }
        }
        None => print!("{}", content),
    }
    Ok(())
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

fn print_score_line(audit: &SiteAudit) {
    let score = audit.report.score;
    let text = format!("{}/100", score);
    let text = match score {
        90..=100 => text.green().bold(),
        50..=89 => text.yellow().bold(),
        _ => text.red().bold(),
    };
    println!(
        "{} {} scored {} ({}), {} issues",
        "✓".green().bold(),
        audit.url.bright_white(),
        text,
        score_grade(score),
        audit.issues.len()
    );
}

pub async fn handle_analyze(sub_matches: &ArgMatches, quiet: bool) -> Result<()> {
    let format = parse_format(sub_matches.get_one::<String>("format"))?;
    let output = sub_matches.get_one::<String>("output").map(String::as_str);
    let timeout = *sub_matches
        .get_one::<u64>("timeout")
        .unwrap_or(&DEFAULT_TIMEOUT_SECS);
    // Keep stdout clean for machine-readable output
    let human_output = !quiet && (format == ReportFormat::Text || output.is_some());

    let audit = if let Some(html_file) = sub_matches.get_one::<PathBuf>("html-file") {
        let base_url = sub_matches
            .get_one::<String>("base-url")
            .context("--html-file requires --base-url")?;
        let base_url =
            normalize_url(base_url).ok_or_else(|| anyhow!("Invalid base URL: {}", base_url))?;
        debug!("Analyzing {} as {}", html_file.display(), base_url);

        let html = read_html_file(html_file)?;
        audit_html(&html, &base_url).map_err(|e| anyhow!(e))?
    } else {
        let url = sub_matches
            .get_one::<String>("url")
            .ok_or_else(|| anyhow!("Either --url or --html-file must be provided"))?;
        let url = normalize_url(url).ok_or_else(|| anyhow!("Invalid URL: {}", url))?;

        if human_output {
            println!("\n{} Analyzing {}\n", "→".blue(), url.bright_white());
        }
        execute_analysis(&url, timeout, !quiet)
            .await
            .map_err(|e| anyhow!(e))?
    };

    if human_output {
        print_score_line(&audit);
        println!();
    }

    write_report(std::slice::from_ref(&audit), format, output, quiet)
}

pub async fn handle_crawl(sub_matches: &ArgMatches, quiet: bool) -> Result<()> {
    let url = sub_matches.get_one::<String>("url");
    let hosts_file = sub_matches.get_one::<PathBuf>("hosts-file");
    let max_pages = *sub_matches
        .get_one::<usize>("max-pages")
        .unwrap_or(&DEFAULT_MAX_PAGES);
    let batch_size = *sub_matches
        .get_one::<usize>("batch-size")
        .unwrap_or(&DEFAULT_BATCH_SIZE);
    let timeout_secs = *sub_matches
        .get_one::<u64>("timeout")
        .unwrap_or(&DEFAULT_TIMEOUT_SECS);
    let format = parse_format(sub_matches.get_one::<String>("format"))?;
    let output = sub_matches.get_one::<String>("output").map(String::as_str);

    let urls = load_urls_from_source(url, hosts_file).map_err(|e| anyhow!(e))?;

    let human_output = !quiet && (format == ReportFormat::Text || output.is_some());
    if human_output {
        println!("\n🕷️  Crawling {} host(s)", urls.len());
        println!("Max pages: {}", max_pages);
        println!("Batch size: {}", batch_size);
        println!("Timeout: {}s\n", timeout_secs);
    }

    let options = CrawlOptions {
        urls,
        max_pages,
        batch_size,
        timeout_secs,
        show_progress_bars: !quiet,
    };

    let progress_callback: Option<CrawlProgressCallback> = if human_output {
        Some(Arc::new(|msg: String| {
            println!("{}", msg);
        }))
    } else {
        None
    };

    let audits = execute_crawl(options, progress_callback)
        .await
        .map_err(|e| anyhow!("Crawl failed: {}", e))?;

    if human_output {
        println!();
        print_divider();
        println!("{}", "  CRAWL COMPLETE".green().bold());
        print_divider();
        print!("{}", generate_crawl_report(&audits));
    }

    write_report(&audits, format, output, quiet)
}

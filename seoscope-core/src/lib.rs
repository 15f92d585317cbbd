pub mod crawl;
pub mod report;

use colored::Colorize;

const BANNER: &str = r#"

  ___  ___  ___  ___  ___ ___  _ __   ___
 / __|/ _ \/ _ \/ __|/ __/ _ \| '_ \ / _ \
 \__ \  __/ (_) \__ \ (_| (_) | |_) |  __/
 |___/\___|\___/|___/\___\___/| .__/ \___|
                              |_|
"#;

pub fn print_banner() {
    println!("{}", BANNER.bright_cyan().bold());
    println!(
        "  {} {}\n",
        "on-page SEO auditing".bright_white(),
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black()
    );
}

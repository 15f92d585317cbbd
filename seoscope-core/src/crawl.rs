use crate::report::{score_grade, severity_counts, total_issues};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use seoscope_scanner::crawler::{DEFAULT_BATCH_SIZE, DEFAULT_MAX_PAGES};
use seoscope_scanner::{PageFetcher, PageStatus, SiteAudit, SiteCrawler, analyze_html, audit};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::warn;
use url::Url;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Options for configuring a deep scan
pub struct CrawlOptions {
    pub urls: Vec<String>,
    pub max_pages: usize,
    pub batch_size: usize,
    pub timeout_secs: u64,
    pub show_progress_bars: bool,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            urls: Vec::new(),
            max_pages: DEFAULT_MAX_PAGES,
            batch_size: DEFAULT_BATCH_SIZE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            show_progress_bars: false,
        }
    }
}

/// Callback for reporting crawl progress
pub type CrawlProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() || path == "/" {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}

fn new_spinner(enabled: bool, message: String) -> Option<ProgressBar> {
    if !enabled {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message);
    Some(pb)
}

/// Audit HTML that is already in memory, e.g. a saved page.
pub fn audit_html(html: &str, base_url: &str) -> Result<SiteAudit, String> {
    let report = analyze_html(html, base_url).map_err(|e| e.to_string())?;
    let issues = audit(&report);
    Ok(SiteAudit {
        url: base_url.to_string(),
        report,
        issues,
        crawled_pages: Vec::new(),
    })
}

/// Fetch and audit a single page
pub async fn execute_analysis(
    url: &str,
    timeout_secs: u64,
    show_progress_bars: bool,
) -> Result<SiteAudit, String> {
    let progress_bar = new_spinner(show_progress_bars, format!("Analyzing {}...", url));

    let fetcher = PageFetcher::with_timeout(timeout_secs).map_err(|e| e.to_string())?;
    let result = SiteCrawler::new(fetcher)
        .analyze(url)
        .await
        .map_err(|e| format!("Failed to analyze {}: {}", url, e));

    if let Some(pb) = progress_bar {
        pb.finish_and_clear();
    }
    result
}

/// Execute a deep scan of every URL in `options`, one host at a time.
///
/// A host that cannot be scanned is reported through `progress_callback` and
/// skipped. Fails only when no host could be scanned at all.
pub async fn execute_crawl(
    options: CrawlOptions,
    progress_callback: Option<CrawlProgressCallback>,
) -> Result<Vec<SiteAudit>, String> {
    let CrawlOptions {
        urls,
        max_pages,
        batch_size,
        timeout_secs,
        show_progress_bars,
    } = options;

    if urls.is_empty() {
        return Err("No URLs to crawl".to_string());
    }

    let progress_bar = new_spinner(show_progress_bars, "Starting crawl...".to_string());
    let processed_count = Arc::new(AtomicUsize::new(0));

    let page_callback: seoscope_scanner::ProgressCallback = match progress_bar {
        Some(ref pb) => {
            let pb = pb.clone();
            let count = processed_count.clone();
            Arc::new(move |_index: usize, url: String| {
                let done = count.fetch_add(1, Ordering::Relaxed) + 1;
                pb.set_message(format!(
                    "Crawling... {} pages processed ({})",
                    done,
                    extract_url_path(&url)
                ));
            })
        }
        None => {
            let count = processed_count.clone();
            Arc::new(move |_index: usize, _url: String| {
                count.fetch_add(1, Ordering::Relaxed);
            })
        }
    };

    let fetcher = PageFetcher::with_timeout(timeout_secs).map_err(|e| e.to_string())?;
    let crawler = SiteCrawler::new(fetcher)
        .with_max_pages(max_pages)
        .with_batch_size(batch_size)
        .with_progress_callback(page_callback);

    let mut audits = Vec::new();
    let mut last_error = None;
    for (idx, url_str) in urls.iter().enumerate() {
        if let Some(ref callback) = progress_callback
            && urls.len() > 1
        {
            callback(format!(
                "Crawling host {}/{}: {}",
                idx + 1,
                urls.len(),
                url_str
            ));
        }

        match crawler.crawl(url_str).await {
            Ok(site) => audits.push(site),
            Err(e) => {
                warn!("Failed to crawl {}: {}", url_str, e);
                let message = format!("Failed to crawl {}: {}", url_str, e);
                if let Some(ref callback) = progress_callback {
                    callback(format!("[!]  {}", message));
                }
                last_error = Some(message);
            }
        }
    }

    if let Some(ref pb) = progress_bar {
        let total = processed_count.load(Ordering::Relaxed);
        pb.finish_with_message(format!("Crawl complete! {} pages processed", total));
    }

    match last_error {
        Some(e) if audits.is_empty() => Err(e),
        _ => Ok(audits),
    }
}

fn colored_score(score: u8) -> String {
    let text = format!("{:>3}", score);
    match score {
        90..=100 => text.green().to_string(),
        50..=89 => text.yellow().to_string(),
        _ => text.red().to_string(),
    }
}

/// Generate the terminal summary of one or more deep scans
pub fn generate_crawl_report(audits: &[SiteAudit]) -> String {
    let rows: Vec<_> = audits.iter().flat_map(|a| a.crawled_pages.iter()).collect();
    let scored: Vec<u8> = rows
        .iter()
        .filter(|r| r.status.is_ok())
        .map(|r| r.score)
        .collect();
    let failed = rows.len() - scored.len();

    let mut report = String::new();
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Hosts audited: {}\n", audits.len()));
    report.push_str(&format!("  Pages crawled: {}\n", rows.len()));
    if !scored.is_empty() {
        let average = scored.iter().map(|&s| usize::from(s)).sum::<usize>() / scored.len();
        report.push_str(&format!("  Average score: {}/100\n", average));
    }
    report.push_str(&format!("  Pages with errors: {}\n", failed));
    report.push_str(&format!("  Total issues: {}\n", total_issues(audits)));

    report.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    // Group by host, keeping the scans in a stable order
    let mut by_host: BTreeMap<String, Vec<&SiteAudit>> = BTreeMap::new();
    for site in audits {
        let host = Url::parse(&site.url)
            .ok()
            .and_then(|u| u.host_str().map(String::from))
            .unwrap_or_else(|| site.url.clone());
        by_host.entry(host).or_default().push(site);
    }

    for (host, sites) in by_host.iter() {
        for site in sites {
            let counts = severity_counts(&site.issues);
            report.push_str(&format!("## {}\n", host));
            report.push_str(&format!(
                "  Start page score: {}/100 ({})\n",
                site.report.score,
                score_grade(site.report.score)
            ));
            report.push_str(&format!(
                "  Issues: {} high, {} medium, {} low\n",
                counts.high, counts.medium, counts.low
            ));
            report.push_str(&format!("  {} pages crawled\n\n", site.crawled_pages.len()));

            for row in &site.crawled_pages {
                let path = extract_url_path(&row.url);
                let line = match row.status {
                    PageStatus::Ok(code) => {
                        let mut line = format!(
                            "  {} {} {}",
                            code.to_string().green(),
                            colored_score(row.score),
                            path
                        );
                        if row.issues > 0 {
                            line.push_str(&format!(
                                " {}",
                                format!("[{} issues]", row.issues).bright_black()
                            ));
                        }
                        line
                    }
                    PageStatus::Error(ref e) => {
                        format!("  {} {} {}", "ERR".red(), path, e.bright_black())
                    }
                };
                report.push_str(&line);
                report.push('\n');
            }
            report.push('\n');
        }
    }

    report
}

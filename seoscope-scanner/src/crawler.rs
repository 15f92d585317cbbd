use crate::audit::audit;
use crate::document::HtmlDocument;
use crate::error::{Result, ScanError};
use crate::extract::extract;
use crate::fetch::PageFetcher;
use crate::report::Report;
use crate::result::{CrawledPage, FetchedPage, SiteAudit};
use futures::future::join_all;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

pub const DEFAULT_MAX_PAGES: usize = 50;
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Runs the extractor over a fetched page, using its final URL as the base.
pub fn analyze_fetched(page: &FetchedPage) -> Result<Report> {
    let document = HtmlDocument::parse(&page.content).with_encoding(page.charset.clone());
    extract(&document, &page.final_url)
}

pub struct SiteCrawler {
    fetcher: PageFetcher,
    max_pages: usize,
    batch_size: usize,
    progress_callback: Option<ProgressCallback>,
}

impl SiteCrawler {
    pub fn new(fetcher: PageFetcher) -> Self {
        Self {
            fetcher,
            max_pages: DEFAULT_MAX_PAGES,
            batch_size: DEFAULT_BATCH_SIZE,
            progress_callback: None,
        }
    }

    /// Upper bound on crawled pages, start page included.
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Number of pages fetched concurrently.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Fetches and audits a single page.
    pub async fn analyze(&self, url: &str) -> Result<SiteAudit> {
        let (page, report) = self.fetch_start_page(url).await?;
        let issues = audit(&report);

        Ok(SiteAudit {
            url: page.final_url,
            report,
            issues,
            crawled_pages: Vec::new(),
        })
    }

    /// Audits `start_url`, then every same-host page reachable from it,
    /// breadth first, until `max_pages` rows exist or nothing is left to visit.
    ///
    /// Only a failure on the start page is an error. Later pages that cannot
    /// be fetched show up as error rows.
    pub async fn crawl(&self, start_url: &str) -> Result<SiteAudit> {
        info!(
            "Starting deep scan of {} (max {} pages, batch size {})",
            start_url, self.max_pages, self.batch_size
        );

        let (page, report) = self.fetch_start_page(start_url).await?;
        let issues = audit(&report);
        let start_host = Url::parse(&page.final_url)
            .ok()
            .and_then(|u| u.host_str().map(String::from))
            .ok_or_else(|| ScanError::InvalidUrl(format!("{} has no host", page.final_url)))?;

        let mut crawled_pages = vec![CrawledPage::new(
            page.final_url.clone(),
            page.status_code,
            &report,
            issues.clone(),
        )];

        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(start_url.to_string());
        visited.insert(page.final_url.clone());

        let mut queue: VecDeque<String> = VecDeque::new();
        for url in &report.link_audit.internal_urls {
            if visited.insert(url.clone()) {
                queue.push_back(url.clone());
            }
        }

        let mut started = 1;
        while !queue.is_empty() && crawled_pages.len() < self.max_pages {
            let room = self.max_pages - crawled_pages.len();
            let take = self.batch_size.min(room).min(queue.len());
            let batch: Vec<String> = queue.drain(..take).collect();
            debug!("Crawling batch of {} ({} still queued)", batch.len(), queue.len());

            let mut handles = Vec::with_capacity(batch.len());
            for url in batch {
                if let Some(ref callback) = self.progress_callback {
                    callback(started, url.clone());
                }
                started += 1;

                let fetcher = self.fetcher.clone();
                handles.push(tokio::spawn(async move { scan_page(&fetcher, url).await }));
            }

            for outcome in join_all(handles).await {
                let (row, discovered) = outcome?;
                crawled_pages.push(row);

                for url in discovered {
                    if is_on_host(&url, &start_host) && visited.insert(url.clone()) {
                        queue.push_back(url);
                    }
                }
            }
        }

        info!(
            "Deep scan complete. Crawled {} pages, {} left unvisited",
            crawled_pages.len(),
            queue.len()
        );

        Ok(SiteAudit {
            url: page.final_url,
            report,
            issues,
            crawled_pages,
        })
    }

    async fn fetch_start_page(&self, url: &str) -> Result<(FetchedPage, Report)> {
        if let Some(ref callback) = self.progress_callback {
            callback(0, url.to_string());
        }
        let page = self.fetcher.fetch(url).await?;
        let report = analyze_fetched(&page)?;
        Ok((page, report))
    }
}

/// Fetches and audits one discovered page. Returns its row and its own crawl candidates.
async fn scan_page(fetcher: &PageFetcher, url: String) -> (CrawledPage, Vec<String>) {
    let page = match fetcher.fetch(&url).await {
        Ok(page) => page,
        Err(e) => {
            warn!("Crawl error for {}: {}", url, e);
            return (CrawledPage::with_error(url, e.to_string()), Vec::new());
        }
    };

    match analyze_fetched(&page) {
        Ok(report) => {
            let issues = audit(&report);
            let discovered = report.link_audit.internal_urls.clone();
            (CrawledPage::new(url, page.status_code, &report, issues), discovered)
        }
        Err(e) => {
            warn!("Could not analyze {}: {}", url, e);
            (CrawledPage::with_error(url, e.to_string()), Vec::new())
        }
    }
}

fn is_on_host(url: &str, host: &str) -> bool {
    Url::parse(url)
        .ok()
        .is_some_and(|u| u.host_str() == Some(host))
}

pub mod audit;
pub mod crawler;
pub mod document;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod report;
pub mod result;
pub mod score;
pub mod stopwords;

pub use audit::{IssueKind, SeoIssue, Severity, audit};
pub use crawler::{ProgressCallback, SiteCrawler, analyze_fetched};
pub use document::{DocumentTree, ElementView, HtmlDocument};
pub use error::ScanError;
pub use extract::{analyze_html, extract};
pub use fetch::{FetcherConfig, PageFetcher};
pub use report::Report;
pub use result::{CrawledPage, FetchedPage, PageStatus, SiteAudit};

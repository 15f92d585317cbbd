use crate::audit::SeoIssue;
use crate::report::Report;
use serde::{Deserialize, Serialize};

/// A successfully fetched HTML page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchedPage {
    pub content: String,
    /// URL after redirects.
    pub final_url: String,
    pub status_code: u16,
    pub content_type: Option<String>,
    pub charset: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    Ok(u16),
    Error(String),
}

impl PageStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, PageStatus::Ok(_))
    }
}

/// One row of a deep scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawledPage {
    pub url: String,
    pub status: PageStatus,
    pub score: u8,
    pub issues: usize,
    pub title: Option<String>,
    pub issue_details: Vec<SeoIssue>,
}

impl CrawledPage {
    pub fn new(url: String, status_code: u16, report: &Report, issue_details: Vec<SeoIssue>) -> Self {
        Self {
            url,
            status: PageStatus::Ok(status_code),
            score: report.score,
            issues: issue_details.len(),
            title: report.meta_tags.title.clone(),
            issue_details,
        }
    }

    pub fn with_error(url: String, error: String) -> Self {
        Self {
            url,
            status: PageStatus::Error(error),
            score: 0,
            issues: 1,
            title: None,
            issue_details: Vec::new(),
        }
    }
}

/// Analysis of a start page, plus every page reached by a deep scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteAudit {
    pub url: String,
    pub report: Report,
    pub issues: Vec<SeoIssue>,
    pub crawled_pages: Vec<CrawledPage>,
}

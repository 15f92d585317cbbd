// Diagnostic checks over an extracted report. Issues explain a score; they do not change it.

use crate::report::Report;
use crate::score::{TITLE_MAX_CHARS, TITLE_MIN_CHARS};
use serde::{Deserialize, Serialize};

pub const DESCRIPTION_MIN_CHARS: usize = 50;
pub const DESCRIPTION_MAX_CHARS: usize = 160;
pub const THIN_CONTENT_WORDS: usize = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    Title,
    Description,
    H1,
    Images,
    Content,
    Canonical,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::Title => "title",
            IssueKind::Description => "description",
            IssueKind::H1 => "h1",
            IssueKind::Images => "images",
            IssueKind::Content => "content",
            IssueKind::Canonical => "canonical",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeoIssue {
    pub kind: IssueKind,
    pub label: String,
    pub description: String,
    pub severity: Severity,
}

impl SeoIssue {
    fn new(kind: IssueKind, severity: Severity, label: &str, description: String) -> Self {
        Self {
            kind,
            label: label.to_string(),
            description,
            severity,
        }
    }
}

pub fn check_title(report: &Report) -> Option<SeoIssue> {
    let Some(title) = report.meta_tags.title.as_deref() else {
        return Some(SeoIssue::new(
            IssueKind::Title,
            Severity::High,
            "Missing Title Tag",
            "The page title is missing, which is critical for SEO.".to_string(),
        ));
    };

    let length = title.chars().count();
    if length > TITLE_MAX_CHARS {
        Some(SeoIssue::new(
            IssueKind::Title,
            Severity::Medium,
            "Title Too Long",
            format!("Title is {} chars (recommended: < {}).", length, TITLE_MAX_CHARS),
        ))
    } else if length < TITLE_MIN_CHARS {
        Some(SeoIssue::new(
            IssueKind::Title,
            Severity::Medium,
            "Title Too Short",
            format!("Title is {} chars, too short to be descriptive.", length),
        ))
    } else {
        None
    }
}

pub fn check_description(report: &Report) -> Option<SeoIssue> {
    let Some(description) = report.meta_tags.description.as_deref() else {
        return Some(SeoIssue::new(
            IssueKind::Description,
            Severity::High,
            "Missing Meta Description",
            "Meta description is missing, impacting click-through rates.".to_string(),
        ));
    };

    let length = description.chars().count();
    if length > DESCRIPTION_MAX_CHARS {
        Some(SeoIssue::new(
            IssueKind::Description,
            Severity::Low,
            "Description Too Long",
            format!(
                "Meta description is {} chars and exceeds {}.",
                length, DESCRIPTION_MAX_CHARS
            ),
        ))
    } else if length < DESCRIPTION_MIN_CHARS {
        Some(SeoIssue::new(
            IssueKind::Description,
            Severity::Medium,
            "Description Too Short",
            format!(
                "Meta description is {} chars (recommended: at least {}).",
                length, DESCRIPTION_MIN_CHARS
            ),
        ))
    } else {
        None
    }
}

pub fn check_h1(report: &Report) -> Option<SeoIssue> {
    match report.headings.h1.len() {
        0 => Some(SeoIssue::new(
            IssueKind::H1,
            Severity::High,
            "Missing H1 Heading",
            "No H1 tag found. Use one H1 for the main title.".to_string(),
        )),
        1 => None,
        count => Some(SeoIssue::new(
            IssueKind::H1,
            Severity::Medium,
            "Multiple H1 Tags",
            format!("Found {} H1 tags. Use only one per page.", count),
        )),
    }
}

pub fn check_images(report: &Report) -> Option<SeoIssue> {
    let missing = report.image_audit.without_alt;
    (missing > 0).then(|| {
        SeoIssue::new(
            IssueKind::Images,
            Severity::Medium,
            "Missing Alt Text",
            format!("{} of {} images are missing alt text.", missing, report.image_audit.total),
        )
    })
}

pub fn check_content(report: &Report) -> Option<SeoIssue> {
    (report.word_count < THIN_CONTENT_WORDS).then(|| {
        SeoIssue::new(
            IssueKind::Content,
            Severity::Medium,
            "Thin Content",
            format!(
                "Word count is {} (recommended: > {}).",
                report.word_count, THIN_CONTENT_WORDS
            ),
        )
    })
}

pub fn check_canonical(report: &Report) -> Option<SeoIssue> {
    report.meta_tags.canonical.is_none().then(|| {
        SeoIssue::new(
            IssueKind::Canonical,
            Severity::Low,
            "Missing Canonical Tag",
            "Canonical tag is missing.".to_string(),
        )
    })
}

/// Runs every check, in a fixed order.
pub fn audit(report: &Report) -> Vec<SeoIssue> {
    [
        check_title(report),
        check_description(report),
        check_h1(report),
        check_images(report),
        check_content(report),
        check_canonical(report),
    ]
    .into_iter()
    .flatten()
    .collect()
}

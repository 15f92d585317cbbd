// Report rendering for site audits

use seoscope_scanner::report::Report;
use seoscope_scanner::{PageStatus, SeoIssue, Severity, SiteAudit};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const RULE: &str =
    "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";
const THIN_RULE: &str =
    "────────────────────────────────────────────────────────────────────────────────";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Markdown,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityCounts {
    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }
}

pub fn severity_counts(issues: &[SeoIssue]) -> SeverityCounts {
    let mut counts = SeverityCounts::default();
    for issue in issues {
        match issue.severity {
            Severity::High => counts.high += 1,
            Severity::Medium => counts.medium += 1,
            Severity::Low => counts.low += 1,
        }
    }
    counts
}

/// Issues found by a run. A deep scan counts every crawled page, a single-page
/// audit counts its own issues.
pub fn total_issues(audits: &[SiteAudit]) -> usize {
    audits
        .iter()
        .map(|a| {
            if a.crawled_pages.is_empty() {
                a.issues.len()
            } else {
                a.crawled_pages.iter().map(|p| p.issues).sum()
            }
        })
        .sum()
}

/// Buckets a 0-100 score the way page audits are usually graded.
pub fn score_grade(score: u8) -> &'static str {
    match score {
        90..=100 => "good",
        50..=89 => "needs improvement",
        _ => "poor",
    }
}

/// Render every audit in the requested format.
pub fn render_report(audits: &[SiteAudit], format: ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(audits
            .iter()
            .map(generate_text_report)
            .collect::<Vec<_>>()
            .join("\n")),
        ReportFormat::Markdown => Ok(audits
            .iter()
            .map(generate_markdown_report)
            .collect::<Vec<_>>()
            .join("\n---\n\n")),
        ReportFormat::Json => generate_json_report(audits),
    }
}

pub fn generate_text_report(audit: &SiteAudit) -> String {
    let report = &audit.report;
    let mut out = String::new();

    // Header
    out.push_str(RULE);
    out.push('\n');
    out.push_str("                            SEOSCOPE PAGE AUDIT\n");
    out.push_str(RULE);
    out.push_str("\n\n");

    out.push_str(&format!("URL:          {}\n", audit.url));
    out.push_str(&format!(
        "Score:        {}/100 ({})\n",
        report.score,
        score_grade(report.score)
    ));
    out.push_str(&format!("Word count:   {}\n", report.word_count));
    out.push('\n');

    section(&mut out, "META TAGS");
    let meta = &report.meta_tags;
    field(&mut out, "Title", meta.title.as_deref());
    field(&mut out, "Description", meta.description.as_deref());
    field(&mut out, "Keywords", meta.keywords.as_deref());
    field(&mut out, "Robots", meta.robots.as_deref());
    field(&mut out, "Canonical", meta.canonical.as_deref());
    field(&mut out, "Charset", meta.charset.as_deref());
    field(&mut out, "Viewport", meta.viewport.as_deref());
    out.push('\n');

    section(&mut out, "SOCIAL TAGS");
    let social = &report.social_tags;
    field(&mut out, "og:title", social.og_title.as_deref());
    field(&mut out, "og:description", social.og_description.as_deref());
    field(&mut out, "og:image", social.og_image.as_deref());
    field(&mut out, "twitter:card", social.twitter_card.as_deref());
    field(&mut out, "twitter:title", social.twitter_title.as_deref());
    field(&mut out, "twitter:description", social.twitter_description.as_deref());
    field(&mut out, "twitter:image", social.twitter_image.as_deref());
    out.push('\n');

    section(&mut out, "HEADINGS");
    for level in 1..=6 {
        let headings = report.headings.level(level);
        out.push_str(&format!("H{}: {}\n", level, headings.len()));
        for heading in headings {
            out.push_str(&format!("  - {}\n", heading));
        }
    }
    out.push('\n');

    section(&mut out, "IMAGES & LINKS");
    let images = &report.image_audit;
    out.push_str(&format!(
        "Images:       {} total, {} with alt, {} without alt\n",
        images.total, images.with_alt, images.without_alt
    ));
    let links = &report.link_audit;
    out.push_str(&format!(
        "Links:        {} total, {} internal, {} external\n",
        links.total, links.internal, links.external
    ));
    out.push('\n');

    if !report.keywords.is_empty() {
        section(&mut out, "TOP KEYWORDS");
        out.push_str("  Keyword              Count  Density  Title  Desc  H1\n");
        for keyword in &report.keywords {
            out.push_str(&format!(
                "  {:<20} {:>5}  {:>6.2}%  {:<5}  {:<4}  {}\n",
                keyword.word,
                keyword.count,
                keyword.density,
                yes_no(keyword.in_title),
                yes_no(keyword.in_description),
                yes_no(keyword.in_h1)
            ));
        }
        out.push('\n');
    }

    let counts = severity_counts(&audit.issues);
    section(&mut out, "ISSUES");
    out.push_str(&format!("Total Issues: {}\n\n", counts.total()));
    for (idx, issue) in audit.issues.iter().enumerate() {
        out.push_str(&format!(
            "[{}] [{}] {}\n",
            idx + 1,
            issue.severity.as_str().to_uppercase(),
            issue.label
        ));
        out.push_str(&wrap_text(&issue.description, 80, "  "));
        out.push('\n');
    }

    if !audit.crawled_pages.is_empty() {
        section(&mut out, "CRAWLED PAGES");
        for page in &audit.crawled_pages {
            match page.status {
                PageStatus::Ok(code) => out.push_str(&format!(
                    "  {} {:>3}/100  {:>2} issues  {}\n",
                    code, page.score, page.issues, page.url
                )),
                PageStatus::Error(ref e) => {
                    out.push_str(&format!("  ERR   0/100          {}\n", page.url));
                    out.push_str(&wrap_text(e, 80, "        "));
                }
            }
        }
        out.push('\n');
    }

    out.push_str(THIN_RULE);
    out.push('\n');
    out.push_str(&format!("Generated by seoscope {}\n", env!("CARGO_PKG_VERSION")));

    out
}

pub fn generate_markdown_report(audit: &SiteAudit) -> String {
    let report = &audit.report;
    let mut out = String::new();

    out.push_str(&format!("# SEO audit: {}\n\n", audit.url));
    out.push_str(&format!(
        "**Score:** {}/100 ({})  \n**Word count:** {}\n\n",
        report.score,
        score_grade(report.score),
        report.word_count
    ));

    out.push_str("## Meta tags\n\n| Tag | Value |\n| --- | --- |\n");
    let meta = &report.meta_tags;
    for (name, value) in [
        ("title", &meta.title),
        ("description", &meta.description),
        ("keywords", &meta.keywords),
        ("robots", &meta.robots),
        ("canonical", &meta.canonical),
        ("charset", &meta.charset),
        ("viewport", &meta.viewport),
    ] {
        out.push_str(&format!("| {} | {} |\n", name, md_cell(value.as_deref())));
    }
    out.push('\n');

    out.push_str("## Social tags\n\n| Tag | Value |\n| --- | --- |\n");
    let social = &report.social_tags;
    for (name, value) in [
        ("og:title", &social.og_title),
        ("og:description", &social.og_description),
        ("og:image", &social.og_image),
        ("twitter:card", &social.twitter_card),
        ("twitter:title", &social.twitter_title),
        ("twitter:description", &social.twitter_description),
        ("twitter:image", &social.twitter_image),
    ] {
        out.push_str(&format!("| {} | {} |\n", name, md_cell(value.as_deref())));
    }
    out.push('\n');

    out.push_str("## Headings\n\n");
    for level in 1..=6 {
        out.push_str(&format!(
            "- **H{}** ({})",
            level,
            report.headings.level(level).len()
        ));
        let headings = report.headings.level(level);
        if !headings.is_empty() {
            out.push_str(&format!(": {}", headings.join(" · ")));
        }
        out.push('\n');
    }
    out.push('\n');

    out.push_str(&markdown_audits(report));

    out.push_str("## Issues\n\n");
    if audit.issues.is_empty() {
        out.push_str("No issues found.\n\n");
    } else {
        for issue in &audit.issues {
            out.push_str(&format!(
                "- **{}** ({}): {}\n",
                issue.label,
                issue.severity.as_str(),
                issue.description
            ));
        }
        out.push('\n');
    }

    if !audit.crawled_pages.is_empty() {
        out.push_str("## Crawled pages\n\n| URL | Status | Score | Issues |\n| --- | --- | --- | --- |\n");
        for page in &audit.crawled_pages {
            let status = match page.status {
                PageStatus::Ok(code) => code.to_string(),
                PageStatus::Error(ref e) => format!("error: {}", md_escape(e)),
            };
            out.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                page.url, status, page.score, page.issues
            ));
        }
        out.push('\n');
    }

    out
}

fn markdown_audits(report: &Report) -> String {
    let mut out = String::new();
    let images = &report.image_audit;
    let links = &report.link_audit;

    out.push_str("## Images and links\n\n");
    out.push_str(&format!(
        "- Images: {} total, {} with alt, {} without alt\n",
        images.total, images.with_alt, images.without_alt
    ));
    out.push_str(&format!(
        "- Links: {} total, {} internal, {} external\n\n",
        links.total, links.internal, links.external
    ));

    if !report.keywords.is_empty() {
        out.push_str("## Keywords\n\n| Keyword | Count | Density | Title | Description | H1 |\n");
        out.push_str("| --- | --- | --- | --- | --- | --- |\n");
        for k in &report.keywords {
            out.push_str(&format!(
                "| {} | {} | {:.2}% | {} | {} | {} |\n",
                k.word,
                k.count,
                k.density,
                yes_no(k.in_title),
                yes_no(k.in_description),
                yes_no(k.in_h1)
            ));
        }
        out.push('\n');
    }

    out
}

pub fn generate_json_report(audits: &[SiteAudit]) -> Result<String, serde_json::Error> {
    let pages_crawled: usize = audits.iter().map(|a| a.crawled_pages.len()).sum();

    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "seoscope",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "summary": {
                "targets": audits.iter().map(|a| a.url.as_str()).collect::<Vec<_>>(),
                "pages_crawled": pages_crawled,
                "total_issues": total_issues(audits)
            },
            "audits": audits
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

fn section(out: &mut String, title: &str) {
    out.push_str(RULE);
    out.push('\n');
    out.push_str(title);
    out.push('\n');
    out.push_str(RULE);
    out.push_str("\n\n");
}

fn field(out: &mut String, name: &str, value: Option<&str>) {
    out.push_str(&format!("{:<20} {}\n", format!("{}:", name), value.unwrap_or("-")));
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn md_escape(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

fn md_cell(value: Option<&str>) -> String {
    value.map(md_escape).unwrap_or_else(|| "_missing_".to_string())
}

pub fn wrap_text(text: &str, width: usize, indent: &str) -> String {
    let mut result = String::new();
    let mut current_line = String::new();
    let limit = width.saturating_sub(indent.len()).max(1);

    for word in text.split_whitespace() {
        if !current_line.is_empty() && current_line.len() + word.len() + 1 > limit {
            result.push_str(indent);
            result.push_str(&current_line);
            result.push('\n');
            current_line.clear();
        }

        if !current_line.is_empty() {
            current_line.push(' ');
        }
        current_line.push_str(word);
    }

    if !current_line.is_empty() {
        result.push_str(indent);
        result.push_str(&current_line);
        result.push('\n');
    }

    result
}

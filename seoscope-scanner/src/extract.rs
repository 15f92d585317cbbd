//! Single-pass on-page SEO extraction.
//!
//! Structural fields (metadata, headings, images, links) are read from the
//! untouched document. Keyword statistics come from a second, filtered text
//! view with code and markup subtrees left out, so nothing is mutated and the
//! order of the two phases does not matter.

use crate::document::{DocumentTree, ElementView, HtmlDocument};
use crate::error::{Result, ScanError};
use crate::report::{
    Headings, ImageAudit, ImageSample, KeywordStat, LinkAudit, MetaTags, Report, SocialTags,
};
use crate::score::compute_score;
use crate::stopwords::is_stop_word;
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};
use url::Url;

pub const MAX_KEYWORDS: usize = 10;
pub const MAX_IMAGE_SAMPLES: usize = 10;
pub const MIN_WORD_CHARS: usize = 3;

/// Subtrees that never contribute to keyword statistics.
pub const NON_CONTENT_TAGS: &[&str] = &[
    "script", "style", "noscript", "iframe", "code", "pre", "svg", "link", "meta", "template",
];

/// Paths with these extensions are resources, not pages.
pub const ASSET_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "css", "js", "pdf", "svg", "ico", "xml",
];

/// Parses `html` and extracts a [`Report`] for the page at `base_url`.
pub fn analyze_html(html: &str, base_url: &str) -> Result<Report> {
    extract(&HtmlDocument::parse(html), base_url)
}

/// Extracts a [`Report`] from an already parsed document.
///
/// Fails only when `base_url` is not an absolute URL. Anything missing or
/// malformed inside the document yields an absent or zero value instead.
pub fn extract<D: DocumentTree + ?Sized>(document: &D, base_url: &str) -> Result<Report> {
    let base = parse_base_url(base_url)?;

    let meta_tags = extract_meta_tags(document);
    let social_tags = extract_social_tags(document);
    let headings = extract_headings(document);
    let image_audit = extract_images(document);
    let link_audit = extract_links(document, &base);

    let (keywords, word_count) = extract_keywords(
        document,
        meta_tags.title.as_deref(),
        meta_tags.description.as_deref(),
        &headings.h1,
    );

    let score = compute_score(&meta_tags, &headings, &image_audit);
    debug!(
        "Extracted {}: score {}, {} words, {} links ({} internal)",
        base, score, word_count, link_audit.total, link_audit.internal
    );

    Ok(Report {
        meta_tags,
        social_tags,
        headings,
        image_audit,
        link_audit,
        keywords,
        word_count,
        score,
    })
}

fn parse_base_url(base_url: &str) -> Result<Url> {
    let base = Url::parse(base_url.trim())
        .map_err(|e| ScanError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
    if base.cannot_be_a_base() {
        return Err(ScanError::InvalidBaseUrl(format!(
            "{}: cannot resolve relative links against this URL",
            base_url
        )));
    }
    Ok(base)
}

pub fn extract_meta_tags<D: DocumentTree + ?Sized>(document: &D) -> MetaTags {
    let metas = document.elements_by_tag("meta");
    let named = |key: &str| meta_content(&metas, key, "name", "property");

    let canonical = document
        .elements_by_tag("link")
        .into_iter()
        .filter(|link| {
            link.attr("rel").is_some_and(|rel| {
                rel.split_whitespace()
                    .any(|token| token.eq_ignore_ascii_case("canonical"))
            })
        })
        .find_map(|link| non_blank(link.attr("href")));

    MetaTags {
        title: document.title(),
        description: named("description"),
        keywords: named("keywords"),
        robots: named("robots"),
        canonical,
        charset: document.character_set(),
        viewport: named("viewport"),
    }
}

pub fn extract_social_tags<D: DocumentTree + ?Sized>(document: &D) -> SocialTags {
    let metas = document.elements_by_tag("meta");
    let property = |key: &str| meta_content(&metas, key, "property", "name");

    SocialTags {
        og_title: property("og:title"),
        og_description: property("og:description"),
        og_image: property("og:image"),
        twitter_card: property("twitter:card"),
        twitter_title: property("twitter:title"),
        twitter_description: property("twitter:description"),
        twitter_image: property("twitter:image"),
    }
}

/// `content` of the first `<meta>` whose `preferred` attribute equals `key`,
/// falling back to the first one matching on `fallback`.
fn meta_content(metas: &[ElementView], key: &str, preferred: &str, fallback: &str) -> Option<String> {
    let matching = |attribute: &str| {
        metas.iter().find(|meta| {
            meta.attr(attribute)
                .is_some_and(|value| value.trim().eq_ignore_ascii_case(key))
        })
    };

    matching(preferred)
        .or_else(|| matching(fallback))
        .and_then(|meta| non_blank(meta.attr("content")))
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(String::from)
}

pub fn extract_headings<D: DocumentTree + ?Sized>(document: &D) -> Headings {
    let mut headings = Headings::default();
    for level in 1..=6 {
        let texts = document
            .elements_by_tag(&format!("h{}", level))
            .into_iter()
            .map(|heading| heading.text().to_string())
            .filter(|text| !text.is_empty());
        if let Some(bucket) = headings.level_mut(level) {
            bucket.extend(texts);
        }
    }
    headings
}

pub fn extract_images<D: DocumentTree + ?Sized>(document: &D) -> ImageAudit {
    let images = document.elements_by_tag("img");

    // alt="" marks a decorative image and counts as present
    let with_alt = images.iter().filter(|img| img.has_attr("alt")).count();

    let samples = images
        .iter()
        .take(MAX_IMAGE_SAMPLES)
        .map(|img| ImageSample {
            src: img.attr("src").map(String::from),
            alt: img.attr("alt").map(String::from),
        })
        .collect();

    ImageAudit {
        total: images.len(),
        with_alt,
        without_alt: images.len() - with_alt,
        samples,
    }
}

pub fn extract_links<D: DocumentTree + ?Sized>(document: &D, base: &Url) -> LinkAudit {
    let mut audit = LinkAudit::default();
    let mut seen = HashSet::new();

    for anchor in document.elements_by_tag("a") {
        let Some(href) = anchor.attr("href").map(str::trim) else {
            continue;
        };

        if href.is_empty() || href.starts_with('#') || is_javascript(href) {
            trace!("Skipping non-navigational href {:?}", href);
            continue;
        }

        let mut resolved = match base.join(href) {
            Ok(url) => url,
            Err(e) => {
                debug!("Skipping unresolvable href {:?}: {}", href, e);
                continue;
            }
        };

        audit.total += 1;

        if is_same_host(&resolved, base) {
            audit.internal += 1;
            if is_asset_path(resolved.path()) {
                trace!("  -> Internal asset, not a crawl candidate: {}", resolved);
                continue;
            }
            resolved.set_fragment(None);
            let url = resolved.to_string();
            if seen.insert(url.clone()) {
                audit.internal_urls.push(url);
            }
        } else if matches!(resolved.scheme(), "http" | "https") {
            audit.external += 1;
        }
    }

    audit
}

fn is_javascript(href: &str) -> bool {
    href.get(..11)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("javascript:"))
}

fn is_same_host(url: &Url, base: &Url) -> bool {
    url.host_str().is_some() && url.host_str() == base.host_str()
}

/// True if the last path segment ends in one of [`ASSET_EXTENSIONS`].
pub fn is_asset_path(path: &str) -> bool {
    path.rsplit('/')
        .next()
        .and_then(|segment| segment.rsplit_once('.'))
        .is_some_and(|(_, extension)| {
            ASSET_EXTENSIONS
                .iter()
                .any(|asset| asset.eq_ignore_ascii_case(extension))
        })
}

/// Lowercases, strips punctuation and splits `text` into content words.
pub fn tokenize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    cleaned
        .split_whitespace()
        .filter(|token| token.chars().count() >= MIN_WORD_CHARS)
        .filter(|token| !token.chars().all(char::is_numeric))
        .filter(|token| !is_stop_word(token))
        .map(String::from)
        .collect()
}

pub fn extract_keywords<D: DocumentTree + ?Sized>(
    document: &D,
    title: Option<&str>,
    description: Option<&str>,
    h1: &[String],
) -> (Vec<KeywordStat>, usize) {
    let words = tokenize(&document.content_text(NON_CONTENT_TAGS));
    let word_count = words.len();

    // Insertion order doubles as the tie-break for the stable sort below.
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut frequency: Vec<(&str, usize)> = Vec::new();
    for word in words.iter().map(String::as_str) {
        match positions.get(word) {
            Some(&index) => frequency[index].1 += 1,
            None => {
                positions.insert(word, frequency.len());
                frequency.push((word, 1));
            }
        }
    }
    frequency.sort_by(|a, b| b.1.cmp(&a.1));
    frequency.truncate(MAX_KEYWORDS);

    let title = title.unwrap_or_default().to_lowercase();
    let description = description.unwrap_or_default().to_lowercase();
    let h1_text = h1.join(" ").to_lowercase();

    let keywords = frequency
        .into_iter()
        .map(|(word, count)| KeywordStat {
            word: word.to_string(),
            count,
            density: density(count, word_count),
            in_title: title.contains(word),
            in_description: description.contains(word),
            in_h1: h1_text.contains(word),
        })
        .collect();

    (keywords, word_count)
}

fn density(count: usize, word_count: usize) -> f64 {
    if word_count == 0 {
        return 0.0;
    }
    count as f64 / word_count as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://example.com/blog/post";

    fn report(html: &str) -> Report {
        analyze_html(html, BASE).unwrap()
    }

    #[test]
    fn test_invalid_base_url_is_the_only_failure() {
        let err = analyze_html("<p>fine</p>", "not a url").unwrap_err();
        assert!(matches!(err, ScanError::InvalidBaseUrl(_)));

        let err = analyze_html("<p>fine</p>", "/relative/path").unwrap_err();
        assert!(matches!(err, ScanError::InvalidBaseUrl(_)));

        let err = analyze_html("<p>fine</p>", "mailto:someone@example.com").unwrap_err();
        assert!(matches!(err, ScanError::InvalidBaseUrl(_)));
    }

    #[test]
    fn test_empty_document_degrades_to_defaults() {
        let report = report("");

        assert_eq!(
            report.meta_tags,
            MetaTags {
                charset: Some("UTF-8".to_string()),
                ..MetaTags::default()
            }
        );
        assert_eq!(report.social_tags, SocialTags::default());
        assert_eq!(report.headings, Headings::default());
        assert_eq!(report.image_audit, ImageAudit::default());
        assert_eq!(report.link_audit, LinkAudit::default());
        assert!(report.keywords.is_empty());
        assert_eq!(report.word_count, 0);
        assert_eq!(report.score, 100 - 20 - 20 - 15);
    }

    #[test]
    fn test_meta_tags() {
        let report = report(
            r#"<html><head>
                <meta charset="utf-8">
                <title>  Rust SEO   Guide </title>
                <meta name="Description" content=" All about crawling ">
                <meta name="keywords" content="rust, seo">
                <meta name="robots" content="index,follow">
                <meta name="viewport" content="width=device-width">
                <link rel="stylesheet" href="/style.css">
                <link rel="Canonical" href="https://example.com/guide">
            </head><body></body></html>"#,
        );

        let meta = &report.meta_tags;
        assert_eq!(meta.title.as_deref(), Some("Rust SEO Guide"));
        assert_eq!(meta.description.as_deref(), Some("All about crawling"));
        assert_eq!(meta.keywords.as_deref(), Some("rust, seo"));
        assert_eq!(meta.robots.as_deref(), Some("index,follow"));
        assert_eq!(meta.viewport.as_deref(), Some("width=device-width"));
        assert_eq!(meta.canonical.as_deref(), Some("https://example.com/guide"));
        assert_eq!(meta.charset.as_deref(), Some("utf-8"));
    }

    #[test]
    fn test_blank_meta_content_is_absent() {
        let report = report(r#"<head><meta name="description" content="   "><meta name="robots"></head>"#);
        assert_eq!(report.meta_tags.description, None);
        assert_eq!(report.meta_tags.robots, None);
    }

    #[test]
    fn test_meta_description_accepts_property_attribute() {
        let report = report(r#"<head><meta property="description" content="via property"></head>"#);
        assert_eq!(report.meta_tags.description.as_deref(), Some("via property"));
    }

    #[test]
    fn test_social_tags() {
        let report = report(
            r#"<head>
                <meta property="og:title" content="OG Title">
                <meta property="og:description" content="OG Desc">
                <meta property="og:image" content="https://example.com/og.png">
                <meta name="twitter:card" content="summary_large_image">
                <meta name="twitter:title" content="TW Title">
                <meta name="twitter:description" content="TW Desc">
                <meta name="twitter:image" content="https://example.com/tw.png">
            </head>"#,
        );

        let social = &report.social_tags;
        assert_eq!(social.og_title.as_deref(), Some("OG Title"));
        assert_eq!(social.og_description.as_deref(), Some("OG Desc"));
        assert_eq!(social.og_image.as_deref(), Some("https://example.com/og.png"));
        assert_eq!(social.twitter_card.as_deref(), Some("summary_large_image"));
        assert_eq!(social.twitter_title.as_deref(), Some("TW Title"));
        assert_eq!(social.twitter_description.as_deref(), Some("TW Desc"));
        assert_eq!(social.twitter_image.as_deref(), Some("https://example.com/tw.png"));
    }

    #[test]
    fn test_headings_keep_order_and_duplicates() {
        let report = report(
            r#"<body><h1>Main</h1><h2>Intro</h2><h2>  </h2><h2>Intro</h2>
               <h3>Deep <em>dive</em></h3><h6>Fine print</h6></body>"#,
        );

        assert_eq!(report.headings.h1, vec!["Main"]);
        assert_eq!(report.headings.h2, vec!["Intro", "Intro"]);
        assert_eq!(report.headings.h3, vec!["Deep dive"]);
        assert!(report.headings.h4.is_empty());
        assert!(report.headings.h5.is_empty());
        assert_eq!(report.headings.level(6), ["Fine print".to_string()]);
    }

    #[test]
    fn test_empty_alt_counts_as_present() {
        let report = report(
            r#"<body><img src="a.png" alt="A cat"><img src="b.png" alt="">
               <img src="c.png"><img></body>"#,
        );

        let images = &report.image_audit;
        assert_eq!(images.total, 4);
        assert_eq!(images.with_alt, 2);
        assert_eq!(images.without_alt, 2);
        assert_eq!(images.samples[1].alt.as_deref(), Some(""));
        assert_eq!(images.samples[2].alt, None);
        assert_eq!(images.samples[3].src, None);
    }

    #[test]
    fn test_image_samples_are_capped() {
        let html: String = (0..25)
            .map(|i| format!(r#"<img src="/img/{}.png">"#, i))
            .collect();
        let report = report(&html);

        assert_eq!(report.image_audit.total, 25);
        assert_eq!(report.image_audit.samples.len(), MAX_IMAGE_SAMPLES);
        assert_eq!(report.image_audit.samples[0].src.as_deref(), Some("/img/0.png"));
        assert_eq!(report.image_audit.samples[9].src.as_deref(), Some("/img/9.png"));
    }

    #[test]
    fn test_link_classification() {
        let report = report(
            r##"<body>
                <a href="/about">About</a>
                <a href="contact">Relative</a>
                <a href="https://example.com/about#team">Same page, fragment</a>
                <a href="https://other.org/">Other</a>
                <a href="http://sub.example.com/">Subdomain</a>
                <a href="mailto:hi@example.com">Mail</a>
                <a href="#top">Top</a>
                <a href="JavaScript:void(0)">JS</a>
                <a href="">Empty</a>
                <a>No href</a>
            </body>"##,
        );

        let links = &report.link_audit;
        assert_eq!(links.total, 6);
        assert_eq!(links.internal, 3);
        assert_eq!(links.external, 2);
        assert_eq!(
            links.internal_urls,
            vec![
                "https://example.com/about".to_string(),
                "https://example.com/blog/contact".to_string(),
            ]
        );
    }

    #[test]
    fn test_unresolvable_href_is_not_counted() {
        let report = report(r#"<body><a href="http://[::1">broken</a><a href="/ok">ok</a></body>"#);
        assert_eq!(report.link_audit.total, 1);
        assert_eq!(report.link_audit.internal, 1);
    }

    #[test]
    fn test_fragment_only_href_is_excluded() {
        let report = report(r##"<body><a href="#section">Jump</a></body>"##);
        assert_eq!(report.link_audit, LinkAudit::default());
    }

    #[test]
    fn test_asset_link_counts_but_is_not_crawlable() {
        let report = report(r#"<body><a href="/about.pdf">Brochure</a><a href="/LOGO.PNG">Logo</a></body>"#);

        let links = &report.link_audit;
        assert_eq!(links.total, 2);
        assert_eq!(links.internal, 2);
        assert_eq!(links.external, 0);
        assert!(links.internal_urls.is_empty());
    }

    #[test]
    fn test_is_asset_path() {
        assert!(is_asset_path("/files/report.pdf"));
        assert!(is_asset_path("/Style.CSS"));
        assert!(is_asset_path("/sitemap.xml"));
        assert!(!is_asset_path("/docs.pdf/overview"));
        assert!(!is_asset_path("/about"));
        assert!(!is_asset_path("/"));
        assert!(!is_asset_path("/index.html"));
    }

    #[test]
    fn test_keyword_frequency_and_order() {
        let report = report("<p>The quick Fox jumps. Fox runs.</p>");

        assert_eq!(report.word_count, 5);
        let words: Vec<(&str, usize)> = report
            .keywords
            .iter()
            .map(|k| (k.word.as_str(), k.count))
            .collect();
        assert_eq!(
            words,
            vec![("fox", 2), ("quick", 1), ("jumps", 1), ("runs", 1)]
        );
        assert_eq!(report.keywords[0].density, 2.0 / 5.0 * 100.0);
    }

    #[test]
    fn test_tokenize_filters() {
        let tokens = tokenize("The 2024 a1b2 C3PO it's x-ray on no 12345 ROUTING, routing!");
        assert_eq!(tokens, vec!["a1b2", "c3po", "xray", "routing", "routing"]);
    }

    #[test]
    fn test_keywords_ignore_code_and_markup() {
        let report = report(
            r#"<html><head><title>Gardening</title><style>.tomato { color: red; }</style></head>
               <body><p>tomato garden</p>
               <script>const tomato = 1; tomato++;</script>
               <pre>tomato tomato</pre><code>tomato</code>
               <noscript>tomato</noscript><svg><text>tomato</text></svg>
               <template><p>tomato</p></template></body></html>"#,
        );

        let tomato = report.keywords.iter().find(|k| k.word == "tomato").unwrap();
        assert_eq!(tomato.count, 1);
        assert_eq!(report.word_count, 2);
    }

    #[test]
    fn test_keyword_context_flags() {
        let report = report(
            r#"<html><head><title>Sourdough Baking</title>
               <meta name="description" content="Learn BREAD basics"></head>
               <body><h1>Sourdough at home</h1>
               <p>sourdough sourdough bread starter flour</p></body></html>"#,
        );

        let find = |word: &str| report.keywords.iter().find(|k| k.word == word).unwrap();
        let sourdough = find("sourdough");
        assert!(sourdough.in_title);
        assert!(!sourdough.in_description);
        assert!(sourdough.in_h1);

        let bread = find("bread");
        assert!(!bread.in_title);
        assert!(bread.in_description);
        assert!(!bread.in_h1);
    }

    #[test]
    fn test_keywords_are_capped_and_sorted() {
        let body: String = (0u8..15)
            .map(|i| format!("word{} ", (b'a' + i) as char).repeat(usize::from(i) + 1))
            .collect();
        let report = report(&format!("<p>{}</p>", body));

        assert_eq!(report.keywords.len(), MAX_KEYWORDS);
        assert_eq!(report.keywords[0].word, "wordo");
        assert_eq!(report.keywords[0].count, 15);
        assert!(report.keywords.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn test_missing_description_and_alt_penalties() {
        // One H1, two images without alt, no description
        let report = report(
            r#"<html><head><title>Welcome to our shop</title></head>
               <body><h1>Welcome</h1><img src="a.png"><img src="b.png"></body></html>"#,
        );
        assert_eq!(report.score, 100 - 20 - 4);

        // A four character title also costs the short-title penalty
        let report = self::report(
            r#"<html><head><title>Home</title></head>
               <body><h1>Welcome</h1><img src="a.png"><img src="b.png"></body></html>"#,
        );
        assert_eq!(report.score, 100 - 5 - 20 - 4);
    }

    #[test]
    fn test_svg_title_is_not_the_page_title() {
        let report = report(
            r#"<html><head></head><body>
               <svg role="img"><title>Cart icon</title><path d="M0 0h24v24H0z"/></svg>
               <h1>Shop</h1></body></html>"#,
        );

        assert_eq!(report.meta_tags.title, None);
        // Missing title and description
        assert_eq!(report.score, 60);
        assert!(report.keywords.iter().all(|k| !k.in_title));
    }

    #[test]
    fn test_short_title_penalty() {
        let report = report(
            r#"<html><head><title>Hi</title><meta name="description" content="Greeting page"></head>
               <body><h1>Hello</h1></body></html>"#,
        );
        assert_eq!(report.score, 95);
    }

    #[test]
    fn test_report_json_round_trip() {
        let report = report(
            r#"<html><head><title>Round trip</title>
               <meta name="description" content="Serialization check"></head>
               <body><h1>Round trip</h1><img src="x.png"><a href="/next">next</a>
               <p>alpha beta gamma alpha delta epsilon alpha beta</p></body></html>"#,
        );

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"metaTags\""));
        assert!(json.contains("\"inH1\""));
        assert!(json.contains("\"keywords\":null"));

        let back: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn test_extract_accepts_any_document_tree() {
        struct Fixed;

        impl DocumentTree for Fixed {
            fn elements_by_tag(&self, tag: &str) -> Vec<ElementView> {
                match tag {
                    "title" => vec![ElementView::new(vec![], "Handmade tree title")],
                    "h1" => vec![ElementView::new(vec![], "Heading")],
                    "a" => vec![ElementView::new(
                        vec![("href".to_string(), "/docs".to_string())],
                        "Docs",
                    )],
                    _ => Vec::new(),
                }
            }

            fn content_text(&self, _excluded_tags: &[&str]) -> String {
                "ferris ferris crab".to_string()
            }
        }

        let report = extract(&Fixed, BASE).unwrap();
        assert_eq!(report.meta_tags.title.as_deref(), Some("Handmade tree title"));
        assert_eq!(report.link_audit.internal_urls, vec!["https://example.com/docs"]);
        assert_eq!(report.keywords[0].word, "ferris");
        assert_eq!(report.score, 80);
    }
}

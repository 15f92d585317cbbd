//! Read-only view over a parsed HTML document.
//!
//! The extractor only needs element lookup by tag name, attribute access and
//! text content, so it works against [`DocumentTree`] rather than a concrete
//! parser. [`HtmlDocument`] is the `scraper`-backed implementation.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// An owned snapshot of one element: its attributes and its text content.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementView {
    attributes: Vec<(String, String)>,
    text: String,
}

impl ElementView {
    pub fn new(attributes: Vec<(String, String)>, text: impl Into<String>) -> Self {
        Self {
            attributes,
            text: text.into(),
        }
    }

    /// Attribute value by name, compared case-insensitively.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Text content with whitespace runs collapsed and the ends trimmed.
    pub fn text(&self) -> &str {
        &self.text
    }
}

pub trait DocumentTree {
    /// All elements named `tag`, in document order.
    fn elements_by_tag(&self, tag: &str) -> Vec<ElementView>;

    /// Text of the document body, skipping any subtree rooted at one of
    /// `excluded_tags`. Text nodes are separated by a single space.
    fn content_text(&self, excluded_tags: &[&str]) -> String;

    /// Encoding known from outside the markup, e.g. an HTTP `Content-Type` header.
    fn encoding(&self) -> Option<String> {
        None
    }

    fn title(&self) -> Option<String> {
        self.elements_by_tag("title")
            .into_iter()
            .next()
            .map(|title| title.text().to_string())
            .filter(|title| !title.is_empty())
    }

    fn character_set(&self) -> Option<String> {
        declared_charset(self)
    }
}

/// Document encoding, falling back to `<meta charset>` and then to the
/// `charset=` parameter of a `<meta http-equiv="content-type">`.
pub fn declared_charset<D: DocumentTree + ?Sized>(document: &D) -> Option<String> {
    if let Some(encoding) = document.encoding() {
        return Some(encoding);
    }

    let metas = document.elements_by_tag("meta");
    if let Some(charset) = metas
        .iter()
        .find_map(|meta| meta.attr("charset"))
        .map(str::trim)
        .filter(|charset| !charset.is_empty())
    {
        return Some(charset.to_string());
    }

    metas
        .iter()
        .filter(|meta| {
            meta.attr("http-equiv")
                .is_some_and(|equiv| equiv.eq_ignore_ascii_case("content-type"))
        })
        .find_map(|meta| meta.attr("content").and_then(charset_from_content_type))
}

/// Pulls the `charset` parameter out of a `Content-Type` value.
pub fn charset_from_content_type(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let value = value.trim().trim_matches('"').trim();
        (!value.is_empty()).then(|| value.to_string())
    })
}

/// Encoding reported for parsed source text that declares none.
pub const DEFAULT_CHARSET: &str = "UTF-8";

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

pub struct HtmlDocument {
    html: Html,
    encoding: Option<String>,
}

impl HtmlDocument {
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
            encoding: None,
        }
    }

    pub fn with_encoding(mut self, encoding: Option<String>) -> Self {
        self.encoding = encoding;
        self
    }
}

impl DocumentTree for HtmlDocument {
    fn elements_by_tag(&self, tag: &str) -> Vec<ElementView> {
        let selector = match Selector::parse(tag) {
            Ok(selector) => selector,
            Err(e) => {
                debug!("Unusable tag selector {:?}: {:?}", tag, e);
                return Vec::new();
            }
        };

        self.html
            .select(&selector)
            .map(|element| {
                let attributes = element
                    .value()
                    .attrs()
                    .map(|(name, value)| (name.to_string(), value.to_string()))
                    .collect();
                ElementView::new(attributes, collapse_whitespace(&element.text().collect::<String>()))
            })
            .collect()
    }

    fn content_text(&self, excluded_tags: &[&str]) -> String {
        let root = Selector::parse("body")
            .ok()
            .and_then(|body| self.html.select(&body).next())
            .unwrap_or_else(|| self.html.root_element());

        let mut text = String::new();
        if !excluded_tags.contains(&root.value().name()) {
            collect_text(root, excluded_tags, &mut text);
        }
        text
    }

    fn encoding(&self) -> Option<String> {
        self.encoding.clone()
    }

    /// First `<title>` in the HTML namespace. SVG and MathML titles are skipped.
    fn title(&self) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        self.html
            .select(&selector)
            .find(|element| &*element.value().name.ns == HTML_NAMESPACE)
            .map(|title| collapse_whitespace(&title.text().collect::<String>()))
            .filter(|title| !title.is_empty())
    }

    // Source text is already decoded
    fn character_set(&self) -> Option<String> {
        declared_charset(self).or_else(|| Some(DEFAULT_CHARSET.to_string()))
    }
}

fn collect_text(element: ElementRef<'_>, excluded_tags: &[&str], out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push(' ');
        } else if let Some(child_element) = ElementRef::wrap(child)
            && !excluded_tags.contains(&child_element.value().name())
        {
            collect_text(child_element, excluded_tags, out);
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

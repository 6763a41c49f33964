mod atom;
mod rss;
pub mod sanitize;

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8};
use once_cell::sync::Lazy;
use regex::bytes::Regex;
use roxmltree::{Document, Node, ParsingOptions};

use crate::app::{BriefingError, Result};
use crate::domain::{Article, FeedSource};

pub const ATOM_NS: &str = "http://www.w3.org/2005/Atom";
pub const MEDIA_NS: &str = "http://search.yahoo.com/mrss/";

/// Maximum length of an article description after markup is stripped.
pub const DESCRIPTION_MAX_CHARS: usize = 300;

static RE_XML_ENCODING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(?-u:\xEF\xBB\xBF)?\s*<\?xml[^>]*?encoding\s*=\s*["']([A-Za-z0-9._:-]+)["']"#)
        .expect("valid xml declaration pattern")
});

/// Which XML dialect a feed document is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedDialect {
    Rss,
    Atom,
}

impl FeedDialect {
    /// An Atom `<feed>` root selects Atom; everything else is read as RSS 2.0.
    pub fn detect(root: Node<'_, '_>) -> Self {
        if is_element(root, Some(ATOM_NS), "feed") {
            FeedDialect::Atom
        } else {
            FeedDialect::Rss
        }
    }
}

#[derive(Clone, Default)]
pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Parse a feed body into at most `max_items` articles in document order.
    pub fn normalize(
        &self,
        source: &FeedSource,
        body: &[u8],
        max_items: usize,
    ) -> Result<Vec<Article>> {
        let text = decode_body(body);
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let doc = Document::parse_with_options(&text, options)
            .map_err(|e| BriefingError::FeedParse(e.to_string()))?;

        let root = doc.root_element();
        let articles = match FeedDialect::detect(root) {
            FeedDialect::Atom => atom::parse(&doc, root, source, max_items),
            FeedDialect::Rss => rss::parse(root, source, max_items),
        };

        tracing::debug!(
            "Normalized {} articles from {}",
            articles.len(),
            source.url
        );
        Ok(articles)
    }
}

/// Decode a feed body using the encoding named in its XML declaration.
///
/// A byte order mark takes precedence; UTF-8 is the default. Undecodable
/// bytes become U+FFFD.
pub fn decode_body(body: &[u8]) -> Cow<'_, str> {
    let encoding = declared_encoding(body).unwrap_or(UTF_8);
    let (text, used, had_errors) = encoding.decode(body);
    if had_errors {
        tracing::debug!("Replaced malformed {} sequences in feed body", used.name());
    }
    text
}

/// Only ASCII-compatible labels are honoured: any other encoding could not
/// have spelled the declaration in ASCII.
fn declared_encoding(body: &[u8]) -> Option<&'static Encoding> {
    let head = &body[..body.len().min(1024)];
    let label = RE_XML_ENCODING.captures(head)?.get(1)?;
    Encoding::for_label(label.as_bytes()).filter(|encoding| encoding.is_ascii_compatible())
}

fn is_element(node: Node<'_, '_>, namespace: Option<&str>, name: &str) -> bool {
    node.is_element()
        && node.tag_name().namespace() == namespace
        && node.tag_name().name() == name
}

/// Direct element children of `node` with the given expanded name.
pub(crate) fn children_named<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    namespace: Option<&'a str>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |child| is_element(*child, namespace, name))
}

pub(crate) fn child_named<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    namespace: Option<&'a str>,
    name: &'a str,
) -> Option<Node<'a, 'input>> {
    children_named(node, namespace, name).next()
}

/// Text of the named child, treating an empty element like a missing one.
pub(crate) fn child_text<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    namespace: Option<&'a str>,
    name: &'a str,
) -> Option<&'a str> {
    child_named(node, namespace, name)
        .and_then(|child| child.text())
        .filter(|text| !text.is_empty())
}

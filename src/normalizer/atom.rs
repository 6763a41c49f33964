use roxmltree::{Document, Node};

use crate::domain::{Article, FeedSource};
use crate::normalizer::sanitize::{extract_image, strip_html, truncate_chars};
use crate::normalizer::{child_named, child_text, children_named, ATOM_NS, DESCRIPTION_MAX_CHARS};

pub(crate) fn parse(
    doc: &Document<'_>,
    root: Node<'_, '_>,
    source: &FeedSource,
    max_items: usize,
) -> Vec<Article> {
    children_named(root, Some(ATOM_NS), "entry")
        .take(max_items)
        .map(|entry| parse_entry(doc, entry, source))
        .collect()
}

fn parse_entry(doc: &Document<'_>, entry: Node<'_, '_>, source: &FeedSource) -> Article {
    let body = entry_body(doc, entry);

    let mut article = Article::from_source(source);
    article.title = child_text(entry, Some(ATOM_NS), "title")
        .unwrap_or("No title")
        .to_string();
    article.link = child_named(entry, Some(ATOM_NS), "link")
        .and_then(|link| link.attribute("href"))
        .unwrap_or_default()
        .to_string();
    article.pub_date = child_text(entry, Some(ATOM_NS), "updated")
        .or_else(|| child_text(entry, Some(ATOM_NS), "published"))
        .unwrap_or_default()
        .to_string();
    article.image = extract_image(body);
    article.description = truncate_chars(&strip_html(body), DESCRIPTION_MAX_CHARS);
    article
}

/// `<content>` if present (even when empty), else `<summary>`.
fn entry_body<'a>(doc: &'a Document<'_>, entry: Node<'a, '_>) -> &'a str {
    let Some(node) = child_named(entry, Some(ATOM_NS), "content")
        .or_else(|| child_named(entry, Some(ATOM_NS), "summary"))
    else {
        return "";
    };

    if node.attribute("type") == Some("xhtml") {
        return inner_markup(doc, node);
    }
    node.text().unwrap_or_default()
}

/// Source text between an element's start and end tags.
fn inner_markup<'a>(doc: &'a Document<'_>, node: Node<'a, '_>) -> &'a str {
    match (node.first_child(), node.last_child()) {
        (Some(first), Some(last)) => &doc.input_text()[first.range().start..last.range().end],
        _ => "",
    }
}

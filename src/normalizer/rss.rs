use roxmltree::Node;

use crate::domain::{Article, FeedSource};
use crate::normalizer::sanitize::{extract_image, strip_html, truncate_chars};
use crate::normalizer::{child_named, child_text, children_named, DESCRIPTION_MAX_CHARS, MEDIA_NS};

/// Read `<channel><item>` entries of an RSS 2.0 document.
///
/// A document without a channel yields no articles rather than an error.
pub(crate) fn parse(root: Node<'_, '_>, source: &FeedSource, max_items: usize) -> Vec<Article> {
    let Some(channel) = child_named(root, None, "channel") else {
        tracing::debug!("No <channel> in {}", source.url);
        return Vec::new();
    };

    children_named(channel, None, "item")
        .take(max_items)
        .map(|item| parse_item(item, source))
        .collect()
}

fn parse_item(item: Node<'_, '_>, source: &FeedSource) -> Article {
    let description = child_text(item, None, "description").unwrap_or_default();

    let mut article = Article::from_source(source);
    article.title = child_text(item, None, "title").unwrap_or("No title").to_string();
    article.link = child_text(item, None, "link").unwrap_or_default().to_string();
    article.pub_date = child_text(item, None, "pubDate").unwrap_or_default().to_string();
    article.image = find_image(item, description);
    article.description = truncate_chars(&strip_html(description), DESCRIPTION_MAX_CHARS);
    article
}

/// Structured media fields first, then an `<img>` inside the description.
fn find_image(item: Node<'_, '_>, description: &str) -> Option<String> {
    let media_url = |name| {
        child_named(item, Some(MEDIA_NS), name)
            .and_then(|node| node.attribute("url"))
            .filter(|url| !url.is_empty())
    };

    let enclosure_url = || {
        child_named(item, None, "enclosure")
            .filter(|node| node.attribute("type").unwrap_or_default().contains("image"))
            .and_then(|node| node.attribute("url"))
            .filter(|url| !url.is_empty())
    };

    media_url("content")
        .or_else(|| media_url("thumbnail"))
        .or_else(enclosure_url)
        .map(str::to_string)
        .or_else(|| extract_image(description))
}

#[cfg(test)]
mod tests {
    use crate::domain::FeedSource;
    use crate::normalizer::Normalizer;

    fn normalize(xml: &str) -> Vec<crate::domain::Article> {
        let source = FeedSource::new("https://example.com/rss");
        Normalizer::new().normalize(&source, xml.as_bytes(), 20).unwrap()
    }

    fn single_item(inner: &str) -> String {
        format!(
            r#"<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/"><channel><item>{inner}</item></channel></rss>"#
        )
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let articles = normalize(&single_item(""));

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "No title");
        assert_eq!(articles[0].link, "");
        assert_eq!(articles[0].description, "");
        assert_eq!(articles[0].pub_date, "");
        assert_eq!(articles[0].image, None);
    }

    #[test]
    fn test_empty_title_element_uses_default() {
        let articles = normalize(&single_item("<title></title>"));
        assert_eq!(articles[0].title, "No title");
    }

    #[test]
    fn test_source_name_falls_back_to_url() {
        let articles = normalize(&single_item("<title>x</title>"));
        assert_eq!(articles[0].source, "https://example.com/rss");
        assert_eq!(articles[0].category, "Uncategorized");
    }

    #[test]
    fn test_media_content_beats_thumbnail() {
        let articles = normalize(&single_item(
            r#"<media:thumbnail url="thumb.jpg"/><media:content url="content.jpg"/>"#,
        ));
        assert_eq!(articles[0].image, Some("content.jpg".into()));
    }

    #[test]
    fn test_thumbnail_when_content_has_no_url() {
        let articles = normalize(&single_item(
            r#"<media:content medium="image"/><media:thumbnail url="thumb.jpg"/>"#,
        ));
        assert_eq!(articles[0].image, Some("thumb.jpg".into()));
    }

    #[test]
    fn test_image_enclosure() {
        let articles = normalize(&single_item(
            r#"<enclosure url="photo.png" type="image/png" length="10"/>"#,
        ));
        assert_eq!(articles[0].image, Some("photo.png".into()));
    }

    #[test]
    fn test_non_image_enclosure_is_skipped() {
        let articles = normalize(&single_item(
            r#"<enclosure url="episode.mp3" type="audio/mpeg"/><description>&lt;img src="inline.gif"&gt;</description>"#,
        ));
        assert_eq!(articles[0].image, Some("inline.gif".into()));
    }

    #[test]
    fn test_image_from_cdata_description() {
        let articles = normalize(&single_item(
            r#"<description><![CDATA[<p><img src="https://example.com/c.jpg"/>Caption &amp; more</p>]]></description>"#,
        ));
        assert_eq!(articles[0].image, Some("https://example.com/c.jpg".into()));
        assert_eq!(articles[0].description, "Caption & more");
    }

    #[test]
    fn test_media_namespace_is_required() {
        // An un-namespaced <content> is not media:content.
        let articles = normalize(&single_item(r#"<content url="plain.jpg"/>"#));
        assert_eq!(articles[0].image, None);
    }

    #[test]
    fn test_description_truncated_to_300_chars() {
        let long = "a".repeat(400);
        let articles = normalize(&single_item(&format!("<description>{long}</description>")));
        assert_eq!(articles[0].description.chars().count(), 300);
    }

    #[test]
    fn test_missing_channel_yields_nothing() {
        assert!(normalize("<rss version=\"2.0\"><item><title>x</title></item></rss>").is_empty());
    }
}

use once_cell::sync::Lazy;
use regex::Regex;

static RE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid tag pattern"));
static RE_IMG_SRC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<img[^>]+src=["']([^"']+)["']"#).expect("valid img pattern")
});

// Applied in order, so "&amp;lt;" decodes to "&lt;" and no further.
const ENTITIES: [(&str, &str); 5] = [
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&amp;", "&"),
    ("&quot;", "\""),
    ("&#39;", "'"),
];

/// Remove markup tags, decode the common entities and trim.
pub fn strip_html(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut clean = RE_TAG.replace_all(text, "").into_owned();
    for (entity, replacement) in ENTITIES {
        clean = clean.replace(entity, replacement);
    }
    clean.trim().to_string()
}

/// Keep at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Best-effort lookup of the first `<img src>` in an HTML fragment.
pub fn extract_image(html: &str) -> Option<String> {
    RE_IMG_SRC
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

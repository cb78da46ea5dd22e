use regex::Regex;
use scraper::{Html, Selector};
use std::sync::OnceLock;

use crate::filter::THUMBNAIL_PROXY_MARKER;

fn meta_url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)https?://[^\s"']+\.(jpg|jpeg|png|webp|gif)"#).unwrap())
}


fn meta_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse("meta[content]").unwrap())
}
/// First image URL of each `<meta content>` that mentions a jpg or png.
pub fn from_meta_tags(document: &Html) -> Vec<String> {
    document
        .select(meta_selector())
        .filter_map(|meta| meta.value().attr("content"))
        .filter(|c| c.contains("http") && (c.contains(".jpg") || c.contains(".png")))
        .filter_map(|c| meta_url_re().find(c))
        .map(|m| m.as_str())
        .filter(|u| !u.contains(THUMBNAIL_PROXY_MARKER))
        .map(str::to_string)
        .collect()
}

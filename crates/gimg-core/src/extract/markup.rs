use regex::Regex;
use std::sync::OnceLock;

use crate::filter::FilterRules;

fn markup_url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?i)https?://[^\s"',\]\(\)\{\}]+\.(jpg|jpeg|png|webp|gif)([?&][^\s"',\]\(\)\{\}]*)?"#,
        )
        .unwrap()
    })
}

/// Regex sweep over the raw markup. Proxy thumbnails, logos and short URLs
/// are dropped.
pub fn from_markup(html: &str, rules: &FilterRules) -> Vec<String> {
    markup_url_re()
        .find_iter(html)
        .map(|m| m.as_str())
        .filter(|u| !rules.is_site_chrome(u) && rules.is_long_enough(u))
        .map(str::to_string)
        .collect()
}

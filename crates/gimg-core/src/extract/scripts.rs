use regex::Regex;
use scraper::{Html, Selector};
use std::sync::OnceLock;

use crate::filter::FilterRules;

fn script_url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)https?://[^\s"',\]]+\.(jpg|jpeg|png|webp|gif)([?&][^\s"',\]]*)?"#)
            .unwrap()
    })
}


fn script_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse("script").unwrap())
}
/// Image URLs embedded in inline script data. Only scripts that look like
/// they carry array literals (`["`) with links are scanned; thumbnails are
/// dropped.
pub fn from_scripts(document: &Html, rules: &FilterRules) -> Vec<String> {
    let mut urls = Vec::new();
    for script in document.select(script_selector()) {
        let content: String = script.text().collect();
        if !(content.contains("[\"") && content.contains("http")) {
            continue;
        }
        urls.extend(
            script_url_re()
                .find_iter(&content)
                .map(|m| m.as_str())
                .filter(|u| !rules.is_thumbnail(u))
                .map(str::to_string),
        );
    }
    urls
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(html: &str) -> Vec<String> {
        from_scripts(&Html::parse_document(html), &FilterRules::default())
    }

    #[test]
    fn reads_urls_from_array_data() {
        let urls = run(
            r#"<script>f([["https://a.example.com/x/photo.JPG?size=large&v=2",800,600],["http://b.example.com/y.webp"]]);</script>"#,
        );
        assert_eq!(
            urls,
            vec![
                "https://a.example.com/x/photo.JPG?size=large&v=2",
                "http://b.example.com/y.webp"
            ]
        );
    }

    #[test]
    fn skips_scripts_without_array_literals() {
        assert!(run(r#"<script>var u = "https://a.example.com/photo.jpg";</script>"#).is_empty());
    }

    #[test]
    fn drops_thumbnail_matches() {
        let urls = run(
            r#"<script>d(["https://lh3.example.com/s100/a.jpg","https://site.example.com/logo.png","https://ok.example.com/a.gif"]);</script>"#,
        );
        assert_eq!(urls, vec!["https://ok.example.com/a.gif"]);
    }

    #[test]
    fn shared_selector_serves_every_document() {
        assert!(std::ptr::eq(script_selector(), script_selector()));
        let first = run(r#"<script>a(["https://one.example.com/a.png"]);</script>"#);
        let second = run(r#"<script>b(["https://two.example.com/b.png"]);</script>"#);
        assert_eq!(first, vec!["https://one.example.com/a.png"]);
        assert_eq!(second, vec!["https://two.example.com/b.png"]);
    }
}

//! URL decoding and filename derivation for saved images.

mod decode;
mod path;
mod sanitize;

pub use decode::decode_url;
pub use path::stem_from_url_path;
pub use sanitize::sanitize_filename;

/// Safe file stem taken from the URL path, or `None` when nothing usable remains.
///
/// # Examples
///
/// - `image_stem("https://example.com/cats/tabby.jpg")` → `Some("tabby")`
/// - `image_stem("https://example.com/")` → `None`
pub fn image_stem(url: &str) -> Option<String> {
    let raw = stem_from_url_path(url)?;
    let sanitized = sanitize_filename(&raw);
    if sanitized.is_empty() {
        None
    } else {
        Some(sanitized)
    }
}

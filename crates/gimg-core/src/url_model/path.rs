//! File stem extraction from URL path.

/// Last path segment of `url` without its extension, for `keep_filenames`.
///
/// Returns `None` if the URL cannot be parsed or the path is empty/root.
pub fn stem_from_url_path(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path().split('/').filter(|s| !s.is_empty()).last()?;
    let segment = percent_encoding::percent_decode_str(segment).decode_utf8_lossy();
    let stem = match segment.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => segment.as_ref(),
    };
    if stem.is_empty() || stem == "." || stem == ".." {
        return None;
    }
    Some(stem.to_string())
}

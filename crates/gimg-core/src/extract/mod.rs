//! Candidate image URLs mined from a results-page snapshot.
//!
//! Three signals are read from the HTML, in order: JSON-like data inside
//! `<script>` blocks, `<meta content>` values, and a regex sweep over the
//! whole markup. The merged list is deduplicated (first occurrence wins) and
//! ordered longest first, since full-resolution URLs tend to carry more path
//! and query than their thumbnails.

mod markup;
mod meta;
mod scripts;

use scraper::Html;

use crate::filter::{dedup_preserving_order, FilterRules};

pub use markup::from_markup;
pub use meta::from_meta_tags;
pub use scripts::from_scripts;

/// All page signals merged, deduplicated, and sorted by length descending.
/// The sort is stable, so equal-length URLs keep signal order.
pub fn collect_candidates(html: &str, rules: &FilterRules) -> Vec<String> {
    let document = Html::parse_document(html);

    let mut urls = from_scripts(&document, rules);
    let script_count = urls.len();
    urls.extend(from_meta_tags(&document));
    let meta_count = urls.len() - script_count;
    urls.extend(from_markup(html, rules));
    tracing::debug!(
        scripts = script_count,
        meta = meta_count,
        markup = urls.len() - script_count - meta_count,
        "page signals collected"
    );

    let mut urls = dedup_preserving_order(urls);
    urls.sort_by(|a, b| b.len().cmp(&a.len()));
    urls
}

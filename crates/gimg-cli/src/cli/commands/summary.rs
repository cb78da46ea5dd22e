//! End-of-run table.

use gimg_core::{RunTotals, TermReport};

const KEY_WIDTH: usize = 24;

fn shorten(key: &str) -> String {
    if key.chars().count() <= KEY_WIDTH {
        key.to_string()
    } else {
        let head: String = key.chars().take(KEY_WIDTH - 1).collect();
        format!("{}…", head)
    }
}

pub fn format_summary(reports: &[TermReport], dry_run: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<w$} {:>6} {:>6} {:>6} {:>8} {:>6} {:>7} {:>7}\n",
        "TERM", "FOUND", "SAVED", "FAILED", "REJECTED", "DUPES", "RATE", "TIME",
        w = KEY_WIDTH
    ));
    for r in reports {
        if let Some(err) = &r.error {
            out.push_str(&format!(
                "{:<w$} error: {}\n",
                shorten(&r.search_key),
                err,
                w = KEY_WIDTH
            ));
            continue;
        }
        out.push_str(&format!(
            "{:<w$} {:>6} {:>6} {:>6} {:>8} {:>6} {:>6.1}% {:>6.1}s{}\n",
            shorten(&r.search_key),
            r.urls_found,
            r.downloaded,
            r.failed,
            r.rejected_resolution,
            r.duplicates,
            r.success_rate(),
            r.elapsed.as_secs_f64(),
            if r.stopped_early { "  (stopped early)" } else { "" },
            w = KEY_WIDTH
        ));
    }
    let t = RunTotals::from_reports(reports);
    out.push_str(&format!(
        "{:<w$} {:>6} {:>6} {:>6} {:>8} {:>6} {:>6.1}%\n",
        format!("TOTAL ({} terms, {} failed)", t.terms, t.failed_terms),
        t.urls_found,
        t.downloaded,
        t.failed,
        t.rejected_resolution,
        t.duplicates,
        t.success_rate(),
        w = KEY_WIDTH
    ));
    if dry_run {
        out.push_str("dry run: nothing downloaded\n");
    }
    for r in reports {
        if let Some(path) = &r.manifest_path {
            out.push_str(&format!("manifest: {}\n", path.display()));
        }
    }
    out
}

pub fn print_summary(reports: &[TermReport], dry_run: bool) {
    eprint!("\n{}", format_summary(reports, dry_run));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn summary_lists_terms_errors_and_totals() {
        let mut ok = TermReport::new("red roses");
        ok.urls_found = 10;
        ok.downloaded = 8;
        ok.failed = 1;
        ok.rejected_resolution = 1;
        ok.manifest_path = Some(PathBuf::from("google_search/red_roses_20240101_000000.json"));
        let bad = TermReport::failed_term("tulips", "browser: chrome not found");

        let text = format_summary(&[ok, bad], false);
        assert!(text.contains("red roses"));
        assert!(text.contains("80.0%"));
        assert!(text.contains("tulips"));
        assert!(text.contains("error: browser: chrome not found"));
        assert!(text.contains("TOTAL (2 terms, 1 failed)"));
        assert!(text.contains("manifest: google_search/red_roses_20240101_000000.json"));
        assert!(!text.contains("dry run"));
    }

    #[test]
    fn long_keys_are_shortened() {
        let key = "a".repeat(40);
        let s = shorten(&key);
        assert_eq!(s.chars().count(), KEY_WIDTH);
        assert!(s.ends_with('…'));
    }
}

//! Filesystem-safe name sanitization.

/// Longest stem we keep; leaves room for `-<index>.<ext>` under NAME_MAX.
const STEM_MAX: usize = 200;

/// Sanitizes a candidate file stem.
///
/// - Replaces NUL, `/`, `\`, whitespace and control characters with `_`
/// - Collapses consecutive underscores
/// - Trims leading/trailing dots and underscores
/// - Limits length to `STEM_MAX` bytes on a char boundary
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_underscore = false;

    for c in name.chars() {
        let replacement = if c == '\0' || c == '/' || c == '\\' || c.is_control() || c.is_whitespace() {
            '_'
        } else {
            c
        };

        if replacement == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(replacement);
            prev_underscore = false;
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');

    if trimmed.len() > STEM_MAX {
        let mut take = STEM_MAX;
        while take > 0 && !trimmed.is_char_boundary(take) {
            take -= 1;
        }
        trimmed[..take].to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_slash_and_backslash() {
        assert_eq!(sanitize_filename("a/b\\c"), "a_b_c");
    }

    #[test]
    fn trims_dots_and_spaces() {
        assert_eq!(sanitize_filename("  ..  cat  .. "), "cat");
    }

    #[test]
    fn collapses_underscores_and_whitespace() {
        assert_eq!(sanitize_filename("red  rose___2"), "red_rose_2");
    }

    #[test]
    fn truncates_on_char_boundary() {
        let long = "é".repeat(150);
        let out = sanitize_filename(&long);
        assert!(out.len() <= STEM_MAX);
        assert!(out.chars().all(|c| c == 'é'));
    }
}

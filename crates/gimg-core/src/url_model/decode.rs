//! Undo the escaping image URLs pick up inside inline script data.

use percent_encoding::percent_decode_str;

/// Decodes JavaScript string escapes (`\uXXXX`, `\xXX`, `\/`, `\\`) and then
/// percent-encoding. Malformed escapes are kept verbatim; never fails.
pub fn decode_url(raw: &str) -> String {
    let unescaped = decode_js_escapes(raw);
    percent_decode_str(&unescaped).decode_utf8_lossy().into_owned()
}

fn decode_js_escapes(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];
        let (decoded, consumed) = match tail.chars().next() {
            Some('u') => (hex_char(tail.get(1..5)), 5),
            Some('x') => (hex_char(tail.get(1..3)), 3),
            Some(c @ ('/' | '\\' | '"' | '\'')) => (Some(c), 1),
            _ => (None, 0),
        };
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &tail[consumed..];
            }
            None => {
                out.push('\\');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

fn hex_char(digits: Option<&str>) -> Option<char> {
    let digits = digits?;
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok().and_then(char::from_u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_unicode_escapes() {
        assert_eq!(
            decode_url(r"https://x.com/a.jpg?w\u003d800\u0026h\u003d600"),
            "https://x.com/a.jpg?w=800&h=600"
        );
    }

    #[test]
    fn decodes_escaped_slashes_and_hex() {
        assert_eq!(decode_url(r"https:\/\/x.com\/a\x2db.png"), "https://x.com/a-b.png");
    }

    #[test]
    fn decodes_percent_encoding() {
        assert_eq!(
            decode_url("https://x.com/red%20rose.jpg"),
            "https://x.com/red rose.jpg"
        );
    }

    #[test]
    fn malformed_escapes_are_kept() {
        assert_eq!(decode_url(r"https://x.com/\u00zz.jpg"), r"https://x.com/\u00zz.jpg");
        assert_eq!(decode_url(r"https://x.com/a\"), r"https://x.com/a\");
        assert_eq!(decode_url(r"https://x.com/\q"), r"https://x.com/\q");
    }

    #[test]
    fn plain_url_unchanged() {
        let u = "https://upload.example.org/wiki/Cat.jpg";
        assert_eq!(decode_url(u), u);
    }
}

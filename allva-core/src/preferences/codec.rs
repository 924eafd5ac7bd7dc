//! Line format of the preference file.
//!
//! One `key=value` pair per line. Backslash, `=`, CR and LF inside keys or
//! values are escaped (`\\`, `\=`, `\r`, `\n`) so any string survives a
//! reload. A line must contain exactly one unescaped `=`; anything else is
//! malformed and skipped by the reader.

/// Escape one key or value for the line format.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '=' => out.push_str("\\="),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out
}

/// `key=value` with both sides escaped.
pub fn encode_line(key: &str, value: &str) -> String {
    format!("{}={}", escape(key), escape(value))
}

/// Decode one line, or `None` if it does not hold exactly one separator.
pub fn decode_line(line: &str) -> Option<(String, String)> {
    let mut key = String::new();
    let mut value = String::new();
    let mut separators = 0usize;
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        let target = if separators == 0 { &mut key } else { &mut value };
        match ch {
            '\\' => match chars.next() {
                Some('n') => target.push('\n'),
                Some('r') => target.push('\r'),
                Some(other @ ('\\' | '=')) => target.push(other),
                // Unknown escapes are kept literally.
                Some(other) => {
                    target.push('\\');
                    target.push(other);
                }
                None => target.push('\\'),
            },
            '=' => separators += 1,
            other => target.push(other),
        }
    }

    (separators == 1).then_some((key, value))
}

/// Decode a whole file body, skipping malformed lines.
pub fn decode_all(contents: &str) -> impl Iterator<Item = (String, String)> + '_ {
    contents.lines().filter_map(decode_line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_pairs_decode() {
        assert_eq!(
            decode_line("last_user=9999"),
            Some(("last_user".into(), "9999".into()))
        );
        assert_eq!(decode_line("empty="), Some(("empty".into(), "".into())));
    }

    #[test]
    fn lines_without_exactly_one_separator_are_malformed() {
        assert_eq!(decode_line(""), None);
        assert_eq!(decode_line("no separator"), None);
        assert_eq!(decode_line("a=b=c"), None);
    }

    #[test]
    fn escaped_separators_survive() {
        let line = encode_line("token", "a=b==c");
        assert_eq!(line, "token=a\\=b\\=\\=c");
        assert_eq!(decode_line(&line), Some(("token".into(), "a=b==c".into())));
    }

    #[test]
    fn newlines_and_backslashes_survive() {
        let value = "C:\\Users\\allva\nsecond line\r";
        let line = encode_line("path", value);
        assert!(!line.contains('\n'));
        assert_eq!(decode_line(&line), Some(("path".into(), value.into())));
    }

    #[test]
    fn unknown_escapes_are_literal() {
        assert_eq!(
            decode_line("k=\\tab\\"),
            Some(("k".into(), "\\tab\\".into()))
        );
    }

    #[test]
    fn decode_all_skips_garbage_and_handles_crlf() {
        let body = "a=1\r\ngarbage\r\nb=2\r\nx=y=z\n";
        let pairs: Vec<_> = decode_all(body).collect();
        assert_eq!(
            pairs,
            vec![("a".into(), "1".into()), ("b".into(), "2".into())]
        );
    }
}

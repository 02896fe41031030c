//! Escaping for strings embedded in persistence tokens.
//!
//! The save file is line-oriented and its value fields use `|` and `:`
//! as separators, so species names are escaped before embedding:
//! newline, carriage return, backslash, pipe, and colon become
//! `\n \r \\ \| \:`.

/// Escapes separator and line-break characters.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\\' => out.push_str("\\\\"),
            '|' => out.push_str("\\|"),
            ':' => out.push_str("\\:"),
            _ => out.push(c),
        }
    }
    out
}

/// Inverse of [`escape`]. Unknown escape sequences are kept verbatim.
pub fn unescape(encoded: &str) -> String {
    let mut out = String::with_capacity(encoded.len());
    let mut chars = encoded.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some('|') => out.push('|'),
            Some(':') => out.push(':'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Splits on a separator, treating backslash-escaped characters as
/// content. Segments are returned still escaped; unescape fields
/// individually after splitting.
pub fn split_escaped(encoded: &str, separator: char) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = encoded.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            current.push(c);
            if let Some(next) = chars.next() {
                current.push(next);
            }
        } else if c == separator {
            segments.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    segments.push(current);
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_strings_pass_through() {
        assert_eq!(escape("Lettuce"), "Lettuce");
        assert_eq!(unescape("Lettuce"), "Lettuce");
    }

    #[test]
    fn test_separators_escaped() {
        assert_eq!(escape("a|b:c"), "a\\|b\\:c");
        assert_eq!(escape("line\nbreak"), "line\\nbreak");
    }

    #[test]
    fn test_round_trip() {
        for raw in ["", "plain", "a|b", "x:y", "back\\slash", "mix|:\\\n\r"] {
            assert_eq!(unescape(&escape(raw)), raw);
        }
    }

    #[test]
    fn test_unknown_escape_kept() {
        assert_eq!(unescape("\\q"), "\\q");
        assert_eq!(unescape("trailing\\"), "trailing\\");
    }

    #[test]
    fn test_split_ignores_escaped_separators() {
        let joined = format!("{}|{}", escape("Bell|Pepper"), escape("plain"));
        let parts = split_escaped(&joined, '|');
        assert_eq!(parts.len(), 2);
        assert_eq!(unescape(&parts[0]), "Bell|Pepper");
        assert_eq!(unescape(&parts[1]), "plain");
    }

    #[test]
    fn test_split_keeps_empty_segments() {
        assert_eq!(split_escaped("a||b", '|'), vec!["a", "", "b"]);
        assert_eq!(split_escaped("", '|'), vec![""]);
    }
}

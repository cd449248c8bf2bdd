//! Escape-aware text helpers.
//!
//! Templates use `\{`, `\}` and `\|` to carry literal braces and pipes
//! through expansion untouched. Every helper in this module walks raw bytes:
//! the metacharacters are all ASCII, so byte indexing never lands inside a
//! multi-byte character and slice boundaries stay valid UTF-8.
//!
//! The walk always consumes backslash pairs (`\` plus the byte after it), so
//! `\\{` reads as an escaped backslash followed by a live brace, while `\{`
//! reads as a literal brace.

use std::borrow::Cow;

/// True when the byte at `idx` is preceded by an odd-length run of
/// backslashes, i.e. the character there is escaped.
pub(crate) fn is_escaped(text: &str, idx: usize) -> bool {
    let bytes = text.as_bytes();
    let mut run = 0usize;
    while run < idx && bytes[idx - 1 - run] == b'\\' {
        run += 1;
    }
    run % 2 == 1
}

/// Split `content` on unescaped `|` bytes.
///
/// Always yields at least one segment. Empty segments are preserved: in
/// `text|` the trailing empty segment is a legitimate empty option.
pub(crate) fn split_unescaped_pipes(content: &str) -> Vec<&str> {
    let bytes = content.as_bytes();
    let mut segments = Vec::new();
    let mut start = 0usize;
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if i + 1 < bytes.len() => i += 2,
            b'|' => {
                segments.push(&content[start..i]);
                i += 1;
                start = i;
            }
            _ => i += 1,
        }
    }
    segments.push(&content[start..]);
    segments
}

/// True when `content` holds at least one unescaped `|`.
///
/// This is the block/placeholder discriminator: a brace group without an
/// unescaped pipe is personalization syntax, not spintax.
pub(crate) fn has_unescaped_pipe(content: &str) -> bool {
    let bytes = content.as_bytes();
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if i + 1 < bytes.len() => i += 2,
            b'|' => return true,
            _ => i += 1,
        }
    }
    false
}

/// Count unescaped `|` bytes in `content`.
pub(crate) fn count_unescaped_pipes(content: &str) -> usize {
    let bytes = content.as_bytes();
    let mut count = 0usize;
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if i + 1 < bytes.len() => i += 2,
            b'|' => {
                count += 1;
                i += 1;
            }
            _ => i += 1,
        }
    }
    count
}

/// Rewrite `\{`, `\}` and `\|` to their literal characters.
///
/// Borrows when `text` carries none of the three escape pairs. Any other
/// backslash sequence (`\\`, `\n`, a trailing lone `\`) is preserved
/// verbatim; an escaped backslash still consumes its pair, so the brace in
/// `\\{` stays a brace.
pub(crate) fn unescape(text: &str) -> Cow<'_, str> {
    let bytes = text.as_bytes();
    let mut out: Option<String> = None;
    let mut copied = 0usize;
    let mut i = 0usize;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 1 < bytes.len() {
            let next = bytes[i + 1];
            if matches!(next, b'{' | b'}' | b'|') {
                let buf = out.get_or_insert_with(|| String::with_capacity(text.len()));
                buf.push_str(&text[copied..i]);
                buf.push(next as char);
                i += 2;
                copied = i;
                continue;
            }
            i += 2;
            continue;
        }
        i += 1;
    }
    match out {
        Some(mut buf) => {
            buf.push_str(&text[copied..]);
            Cow::Owned(buf)
        }
        None => Cow::Borrowed(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_detection_counts_backslash_runs() {
        let text = r"a\{b";
        assert!(is_escaped(text, 2)); // the `{`

        let text = r"a\\{b";
        assert!(!is_escaped(text, 3)); // `\\` is a literal backslash

        let text = r"a\\\{b";
        assert!(is_escaped(text, 4));

        assert!(!is_escaped("{", 0));
    }

    #[test]
    fn splits_on_unescaped_pipes_only() {
        assert_eq!(split_unescaped_pipes("a|b|c"), vec!["a", "b", "c"]);
        assert_eq!(split_unescaped_pipes(r"a\|b|c"), vec![r"a\|b", "c"]);
        assert_eq!(split_unescaped_pipes("text|"), vec!["text", ""]);
        assert_eq!(split_unescaped_pipes("|||"), vec!["", "", "", ""]);
        assert_eq!(split_unescaped_pipes("solo"), vec!["solo"]);
        assert_eq!(split_unescaped_pipes(""), vec![""]);
    }

    #[test]
    fn pipe_presence_respects_escapes() {
        assert!(has_unescaped_pipe("a|b"));
        assert!(!has_unescaped_pipe(r"a\|b"));
        assert!(!has_unescaped_pipe("first_name"));
        assert_eq!(count_unescaped_pipes("a|b|c"), 2);
        assert_eq!(count_unescaped_pipes(r"a\|b|c"), 1);
        assert_eq!(count_unescaped_pipes("plain"), 0);
    }

    #[test]
    fn unescape_rewrites_the_three_pairs() {
        assert_eq!(unescape(r"literal \{brace\}"), "literal {brace}");
        assert_eq!(unescape(r"a\|b"), "a|b");
        assert_eq!(unescape(r"mixed \{x\} and \|"), "mixed {x} and |");
    }

    #[test]
    fn unescape_borrows_when_nothing_rewrites() {
        assert!(matches!(unescape("no escapes here"), Cow::Borrowed(_)));
        // A backslash that does not precede a metacharacter is left alone.
        assert!(matches!(unescape(r"C:\temp\new"), Cow::Borrowed(_)));
        assert_eq!(unescape(r"C:\temp\new"), r"C:\temp\new");
    }

    #[test]
    fn unescape_keeps_double_backslash_verbatim() {
        assert_eq!(unescape(r"a\\b"), r"a\\b");
        // The pair is consumed, so the following brace is not rewritten.
        assert_eq!(unescape(r"a\\{b"), r"a\\{b");
    }

    #[test]
    fn unescape_is_utf8_safe_around_escapes() {
        assert_eq!(unescape(r"héllo \{wörld\}"), "héllo {wörld}");
        assert_eq!(unescape("émoji 🎯 untouched"), "émoji 🎯 untouched");
    }

    #[test]
    fn unescape_keeps_trailing_lone_backslash() {
        assert_eq!(unescape(r"ends with \"), r"ends with \");
    }
}

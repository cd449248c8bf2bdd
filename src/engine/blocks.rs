//! Innermost brace-group detection.
//!
//! The engine resolves templates innermost-first: each pass substitutes only
//! the `{...}` spans that contain no nested unescaped braces. Those spans
//! are found with a compiled pattern and then classified by content. A group
//! counts as a spintax *block* only when its content holds at least one
//! unescaped `|`; single-token groups like `{first_name}` are
//! personalization placeholders owned by a downstream mail-merge step and
//! must flow through byte-for-byte.
//!
//! ```text
//! "Hi {first_name}, {glad|happy} to {meet|see} you"
//!      ^^^^^^^^^^^^  ^^^^^^^^^^^^    ^^^^^^^^^^
//!      placeholder   block           block
//! ```

use super::escape;
use crate::Range;

/// One innermost brace group found in a scan pass, braces included.
#[derive(Debug, Clone)]
pub(crate) struct GroupMatch {
    pub range: Range,
    /// True when the content holds an unescaped `|` (spintax block), false
    /// for placeholder-style groups.
    pub has_pipe: bool,
}

impl GroupMatch {
    /// Content between the braces, sliced out of the pass text.
    pub fn content<'t>(&self, text: &'t str) -> &'t str {
        &text[self.range.start + 1..self.range.end - 1]
    }
}

/// Find all non-overlapping innermost brace groups, left to right.
///
/// The pattern tolerates escape pairs inside the group, so `{a\{b|c}` is a
/// single group with content `a\{b|c`. The regex itself cannot look behind
/// the opening brace, so a candidate whose opener is escaped (odd backslash
/// run before it) is rejected here and the scan resumes one byte past it.
pub(crate) fn find_groups(text: &str) -> Vec<GroupMatch> {
    let pattern = regex!(r"(?s)\{(?:[^{}\\]|\\.)*\}");
    let mut groups = Vec::new();
    let mut at = 0usize;
    while let Some(m) = pattern.find_at(text, at) {
        if escape::is_escaped(text, m.start()) {
            at = m.start() + 1;
            continue;
        }
        let content = &text[m.start() + 1..m.end() - 1];
        groups.push(GroupMatch {
            range: Range { start: m.start(), end: m.end() },
            has_pipe: escape::has_unescaped_pipe(content),
        });
        at = m.end();
    }
    groups
}

/// Find only the resolvable spintax blocks: innermost groups whose content
/// has an unescaped `|`.
pub(crate) fn find_blocks(text: &str) -> Vec<GroupMatch> {
    find_groups(text).into_iter().filter(|g| g.has_pipe).collect()
}

/// Number of distinct variations choosable from the blocks resolvable on the
/// first pass: the product of per-block option counts, ignoring weights.
///
/// Saturates at `u64::MAX`. A template with no blocks has exactly one
/// rendering, so the empty product is 1.
pub fn count_block_variations(template: &str) -> u64 {
    find_blocks(template)
        .iter()
        .map(|g| escape::count_unescaped_pipes(g.content(template)) as u64 + 1)
        .fold(1u64, |acc, n| acc.saturating_mul(n))
}

/// True when resolving the first-pass blocks surfaces further blocks, so the
/// template needs more than one substitution pass and can reach more distinct
/// outputs than [`count_block_variations`] reports.
///
/// Option texts never contain unescaped braces or pipes, so which spans form
/// blocks on the next pass is independent of the choices made; splicing the
/// first-pass spans out and re-scanning answers the question exactly.
pub(crate) fn has_nested_blocks(template: &str) -> bool {
    let found = find_blocks(template);
    if found.is_empty() {
        return false;
    }
    let mut next = String::with_capacity(template.len());
    let mut cursor = 0usize;
    for group in &found {
        next.push_str(&template[cursor..group.range.start]);
        cursor = group.range.end;
    }
    next.push_str(&template[cursor..]);
    !find_blocks(&next).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents<'t>(text: &'t str) -> Vec<&'t str> {
        find_groups(text).iter().map(|g| g.content(text)).collect()
    }

    #[test]
    fn finds_simple_groups_left_to_right() {
        let text = "Hi {first_name}, {glad|happy} to connect";
        let groups = find_groups(text);
        assert_eq!(groups.len(), 2);
        assert!(!groups[0].has_pipe);
        assert!(groups[1].has_pipe);
        assert_eq!(contents(text), vec!["first_name", "glad|happy"]);
    }

    #[test]
    fn blocks_filter_drops_placeholders() {
        let text = "Hi {first_name}, {glad|happy} to connect";
        let blocks = find_blocks(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].content(text), "glad|happy");
    }

    #[test]
    fn nested_groups_match_innermost_only() {
        let text = "{outer {inner1|inner2} text|other}";
        assert_eq!(contents(text), vec!["inner1|inner2"]);
    }

    #[test]
    fn escaped_opener_is_rejected() {
        assert!(find_groups(r"\{a|b}").is_empty());
        // An escaped backslash before the brace leaves it live.
        let text = r"\\{a|b}";
        let groups = find_groups(text);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].content(text), "a|b");
    }

    #[test]
    fn escape_pairs_ride_inside_a_group() {
        let text = r"{a\{b|c}";
        let groups = find_groups(text);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].content(text), r"a\{b");
        assert!(groups[0].has_pipe);
    }

    #[test]
    fn fully_escaped_groups_never_match() {
        // `\{brace\}` cannot close: the `\}` is consumed as content and no
        // bare `}` follows.
        assert!(find_groups(r"literal \{brace\} text").is_empty());

        let text = r"literal \{brace\} and {A|B}";
        assert_eq!(contents(text), vec!["A|B"]);
    }

    #[test]
    fn unbalanced_input_matches_best_effort() {
        assert!(find_groups("{never closed").is_empty());
        assert_eq!(contents("} stray {a|b}"), vec!["a|b"]);
    }

    #[test]
    fn empty_group_matches_with_empty_content() {
        let text = "x {} y";
        let groups = find_groups(text);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].content(text), "");
        assert!(!groups[0].has_pipe);
    }

    #[test]
    fn nesting_detection_looks_one_pass_ahead() {
        assert!(!has_nested_blocks(""));
        assert!(!has_nested_blocks("no blocks at all"));
        assert!(!has_nested_blocks("Hi {first_name}"));
        assert!(!has_nested_blocks("{a|b} {c|d}"));
        assert!(has_nested_blocks("{x {p|q} y|z}"));
        assert!(has_nested_blocks("{u {x {p|q} y|z} w|v}"));
        // A placeholder inside a block stalls the block; nothing resolves,
        // so nothing new can surface.
        assert!(!has_nested_blocks("{greet {first_name}|hi}"));
    }

    #[test]
    fn variation_count_is_the_product_of_option_counts() {
        assert_eq!(count_block_variations(""), 1);
        assert_eq!(count_block_variations("no blocks at all"), 1);
        assert_eq!(count_block_variations("Hi {first_name}"), 1);
        assert_eq!(count_block_variations("{a|b}"), 2);
        assert_eq!(count_block_variations("{a|b} {c|d}"), 4);
        assert_eq!(count_block_variations("{a|b|c} x {d|e}"), 6);
        // Weights change the distribution, never the count.
        assert_eq!(count_block_variations("{A:9|B:1}"), 2);
        // Escaped pipes are content, not separators.
        assert_eq!(count_block_variations(r"{a\|b|c}"), 2);
        // Only first-pass (innermost) blocks count.
        assert_eq!(count_block_variations("{outer {inner1|inner2} text|other}"), 2);
    }
}

//! Option splitting and weighted selection.
//!
//! Block content splits on unescaped `|` into alternatives. An alternative
//! may bias selection with a trailing `:N` suffix where N is a whole number
//! of at least 1. Anything that does not parse as such a suffix is literal
//! text: interior colons (`https://...`), `:0`, or a digit run too large
//! for `u32` all stay part of the option.
//!
//! ```text
//! "definitely:3|maybe|perhaps"  =>  (definitely, 3) (maybe, 1) (perhaps, 1)
//! ```

use super::escape;
use super::rng::SpinRng;

/// One alternative of a spintax block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SpinOption<'a> {
    /// Replacement text, weight suffix stripped, escape pairs intact.
    pub text: &'a str,
    /// Selection weight, always at least 1.
    pub weight: u32,
}

/// Split block content into weighted options. Always yields at least one
/// option; content that reached the expander holds an unescaped `|`, so in
/// practice at least two.
pub(crate) fn parse_options(content: &str) -> Vec<SpinOption<'_>> {
    escape::split_unescaped_pipes(content).into_iter().map(parse_option).collect()
}

/// Parse a single alternative, honoring a trailing `:N` weight suffix.
fn parse_option(segment: &str) -> SpinOption<'_> {
    if let Some((text, digits)) = segment.rsplit_once(':') {
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(weight) = digits.parse::<u32>() {
                if weight >= 1 {
                    return SpinOption { text, weight };
                }
            }
        }
    }
    SpinOption { text: segment, weight: 1 }
}

/// Weighted choice: one uniform draw in `[0, total)`, then a walk over the
/// options subtracting weights until the draw lands inside one. Equal
/// weights degenerate to a uniform pick.
pub(crate) fn pick<'a>(options: &[SpinOption<'a>], rng: &mut SpinRng) -> &'a str {
    let Some(last) = options.last() else {
        return "";
    };
    let total: u64 = options.iter().map(|o| u64::from(o.weight)).sum();
    let mut draw = rng.pick(total);
    for option in options {
        let weight = u64::from(option.weight);
        if draw < weight {
            return option.text;
        }
        draw -= weight;
    }
    last.text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(content: &str) -> Vec<(String, u32)> {
        parse_options(content).into_iter().map(|o| (o.text.to_string(), o.weight)).collect()
    }

    #[test]
    fn default_weight_is_one() {
        assert_eq!(opts("Hi|Hello"), vec![("Hi".into(), 1), ("Hello".into(), 1)]);
    }

    #[test]
    fn trailing_suffix_sets_the_weight() {
        assert_eq!(
            opts("definitely:3|maybe|perhaps:2"),
            vec![("definitely".into(), 3), ("maybe".into(), 1), ("perhaps".into(), 2)]
        );
        // Only the last colon can introduce a suffix.
        assert_eq!(opts("a:b:2|x"), vec![("a:b".into(), 2), ("x".into(), 1)]);
    }

    #[test]
    fn non_weights_stay_literal() {
        assert_eq!(opts("go to https://a.b|x"), vec![("go to https://a.b".into(), 1), ("x".into(), 1)]);
        assert_eq!(opts("a:0|b"), vec![("a:0".into(), 1), ("b".into(), 1)]);
        assert_eq!(opts("a:twelve|b"), vec![("a:twelve".into(), 1), ("b".into(), 1)]);
        assert_eq!(opts("ends with:|b"), vec![("ends with:".into(), 1), ("b".into(), 1)]);
        // Too large for u32: literal, never clamped.
        assert_eq!(opts("a:99999999999999999999|b"), vec![("a:99999999999999999999".into(), 1), ("b".into(), 1)]);
    }

    #[test]
    fn empty_options_are_real_options() {
        assert_eq!(opts("text|"), vec![("text".into(), 1), ("".into(), 1)]);
        assert_eq!(opts("|||"), vec![("".into(), 1), ("".into(), 1), ("".into(), 1), ("".into(), 1)]);
    }

    #[test]
    fn escaped_pipes_stay_inside_an_option() {
        assert_eq!(opts(r"a\|b:2|c"), vec![(r"a\|b".into(), 2), ("c".into(), 1)]);
    }

    #[test]
    fn pick_returns_the_only_option() {
        let mut rng = SpinRng::from_seed_str("t");
        let options = parse_options("solo");
        assert_eq!(pick(&options, &mut rng), "solo");
    }

    #[test]
    fn pick_always_lands_on_an_option() {
        let mut rng = SpinRng::from_seed_str("pick-test");
        let options = parse_options("a|b:3|c");
        for _ in 0..200 {
            let choice = pick(&options, &mut rng);
            assert!(["a", "b", "c"].contains(&choice));
        }
    }
}

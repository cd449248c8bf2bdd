//! Coarse template pre-classification.
//!
//! One cheap escape-aware byte walk over the raw template produces a
//! [`TemplateMask`] plus brace-balance counts. The mask gates the expansion
//! fast path: a template without both an unescaped `{` and an unescaped `|`
//! cannot contain a spintax block, so the engine skips straight to
//! finalization. The walk is intentionally approximate in the other
//! direction (`HAS_BRACES | HAS_PIPES` does not guarantee a well-formed
//! block); the block scanner stays authoritative.

bitflags::bitflags! {
    /// Coarse features of a template, detected by [`TemplateScan::scan`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TemplateMask: u8 {
        /// At least one unescaped `{` or `}`.
        const HAS_BRACES = 1 << 0;
        /// At least one unescaped `|`.
        const HAS_PIPES = 1 << 1;
        /// At least one `\{`, `\}` or `\|` escape pair.
        const HAS_ESCAPES = 1 << 2;
        /// Unescaped braces never balanced out (unclosed opener or excess
        /// closer somewhere in the input).
        const UNBALANCED = 1 << 3;
    }
}

/// Result of the pre-scan: the feature mask plus balance counts used by the
/// validator to size its reporting pass.
#[derive(Debug, Clone, Copy)]
pub struct TemplateScan {
    pub mask: TemplateMask,
    /// Unescaped openers still open at end of input.
    pub unclosed: usize,
    /// Unescaped closers that had no matching opener.
    pub unexpected_close: usize,
}

impl TemplateScan {
    /// Scan `input` in one pass. Escape pairs are consumed whole, so escaped
    /// metacharacters never count toward the mask or the balance.
    pub fn scan(input: &str) -> Self {
        let bytes = input.as_bytes();
        let mut mask = TemplateMask::empty();
        let mut depth = 0usize;
        let mut unexpected_close = 0usize;
        let mut i = 0usize;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' if i + 1 < bytes.len() => {
                    if matches!(bytes[i + 1], b'{' | b'}' | b'|') {
                        mask |= TemplateMask::HAS_ESCAPES;
                    }
                    i += 2;
                    continue;
                }
                b'{' => {
                    mask |= TemplateMask::HAS_BRACES;
                    depth += 1;
                }
                b'}' => {
                    mask |= TemplateMask::HAS_BRACES;
                    if depth == 0 {
                        unexpected_close += 1;
                    } else {
                        depth -= 1;
                    }
                }
                b'|' => mask |= TemplateMask::HAS_PIPES,
                _ => {}
            }
            i += 1;
        }
        if depth > 0 || unexpected_close > 0 {
            mask |= TemplateMask::UNBALANCED;
        }
        TemplateScan { mask, unclosed: depth, unexpected_close }
    }

    /// True when no spintax block can exist: the input lacks an unescaped
    /// `{` or an unescaped `|`.
    pub fn pass_through(&self) -> bool {
        !self.mask.contains(TemplateMask::HAS_BRACES) || !self.mask.contains(TemplateMask::HAS_PIPES)
    }
}

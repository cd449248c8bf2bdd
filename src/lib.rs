use thiserror::Error;

#[macro_use]
mod macros;
mod api;
mod engine;


pub use api::{
    DEFAULT_PREVIEW_COUNT, ExpansionResult, PassSummary, SpinDetails, SpinOptions, SpinReport,
    ValidationResult, count_variations, generate_previews, spin, spin_for_prospect,
    spin_verbose_with, spin_with, validate,
};
pub use engine::{DEFAULT_MAX_PASSES, TemplateMask};

// --- Internal types ---------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Range {
    /// Start byte index (inclusive).
    pub start: usize,
    /// End byte index (exclusive).
    pub end: usize,
}

/// A structural problem found in a template by [`validate`].
///
/// These are advisory diagnostics for template authors: the expansion
/// functions stay defined for the same input and make a best-effort pass
/// over whatever blocks they can still match.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Opening braces that were never closed before the end of input.
    #[error("{count} unclosed opening brace(s)")]
    UnbalancedOpen { count: usize },

    /// A closing brace with no matching opener, at byte `position`.
    #[error("unexpected closing brace at byte {position}")]
    UnexpectedClose { position: usize },

    /// An empty `{}` group, at byte `position`.
    #[error("empty block at byte {position}")]
    EmptyBlock { position: usize },

    /// A group containing nothing but `|` separators, at byte `position`.
    #[error("block at byte {position} contains only separators")]
    SeparatorOnly { position: usize },
}

//! Expansion run metrics.
//!
//! This module defines a small set of structs used to observe and debug
//! engine performance and behavior.
//!
//! The intended usage is:
//!
//! - `Expander::run` for normal operation.
//! - `Expander::run_with_metrics` for profiling, debugging regressions, and
//!   inspecting what each substitution pass resolved.
//!
//! Metrics are intentionally simple and *opt-in*:
//!
//! - The hot path avoids collecting per-pass choice lists.
//! - Callers can choose the level of visibility they want.
//!
//! ## Design notes
//!
//! - `PassMetrics::choices` is primarily for debugging and may allocate; it
//!   is only populated when the pass trace is enabled.

use super::expander::Expansion;
use std::time::Duration;

// --- Metrics -----------------------------------------------------------------

#[derive(Debug, Default, Clone)]
pub struct RunMetrics {
    /// Total elapsed time for [`Expander::run_with_metrics`].
    pub total: Duration,
    /// Cumulative time spent in the substitution loop.
    pub expansion: ExpansionMetrics,
    /// Time spent trimming and unescaping the final output.
    pub finalize: Duration,
}

/// Timings for the substitution loop.
#[derive(Debug, Default, Clone)]
pub struct ExpansionMetrics {
    /// Total elapsed time across all passes, terminal scan included.
    pub total: Duration,
    /// Metrics for each productive substitution pass.
    pub passes: Vec<PassMetrics>,
}

/// Timing and substitution counts for a single pass.
#[derive(Debug, Default, Clone)]
pub struct PassMetrics {
    /// Elapsed time for the pass.
    pub duration: Duration,
    /// Number of blocks substituted during the pass.
    pub resolved: usize,
    /// Option texts chosen during the pass (populated only when the pass
    /// trace is enabled).
    pub choices: Vec<String>,
}

/// Expander output bundled with timing information.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// The expansion outcome.
    pub expansion: Expansion,
    /// Timing measurements for the run.
    pub metrics: RunMetrics,
}

//! Iterative innermost-first expansion.
//!
//! This module is the operational core of the engine:
//!
//! - Pre-classify the template into a coarse mask (see `scanner.rs`) and
//!   skip straight to finalization when no block can exist.
//! - Repeatedly substitute every innermost spintax block (see `blocks.rs`),
//!   so nested blocks surface one level per pass.
//! - Stop at the fixpoint (no blocks left) or at the `max_passes` bound.
//! - Finalize: trim surrounding whitespace, then unescape `\{`, `\}`, `\|`.
//!
//! ## Pass structure
//!
//! ```text
//! (0) coarse scan         -> TemplateMask (fast path for block-free input)
//! (1) substitution pass   -> every innermost block replaced at once
//! (2) iterative passes    -> newly surfaced blocks, until fixpoint or bound
//! (3) finalize            -> trim + unescape
//! ```
//!
//! Termination is structural: a chosen option comes from inside an innermost
//! group, so it contains no unescaped braces, and each substitution removes
//! one unescaped brace pair while introducing none. `max_passes` stays as
//! the hard bound callers can rely on for adversarial input. Hitting the
//! bound is soft degradation, never an error: the partially expanded text is
//! finalized and returned with the run flagged `exhausted`.
//!
//! ## Debugging
//!
//! Setting `SPINDRIFT_DEBUG_PASSES=1` prints a trace line per pass and per
//! substituted block.

use super::blocks::{self, GroupMatch};
use super::escape;
use super::metrics::{ExpansionMetrics, PassMetrics, RunMetrics, RunResult};
use super::options;
use super::rng::SpinRng;
use super::scanner::{TemplateMask, TemplateScan};
use std::time::Instant;

/// Default bound on substitution passes.
pub const DEFAULT_MAX_PASSES: usize = 100;

/// Outcome of one expansion run. Per-pass counts and timings live in
/// [`super::metrics::RunMetrics`].
#[derive(Debug, Clone)]
pub struct Expansion {
    /// Final text: blocks resolved (best-effort on malformed input),
    /// trimmed, unescaped.
    pub output: String,
    /// Option texts chosen, in substitution order across all passes.
    pub selections: Vec<String>,
    /// True when `max_passes` stopped the run with blocks still unresolved.
    pub exhausted: bool,
}

/// Expander orchestrates substitution passes over one template.
///
/// Usage: create with `Expander::new(template, max_passes)` then call
/// `run(&mut rng)`, or `run_with_metrics` to keep timing details.
///
/// High-level flow inside `run`:
///
/// ```text
/// new() -> scan mask ──(no block possible)──> finalize()
///                │
///                └─ substitute innermost blocks, pass by pass
/// ```
#[derive(Debug)]
pub struct Expander<'a> {
    /// Template text being expanded.
    template: &'a str,
    /// Coarse signals from the pre-scan.
    scan: TemplateScan,
    /// Bound on substitution passes.
    max_passes: usize,
}

impl<'a> Expander<'a> {
    /// Create a new `Expander` for `template`.
    pub fn new(template: &'a str, max_passes: usize) -> Self {
        Expander { template, scan: TemplateScan::scan(template), max_passes }
    }

    /// Coarse template classification computed at construction.
    pub fn mask(&self) -> TemplateMask {
        self.scan.mask
    }

    /// Run the expansion, discarding timing details.
    pub fn run(self, rng: &mut SpinRng) -> Expansion {
        self.run_with_metrics(rng).expansion
    }

    /// Run the expansion and keep per-pass timing details.
    pub fn run_with_metrics(self, rng: &mut SpinRng) -> RunResult {
        let total_start = Instant::now();
        let debug = std::env::var_os("SPINDRIFT_DEBUG_PASSES").is_some();

        let mut expansion_metrics = ExpansionMetrics::default();
        let mut selections: Vec<String> = Vec::new();
        let mut passes = 0usize;
        let mut exhausted = false;

        let mut text = self.template.to_string();
        if !self.scan.pass_through() {
            let expansion_start = Instant::now();
            loop {
                let pass_start = Instant::now();
                let found = blocks::find_blocks(&text);
                if found.is_empty() {
                    break;
                }
                if passes >= self.max_passes {
                    exhausted = true;
                    if debug {
                        eprintln!("[pass:bound] max_passes={} hit with {} block(s) unresolved", self.max_passes, found.len());
                    }
                    break;
                }

                let (next, chosen) = substitute(&text, &found, rng);
                if debug {
                    eprintln!("[pass:{}] resolved={} choices={:?}", passes, found.len(), chosen);
                }

                // Choice lists are debugging aids; skip the copy on the hot path.
                let choices = if debug { chosen.clone() } else { Vec::new() };
                expansion_metrics.passes.push(PassMetrics {
                    duration: pass_start.elapsed(),
                    resolved: found.len(),
                    choices,
                });

                selections.extend(chosen);
                text = next;
                passes += 1;
            }
            expansion_metrics.total = expansion_start.elapsed();
        }

        let finalize_start = Instant::now();
        let output = finalize(&text);
        let finalize_elapsed = finalize_start.elapsed();

        RunResult {
            expansion: Expansion { output, selections, exhausted },
            metrics: RunMetrics {
                total: total_start.elapsed(),
                expansion: expansion_metrics,
                finalize: finalize_elapsed,
            },
        }
    }
}

/// Replace every found block with one weighted-chosen option and rebuild the
/// pass text. `found` is non-overlapping and ordered, which is how the block
/// scanner produces it. Returns the rebuilt text plus the chosen texts in
/// order.
fn substitute(text: &str, found: &[GroupMatch], rng: &mut SpinRng) -> (String, Vec<String>) {
    let debug = std::env::var_os("SPINDRIFT_DEBUG_PASSES").is_some();

    let mut next = String::with_capacity(text.len());
    let mut chosen = Vec::with_capacity(found.len());
    let mut cursor = 0usize;
    for group in found {
        next.push_str(&text[cursor..group.range.start]);
        let opts = options::parse_options(group.content(text));
        let choice = options::pick(&opts, rng);
        if debug {
            eprintln!(
                "[block:choice] span={}..{} options={} choice={:?}",
                group.range.start,
                group.range.end,
                opts.len(),
                choice
            );
        }
        next.push_str(choice);
        chosen.push(choice.to_string());
        cursor = group.range.end;
    }
    next.push_str(&text[cursor..]);
    (next, chosen)
}

/// Trim surrounding whitespace, then unescape.
fn finalize(text: &str) -> String {
    escape::unescape(text.trim()).into_owned()
}

//! Spintax expansion engine.
//!
//! This module is the *entry point* for the engine internals. The engine is
//! split into focused submodules under `src/engine/` while keeping paths
//! stable (for example `crate::engine::Expander` and
//! `crate::engine::TemplateMask`).
//!
//! ## How the parts work together
//!
//! At a high level, expanding a template is a pipeline:
//!
//! ```text
//! template ── TemplateScan::scan ──┬─ coarse mask        (scanner.rs)
//!                                  │  fast path: no `{` or no `|`
//!                                  v
//!                        Expander::run (expander.rs)
//!                          - find innermost groups       (blocks.rs)
//!                          - split options + weights     (options.rs)
//!                          - weighted pick               (rng.rs)
//!                          - substitute, repeat to fixpoint or bound
//!                                  │
//!                                  v
//!                        finalize: trim + unescape       (escape.rs)
//!                                  │
//!                                  v
//!                              Expansion
//! ```
//!
//! The engine leans on **iteration**: only innermost blocks are substituted
//! each pass, so nested spintax becomes flat one level at a time and the
//! block grammar never needs a recursive parse. Termination is structural
//! (every substitution removes an unescaped brace pair) with `max_passes` as
//! the hard bound.
//!
//! ## Responsibilities by module
//!
//! - `scanner.rs`: coarse pre-classification (`TemplateMask`) gating the
//!   expansion work.
//! - `escape.rs`: escape-aware splitting, counting and final unescaping.
//! - `blocks.rs`: innermost brace-group detection and block/placeholder
//!   classification.
//! - `options.rs`: option splitting, `:N` weight parsing, weighted choice.
//! - `rng.rs`: the random source, seeded (SHA-256 into ChaCha8) or from OS
//!   entropy.
//! - `expander.rs`: the substitution loop, pass bound and finalization.
//! - `validate.rs`: advisory structural diagnostics.
//! - `metrics.rs`: optional timing data for runs and passes.
//!
//! ## Public surface
//!
//! Most code interacts with the engine via:
//!
//! - [`Expander`] (and [`SpinRng`] to drive it)
//! - [`TemplateMask`] (coarse classification, also surfaced in verbose
//!   results)
//! - [`validate_template`] for diagnostics
//!
//! The crate-level API in `src/api.rs` wraps these.
//!
//! ## Debugging
//!
//! Set `SPINDRIFT_DEBUG_PASSES=1` to print per-pass substitution traces.

#[path = "engine/blocks.rs"]
mod blocks;
#[path = "engine/escape.rs"]
mod escape;
#[path = "engine/expander.rs"]
mod expander;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/options.rs"]
mod options;
#[path = "engine/rng.rs"]
mod rng;
#[path = "engine/scanner.rs"]
mod scanner;
#[path = "engine/validate.rs"]
mod validate;

#[allow(unused_imports)]
pub use blocks::count_block_variations;
#[allow(unused_imports)]
pub(crate) use blocks::has_nested_blocks;
#[allow(unused_imports)]
pub use expander::{DEFAULT_MAX_PASSES, Expander, Expansion};
#[allow(unused_imports)]
pub use metrics::{ExpansionMetrics, PassMetrics, RunMetrics, RunResult};
#[allow(unused_imports)]
pub use rng::SpinRng;
#[allow(unused_imports)]
pub use scanner::{TemplateMask, TemplateScan};
#[allow(unused_imports)]
pub(crate) use validate::validate_template;

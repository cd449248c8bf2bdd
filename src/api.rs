use crate::ValidationError;
use crate::engine::{self, DEFAULT_MAX_PASSES, Expander, SpinRng, TemplateMask};
use std::collections::HashSet;
use std::time::Duration;

/// Preview count used when a caller has no better idea; see
/// [`generate_previews`].
pub const DEFAULT_PREVIEW_COUNT: usize = 5;

/// Options that affect expansion behavior.
#[derive(Debug, Clone)]
pub struct SpinOptions {
    /// When set, every random choice is derived from this seed: the same
    /// template plus the same seed yields byte-identical output across
    /// calls, threads and processes. Key it by a stable identity (such as a
    /// prospect id) to pin a recipient to one rendering.
    pub seed: Option<String>,
    /// Bound on substitution passes, default [`DEFAULT_MAX_PASSES`]. When
    /// hit, the partially expanded text is finalized and returned as-is; it
    /// may still contain literal `{...}` spans.
    pub max_passes: usize,
    /// Populate [`ExpansionResult::original`] with a copy of the template
    /// (default true). Bulk callers can turn this off to skip the copy.
    pub preserve_original: bool,
}

impl Default for SpinOptions {
    fn default() -> Self {
        Self { seed: None, max_passes: DEFAULT_MAX_PASSES, preserve_original: true }
    }
}

/// Result from [`spin`] and [`spin_with`].
#[derive(Debug, Clone)]
pub struct ExpansionResult {
    /// The expanded message: blocks resolved, surrounding whitespace
    /// trimmed, `\{`/`\}`/`\|` rewritten to literals.
    pub output: String,
    /// The template as given, kept for campaign auditing. Empty when
    /// [`SpinOptions::preserve_original`] is off.
    pub original: String,
    /// Distinct messages the template can produce: the product of option
    /// counts over first-pass blocks, ignoring weights (saturating).
    pub variations_count: u64,
    /// Option texts chosen, in substitution order (weight suffixes
    /// stripped, escape pairs as authored).
    pub options_selected: Vec<String>,
}

/// Result from [`validate`].
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// True when no structural problem was found.
    pub valid: bool,
    /// Problems in scan order; empty when `valid`.
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// Errors rendered as display strings, ready to surface to template
    /// authors.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.to_string()).collect()
    }
}

/// A compact per-pass trace for verbose runs.
#[derive(Debug, Clone)]
pub struct PassSummary {
    pub pass: usize,
    pub duration: Duration,
    /// Blocks substituted during the pass.
    pub resolved: usize,
    /// Sampled option choices, at most 8 (populated only when the pass
    /// trace is enabled).
    pub choices: Vec<String>,
}

/// Additional details returned by [`spin_verbose_with`].
///
/// This is intentionally compact: it is meant for debugging and performance
/// inspection without dumping the entire internal state.
#[derive(Debug, Clone)]
pub struct SpinDetails {
    /// Total elapsed time.
    pub total: Duration,
    /// Time spent in the substitution loop + per-pass trace.
    pub expansion_total: Duration,
    pub passes: Vec<PassSummary>,
    /// Time spent trimming and unescaping the final output.
    pub finalize: Duration,
    /// Coarse template classification from the pre-scan.
    pub mask: TemplateMask,
    /// Distinct messages the template can produce (same as the result
    /// field, surfaced here for report printing).
    pub variations: u64,
    /// True when the pass bound stopped the run with blocks unresolved.
    pub exhausted: bool,
}

/// Result from [`spin_verbose`] and [`spin_verbose_with`].
#[derive(Debug, Clone)]
pub struct SpinReport {
    pub result: ExpansionResult,
    pub elapsed: Duration,
    pub details: SpinDetails,
}

/// Expand `template` with default options: fresh entropy and the default
/// pass bound.
///
/// # Example
/// ```
/// use spindrift::spin;
///
/// let out = spin("{Hi|Hello} there");
/// assert!(out.output == "Hi there" || out.output == "Hello there");
/// ```
pub fn spin(template: &str) -> ExpansionResult {
    spin_with(template, &SpinOptions::default())
}

/// Expand `template` with the provided options.
///
/// Total over any input: malformed spintax gets a best-effort pass and
/// never an error (see [`validate`] for the advisory diagnostics).
pub fn spin_with(template: &str, options: &SpinOptions) -> ExpansionResult {
    let mut rng = rng_for(options);
    let expansion = Expander::new(template, options.max_passes).run(&mut rng);

    ExpansionResult {
        output: expansion.output,
        original: if options.preserve_original { template.to_string() } else { String::new() },
        variations_count: count_variations(template),
        options_selected: expansion.selections,
    }
}

/// Expand `template` deterministically for one prospect.
///
/// The spin is seeded with `prospect_id`, so a retried or re-rendered send
/// reproduces the same variation and the conversation history stays
/// consistent for that recipient.
///
/// # Example
/// ```
/// use spindrift::spin_for_prospect;
///
/// let template = "{Hi|Hello} {first_name}";
/// let a = spin_for_prospect(template, "prospect-42");
/// let b = spin_for_prospect(template, "prospect-42");
/// assert_eq!(a.output, b.output);
/// ```
pub fn spin_for_prospect(template: &str, prospect_id: &str) -> ExpansionResult {
    spin_with(template, &SpinOptions { seed: Some(prospect_id.to_string()), ..SpinOptions::default() })
}

/// Count the distinct messages choosable from the template's first-pass
/// blocks, ignoring weights. A template with no blocks counts as 1.
///
/// # Example
/// ```
/// use spindrift::count_variations;
///
/// assert_eq!(count_variations("{a|b} {c|d}"), 4);
/// assert_eq!(count_variations("Hi {first_name}"), 1);
/// ```
pub fn count_variations(template: &str) -> u64 {
    engine::count_block_variations(template)
}

/// Check `template` for structural problems.
///
/// Advisory only: [`spin`] stays defined for the same input. Composition
/// UIs run this before a campaign launches and show
/// [`ValidationResult::messages`] to the author.
///
/// # Example
/// ```
/// use spindrift::validate;
///
/// assert!(validate("text {A|B} more").valid);
/// assert!(!validate("{A|B} {}").valid);
/// ```
pub fn validate(template: &str) -> ValidationResult {
    let errors = engine::validate_template(template);
    ValidationResult { valid: errors.is_empty(), errors }
}

/// Produce up to `count` *distinct* expansions of `template`, each from
/// fresh entropy.
///
/// Outputs are deduplicated. Attempts are capped at `count * 10`, and the
/// loop stops early once the template cannot yield more distinct outputs
/// than already collected: a flat template with 2 variations asked for 5
/// previews returns 2. Templates with nested blocks can reach more outputs
/// than [`count_variations`] reports, so they run on the caps alone.
/// [`DEFAULT_PREVIEW_COUNT`] is a reasonable `count` for composition UIs.
pub fn generate_previews(template: &str, count: usize) -> Vec<String> {
    if count == 0 {
        return Vec::new();
    }
    // The first-pass variation count is exact only for templates that
    // settle in one pass.
    let target = if engine::has_nested_blocks(template) {
        count
    } else {
        let variations = usize::try_from(count_variations(template)).unwrap_or(usize::MAX);
        count.min(variations)
    };
    let attempts = count.saturating_mul(10);

    let mut seen: HashSet<String> = HashSet::new();
    let mut previews: Vec<String> = Vec::new();
    for _ in 0..attempts {
        if previews.len() >= target {
            break;
        }
        let mut rng = SpinRng::from_entropy();
        let expansion = Expander::new(template, DEFAULT_MAX_PASSES).run(&mut rng);
        if seen.insert(expansion.output.clone()) {
            previews.push(expansion.output);
        }
    }
    previews
}

#[allow(dead_code)]
pub fn spin_verbose(template: &str) -> SpinReport {
    spin_verbose_with(template, &SpinOptions::default())
}

/// Expand `template` and return extra (compact) debug details.
///
/// This is useful for profiling and template debugging. The default
/// [`spin_with`] path does not allocate these extra traces.
pub fn spin_verbose_with(template: &str, options: &SpinOptions) -> SpinReport {
    let mut rng = rng_for(options);
    let expander = Expander::new(template, options.max_passes);
    let mask = expander.mask();

    let run = expander.run_with_metrics(&mut rng);
    let variations = count_variations(template);

    let passes: Vec<PassSummary> = run
        .metrics
        .expansion
        .passes
        .iter()
        .enumerate()
        .map(|(idx, pass)| PassSummary {
            pass: idx,
            duration: pass.duration,
            resolved: pass.resolved,
            choices: pass.choices.iter().take(8).cloned().collect(),
        })
        .collect();

    let details = SpinDetails {
        total: run.metrics.total,
        expansion_total: run.metrics.expansion.total,
        passes,
        finalize: run.metrics.finalize,
        mask,
        variations,
        exhausted: run.expansion.exhausted,
    };

    let result = ExpansionResult {
        output: run.expansion.output,
        original: if options.preserve_original { template.to_string() } else { String::new() },
        variations_count: variations,
        options_selected: run.expansion.selections,
    };

    SpinReport { result, elapsed: run.metrics.total, details }
}

fn rng_for(options: &SpinOptions) -> SpinRng {
    match &options.seed {
        Some(seed) => SpinRng::from_seed_str(seed),
        None => SpinRng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: &str) -> SpinOptions {
        SpinOptions { seed: Some(seed.to_string()), ..SpinOptions::default() }
    }

    #[test]
    fn spin_with_resolves_blocks() {
        let res = spin_with("{glad|happy} to connect", &seeded("api"));

        assert!(res.output == "glad to connect" || res.output == "happy to connect");
        assert_eq!(res.original, "{glad|happy} to connect");
        assert_eq!(res.variations_count, 2);
        assert_eq!(res.options_selected.len(), 1);
    }

    #[test]
    fn preserve_original_off_leaves_it_empty() {
        let opts = SpinOptions { preserve_original: false, ..seeded("api") };
        let res = spin_with("{a|b}", &opts);
        assert!(res.original.is_empty());
        assert!(!res.output.is_empty());
    }

    #[test]
    fn spin_verbose_includes_metrics_and_mask() {
        let res = spin_verbose_with("{glad|happy} to connect", &seeded("verbose"));

        assert_eq!(res.elapsed, res.details.total);
        assert!(res.details.expansion_total <= res.details.total);
        assert!(res.details.mask.contains(TemplateMask::HAS_BRACES | TemplateMask::HAS_PIPES));
        assert_eq!(res.details.variations, 2);
        assert_eq!(res.details.passes.len(), 1);
        assert_eq!(res.details.passes[0].resolved, 1);
        assert!(!res.details.exhausted);
    }

    #[test]
    fn previews_are_distinct_and_capped_by_the_template() {
        let previews = generate_previews("{A|B}", 10);
        assert_eq!(previews.len(), 2);
        assert_ne!(previews[0], previews[1]);

        assert!(generate_previews("no blocks here", 5).len() == 1);
        assert!(generate_previews("{A|B}", 0).is_empty());
    }

    #[test]
    fn validation_messages_render() {
        let res = validate("{A|B} {}");
        assert!(!res.valid);
        assert_eq!(res.messages().len(), 1);
        assert!(res.messages()[0].contains("empty block"));
    }
}

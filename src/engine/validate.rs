//! Structural template validation.
//!
//! Validation is advisory: the expander stays defined for every input, so a
//! malformed template can never fail a send mid-campaign. Composition UIs
//! call this before a campaign launches and surface the diagnostics to the
//! template author instead.
//!
//! Checks, in scan order:
//!
//! - every excess closing brace (one error per occurrence, with position)
//! - unclosed opening braces (one error carrying the count)
//! - empty `{}` groups
//! - groups containing nothing but `|` separators (`{|}`, `{||}`, ...)

use super::blocks;
use super::scanner::{TemplateMask, TemplateScan};
use crate::ValidationError;

/// Collect structural problems in `template`. Never panics; an empty result
/// means the template is well-formed.
pub(crate) fn validate_template(template: &str) -> Vec<ValidationError> {
    let scan = TemplateScan::scan(template);
    if !scan.mask.contains(TemplateMask::HAS_BRACES) {
        return Vec::new();
    }

    let mut errors = Vec::new();

    if scan.unclosed > 0 || scan.unexpected_close > 0 {
        balance_errors(template, &mut errors);
    }

    for group in blocks::find_groups(template) {
        let content = group.content(template);
        if content.is_empty() {
            errors.push(ValidationError::EmptyBlock { position: group.range.start });
        } else if content.bytes().all(|b| b == b'|') {
            errors.push(ValidationError::SeparatorOnly { position: group.range.start });
        }
    }

    errors
}

/// Escape-aware brace balance walk. The pre-scan only counts; this re-walk
/// recovers byte positions for the excess closers.
fn balance_errors(template: &str, errors: &mut Vec<ValidationError>) {
    let bytes = template.as_bytes();
    let mut depth = 0usize;
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if i + 1 < bytes.len() => {
                i += 2;
                continue;
            }
            b'{' => depth += 1,
            b'}' => {
                if depth == 0 {
                    errors.push(ValidationError::UnexpectedClose { position: i });
                } else {
                    depth -= 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    if depth > 0 {
        errors.push(ValidationError::UnbalancedOpen { count: depth });
    }
}

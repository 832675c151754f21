//! Longest-prefix style resolution.
//!
//!     A theme selector matches a token scope when the selector's
//!     dot-separated segments are a prefix of the scope's segments:
//!     `string` matches `string.quoted.double`, but `str` does not. The
//!     specificity of a match is the selector's segment count. Across every
//!     (token scope x selector) pair, the highest specificity wins; ties
//!     keep the first highest-scoring match encountered while scanning the
//!     theme's rules in declared order. This mirrors most-specific-selector
//!     resolution in cascading style systems and must stay deterministic
//!     for visual parity across runs.

use super::definition::{Style, Theme};

/// True when every dot-separated segment of `selector` prefixes `scope`.
pub fn selector_matches(selector: &str, scope: &str) -> bool {
    scope == selector
        || (scope.len() > selector.len()
            && scope.starts_with(selector)
            && scope.as_bytes()[selector.len()] == b'.')
}

/// Specificity of a selector: its number of dot-separated segments.
fn specificity(selector: &str) -> usize {
    selector.split('.').count()
}

/// Resolve a token's scope path against a theme. Returns the empty style
/// when nothing matches.
pub fn resolve(scopes: &[String], theme: &Theme) -> Style {
    let mut best: Option<(&Style, usize)> = None;

    for rule in &theme.rules {
        for selector in rule.scope.as_slice() {
            for scope in scopes {
                if !selector_matches(selector, scope) {
                    continue;
                }
                let score = specificity(selector);
                // Strictly greater, so ties keep the earliest rule.
                if best.map_or(true, |(_, held)| score > held) {
                    best = Some((&rule.style, score));
                }
            }
        }
    }

    best.map(|(style, _)| style.clone()).unwrap_or_default()
}

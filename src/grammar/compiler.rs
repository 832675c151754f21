//! Pattern compiler.
//!
//!     Turns a raw grammar document into a compiled [`Grammar`]: every
//!     match/begin/end expression becomes a reusable `regex::Regex` able to
//!     test "does this rule match starting exactly at offset N" without
//!     rescanning the line. Compilation is depth-first and covers nested
//!     pattern lists and every repository group.
//!
//!     An invalid expression is a load-time error, fatal for the grammar as
//!     a whole; it is never retried and never degraded to a partial grammar.

use std::collections::HashMap;
use std::sync::Arc;

use regex::Regex;

use super::definition::{RawGrammar, RawPattern};
use super::{Grammar, GrammarError, IncludeRef, Pattern};

/// Compile a raw grammar document into its immutable, shareable form.
pub fn compile(raw: RawGrammar) -> Result<Grammar, GrammarError> {
    let patterns = compile_list(&raw.patterns, "patterns")?;

    let mut repository = HashMap::new();
    for (group, rules) in &raw.repository {
        repository.insert(group.clone(), Arc::new(compile_list(rules, group)?));
    }

    Ok(Grammar {
        name: raw.name,
        scope_name: raw.scope_name,
        patterns: Arc::new(patterns),
        repository,
        keywords: raw.keywords,
    })
}

fn compile_list(rules: &[RawPattern], context: &str) -> Result<Vec<Pattern>, GrammarError> {
    rules.iter().map(|rule| compile_pattern(rule, context)).collect()
}

fn compile_pattern(rule: &RawPattern, context: &str) -> Result<Pattern, GrammarError> {
    if let Some(target) = &rule.include {
        let reference = if target == "$self" {
            IncludeRef::SelfRef
        } else {
            IncludeRef::Repository(target.trim_start_matches('#').to_string())
        };
        return Ok(Pattern::Include(reference));
    }

    if let (Some(begin), Some(end)) = (&rule.begin, &rule.end) {
        let nested = match &rule.patterns {
            Some(list) => compile_list(list, context)?,
            None => Vec::new(),
        };
        return Ok(Pattern::BeginEnd {
            begin: compile_expr(begin, context)?,
            end: compile_expr(end, context)?,
            scope: rule.name.clone(),
            patterns: Arc::new(nested),
        });
    }

    if let Some(expr) = &rule.match_expr {
        return Ok(Pattern::Match {
            regex: compile_expr(expr, context)?,
            scope: rule.name.clone(),
        });
    }

    Err(GrammarError::InvalidExpression {
        context: context.to_string(),
        message: "rule has no match, begin/end pair, or include".to_string(),
    })
}

fn compile_expr(expr: &str, context: &str) -> Result<Regex, GrammarError> {
    Regex::new(expr).map_err(|e| GrammarError::InvalidExpression {
        context: context.to_string(),
        message: e.to_string(),
    })
}

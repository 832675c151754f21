//! Grammar model and compilation.
//!
//!     A grammar is a declarative rule set describing how to tokenize one
//!     language: an ordered list of top-level patterns plus a repository of
//!     named pattern groups that rules reference by name. Grammars are
//!     compiled once at load time and shared read-only afterwards; nothing in
//!     the tokenizer ever mutates one.
//!
//!     Includes are resolved lazily by name at match time rather than being
//!     flattened eagerly, so mutually-recursive groups (A includes B, B
//!     includes A) and `$self` references never require infinite expansion.
//!
//! Document format
//!
//!     Grammar documents are JSON. See [definition] for the raw shape and
//!     [registry] for the built-in languages embedded into the binary.

pub mod compiler;
pub mod definition;
pub mod registry;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use regex::Regex;

pub use compiler::compile;
pub use definition::{RawGrammar, RawPattern};
pub use registry::{builtin, builtin_names};

/// A compiled, immutable grammar identified by its root scope name.
#[derive(Debug)]
pub struct Grammar {
    /// Language identifier, e.g. `javascript`
    pub name: String,
    /// Root scope carried by every token, e.g. `source.js`
    pub scope_name: String,
    /// Top-level patterns in declaration order
    pub patterns: Arc<Vec<Pattern>>,
    /// Named pattern groups, looked up on demand by include patterns
    pub repository: HashMap<String, Arc<Vec<Pattern>>>,
    /// Flat keyword-to-scope mapping consumed by the fast scanner
    pub keywords: HashMap<String, String>,
}

impl Grammar {
    /// Load and compile a grammar from a JSON document.
    pub fn from_json(source: &str) -> Result<Grammar, GrammarError> {
        let raw: RawGrammar =
            serde_json::from_str(source).map_err(|e| GrammarError::Parse(e.to_string()))?;
        compiler::compile(raw)
    }
}

/// One rule within a grammar.
///
/// Match and begin/end expressions are precompiled; includes stay symbolic
/// and are resolved against the repository at match time.
#[derive(Debug)]
pub enum Pattern {
    /// A single expression with an optional scope for what it matches
    Match {
        regex: Regex,
        scope: Option<String>,
    },
    /// A nested region delimited by begin/end expressions. The nested
    /// pattern list is active only while the region is open.
    BeginEnd {
        begin: Regex,
        end: Regex,
        scope: Option<String>,
        patterns: Arc<Vec<Pattern>>,
    },
    /// A reference to the grammar's own top level or to a repository group
    Include(IncludeRef),
}

/// Target of an include pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncludeRef {
    /// `$self`: the grammar's top-level pattern list
    SelfRef,
    /// A named group in the repository
    Repository(String),
}

/// Errors surfaced while loading or compiling a grammar.
///
/// All of these are load-time failures: once a grammar compiles, tokenizing
/// with it can no longer fail (see the engine's fallback rules).
#[derive(Debug)]
pub enum GrammarError {
    /// An unparsable match/begin/end expression. Fatal for this grammar.
    InvalidExpression { context: String, message: String },
    /// The grammar document itself could not be deserialized.
    Parse(String),
    /// No grammar registered under the requested name.
    UnknownLanguage(String),
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::InvalidExpression { context, message } => {
                write!(f, "invalid expression in '{}': {}", context, message)
            }
            GrammarError::Parse(msg) => write!(f, "malformed grammar document: {}", msg),
            GrammarError::UnknownLanguage(name) => write!(f, "unknown language '{}'", name),
        }
    }
}

impl std::error::Error for GrammarError {}

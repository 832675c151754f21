//! Raw grammar documents.
//!
//!     The serde-facing shape of a grammar document, before compilation.
//!     A rule is a single JSON object; which fields are present selects the
//!     compiled variant:
//!
//!         - `match` (+ optional `name`)            -> a match pattern
//!         - `begin` + `end` (+ `name`, `patterns`) -> a begin/end region
//!         - `include`                              -> a reference
//!
//!     `include` targets are `$self` for the grammar's own top-level list or
//!     `#group` / `group` for a repository entry.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A grammar document as written on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawGrammar {
    /// Language identifier, e.g. `javascript`
    pub name: String,
    /// Root scope, e.g. `source.js`
    #[serde(rename = "scopeName")]
    pub scope_name: String,
    /// Top-level rules in declaration order
    #[serde(default)]
    pub patterns: Vec<RawPattern>,
    /// Named, reusable rule groups
    #[serde(default)]
    pub repository: HashMap<String, Vec<RawPattern>>,
    /// Flat keyword-to-scope mapping for the fast scanner
    #[serde(default)]
    pub keywords: HashMap<String, String>,
}

/// One rule as written in a grammar document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawPattern {
    /// Scope attached to whatever this rule matches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_expr: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub begin: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,

    /// Nested rules, active only inside a begin/end region
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patterns: Option<Vec<RawPattern>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<String>,
}

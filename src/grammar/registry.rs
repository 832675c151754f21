//! Built-in grammars.
//!
//! Grammar documents are embedded into the binary so library users get
//! working languages without on-disk setup. The registry is built lazily
//! once per process and only ever read afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use once_cell::sync::Lazy;

use super::{Grammar, GrammarError};

const JAVASCRIPT: &str = include_str!("../../grammars/javascript.json");
const CSS: &str = include_str!("../../grammars/css.json");
const HTML: &str = include_str!("../../grammars/html.json");
const JSON: &str = include_str!("../../grammars/json.json");

static REGISTRY: Lazy<HashMap<String, Arc<Grammar>>> = Lazy::new(|| {
    let mut grammars = HashMap::new();
    for source in [JAVASCRIPT, CSS, HTML, JSON] {
        // Embedded documents are fixed at compile time; one failing to
        // compile is a packaging bug, not a runtime condition.
        let grammar = Grammar::from_json(source).expect("built-in grammar must compile");
        debug!("registered built-in grammar '{}'", grammar.name);
        grammars.insert(grammar.name.clone(), Arc::new(grammar));
    }
    grammars
});

/// Look up a built-in grammar by language name.
pub fn builtin(name: &str) -> Result<Arc<Grammar>, GrammarError> {
    REGISTRY
        .get(name)
        .cloned()
        .ok_or_else(|| GrammarError::UnknownLanguage(name.to_string()))
}

/// Names of all built-in grammars, sorted for stable listings.
pub fn builtin_names() -> Vec<String> {
    let mut names: Vec<String> = REGISTRY.keys().cloned().collect();
    names.sort();
    names
}

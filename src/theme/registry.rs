//! Built-in themes, embedded like the built-in grammars.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;

use super::definition::Theme;
use super::ThemeError;

const MIDNIGHT: &str = include_str!("../../themes/midnight.yaml");
const DAYLIGHT: &str = include_str!("../../themes/daylight.yaml");

static REGISTRY: Lazy<HashMap<String, Arc<Theme>>> = Lazy::new(|| {
    let mut themes = HashMap::new();
    for source in [MIDNIGHT, DAYLIGHT] {
        let theme = Theme::from_yaml(source).expect("built-in theme must parse");
        themes.insert(theme.name.clone(), Arc::new(theme));
    }
    themes
});

/// Look up a built-in theme by name.
pub fn builtin(name: &str) -> Result<Arc<Theme>, ThemeError> {
    REGISTRY
        .get(name)
        .cloned()
        .ok_or_else(|| ThemeError::UnknownTheme(name.to_string()))
}

/// Names of all built-in themes, sorted for stable listings.
pub fn builtin_names() -> Vec<String> {
    let mut names: Vec<String> = REGISTRY.keys().cloned().collect();
    names.sort();
    names
}

//! Themes and style resolution.
//!
//!     A theme is a static YAML document: a light/dark type tag, base
//!     foreground/background colors, and an ordered list of style rules.
//!     Themes are loaded once and shared read-only, exactly like grammars.
//!     Style resolution is independent of how tokens were produced; it only
//!     ever sees a scope path.

pub mod definition;
pub mod registry;
pub mod resolve;

use std::fmt;

pub use definition::{Color, Selectors, Style, Theme, ThemeKind, ThemeRule};
pub use registry::{builtin, builtin_names};
pub use resolve::{resolve, selector_matches};

/// Errors surfaced while loading a theme.
#[derive(Debug)]
pub enum ThemeError {
    /// The theme document could not be deserialized.
    Parse(String),
    /// The theme file could not be read.
    Io(String),
    /// No theme registered under the requested name.
    UnknownTheme(String),
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeError::Parse(msg) => write!(f, "malformed theme document: {}", msg),
            ThemeError::Io(msg) => write!(f, "cannot read theme file: {}", msg),
            ThemeError::UnknownTheme(name) => write!(f, "unknown theme '{}'", name),
        }
    }
}

impl std::error::Error for ThemeError {}

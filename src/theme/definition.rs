//! Theme documents.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ThemeError;

/// A theme as written on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    /// Light or dark, for consumers that pick a default per terminal
    #[serde(rename = "type")]
    pub kind: ThemeKind,
    /// Base text color, used when no rule matches a token
    pub foreground: Color,
    pub background: Color,
    /// Style rules in declaration order; order is the tie-break during
    /// resolution, so it is semantically meaningful
    #[serde(default)]
    pub rules: Vec<ThemeRule>,
}

impl Theme {
    /// Load a theme from a YAML string.
    pub fn from_yaml(source: &str) -> Result<Theme, ThemeError> {
        serde_yaml::from_str(source).map_err(|e| ThemeError::Parse(e.to_string()))
    }

    /// Load a theme from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Theme, ThemeError> {
        let source =
            std::fs::read_to_string(path).map_err(|e| ThemeError::Io(e.to_string()))?;
        Theme::from_yaml(&source)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKind {
    Light,
    Dark,
}

/// One style rule: one or more scope selectors sharing a style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeRule {
    pub scope: Selectors,
    #[serde(flatten)]
    pub style: Style,
}

/// One selector or a list of them; both forms appear in theme documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Selectors {
    One(String),
    Many(Vec<String>),
}

impl Selectors {
    pub fn as_slice(&self) -> &[String] {
        match self {
            Selectors::One(selector) => std::slice::from_ref(selector),
            Selectors::Many(selectors) => selectors,
        }
    }
}

/// A resolved visual style. The empty style means "inherit the base".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub underline: bool,
}

impl Style {
    pub fn is_empty(&self) -> bool {
        self.foreground.is_none()
            && self.background.is_none()
            && !self.bold
            && !self.italic
            && !self.underline
    }
}

/// An sRGB color, written as `#rrggbb` in theme documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Color, ThemeError> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ThemeError::Parse(format!(
                "'{}' is not a #rrggbb color",
                s
            )));
        }
        // Digits validated above.
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
        Ok(Color {
            r: channel(0),
            g: channel(2),
            b: channel(4),
        })
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Color, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

//! Token record and category labels.
//!
//!     A token is an immutable record of one span of a source line: the
//!     exact content substring, the full ordered scope path active when it
//!     was produced, a flat category label derived from the deepest scope,
//!     and its source position. Tokens carry no reference back to the
//!     engine; they are plain data handed downstream.

use serde::{Deserialize, Serialize};

/// One classified span of a source line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Exact substring of the source line this token covers
    pub content: String,
    /// Flat category derived from the deepest scope
    pub kind: TokenKind,
    /// Ordered scope path, outermost first
    pub scopes: Vec<String>,
    /// 0-based source line number
    pub line: usize,
    /// Byte offset within the line
    pub offset: usize,
}

impl Token {
    pub fn new(content: &str, scopes: Vec<String>, line: usize, offset: usize) -> Token {
        Token {
            content: content.to_string(),
            kind: TokenKind::from_scopes(&scopes),
            scopes,
            line,
            offset,
        }
    }

    /// The deepest (most specific) scope, if any.
    pub fn scope(&self) -> Option<&str> {
        self.scopes.last().map(String::as_str)
    }
}

/// Flat token category.
///
/// The engine derives it from the first segments of a token's deepest scope;
/// the fast scanner assigns it directly. Either way the category maps back
/// to a canonical single-segment scope via [`TokenKind::scope`], which is
/// what lets fast-scanner output flow through the same style resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Keyword,
    Identifier,
    Call,
    Number,
    Str,
    Comment,
    Operator,
    Punctuation,
    Tag,
    Selector,
    Property,
    Text,
}

/// Scope-prefix to category mapping, most specific entries first.
const KIND_TABLE: &[(&str, TokenKind)] = &[
    ("keyword.operator", TokenKind::Operator),
    ("keyword", TokenKind::Keyword),
    ("storage", TokenKind::Keyword),
    ("string", TokenKind::Str),
    ("comment", TokenKind::Comment),
    ("constant.numeric", TokenKind::Number),
    ("constant.character", TokenKind::Str),
    ("constant", TokenKind::Keyword),
    ("entity.name.tag", TokenKind::Tag),
    ("entity.name.function", TokenKind::Call),
    ("entity.name.selector", TokenKind::Selector),
    ("entity.other.attribute-name", TokenKind::Property),
    ("support.type.property-name", TokenKind::Property),
    ("support.function", TokenKind::Call),
    ("support", TokenKind::Identifier),
    ("variable", TokenKind::Identifier),
    ("punctuation", TokenKind::Punctuation),
    ("meta.selector", TokenKind::Selector),
];

impl TokenKind {
    /// Category for a full scope path: decided by the deepest scope.
    pub fn from_scopes(scopes: &[String]) -> TokenKind {
        scopes
            .last()
            .map(|scope| TokenKind::from_scope(scope))
            .unwrap_or(TokenKind::Text)
    }

    /// Category for a single scope name.
    pub fn from_scope(scope: &str) -> TokenKind {
        for (prefix, kind) in KIND_TABLE {
            if segment_prefix(prefix, scope) {
                return *kind;
            }
        }
        TokenKind::Text
    }

    /// Canonical scope for this category, used by the fast scanner to fill
    /// a token's (single-segment) scope path.
    pub fn scope(&self) -> &'static str {
        match self {
            TokenKind::Keyword => "keyword",
            TokenKind::Identifier => "variable",
            TokenKind::Call => "entity.name.function",
            TokenKind::Number => "constant.numeric",
            TokenKind::Str => "string",
            TokenKind::Comment => "comment",
            TokenKind::Operator => "keyword.operator",
            TokenKind::Punctuation => "punctuation",
            TokenKind::Tag => "entity.name.tag",
            TokenKind::Selector => "meta.selector",
            TokenKind::Property => "support.type.property-name",
            TokenKind::Text => "text",
        }
    }
}

/// True when every dot-separated segment of `prefix` prefixes `scope`.
fn segment_prefix(prefix: &str, scope: &str) -> bool {
    scope == prefix
        || (scope.len() > prefix.len()
            && scope.starts_with(prefix)
            && scope.as_bytes()[prefix.len()] == b'.')
}

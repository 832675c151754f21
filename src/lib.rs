//! # glint
//!
//! Grammar-driven syntax tokenization and terminal highlighting.
//!
//! Pipeline
//!
//!     Raw text flows through one of two scanners into a flat token stream,
//!     and each token is styled by resolving its scope path against a theme:
//!
//!         text -> (engine | fast scanner) -> tokens -> style resolution -> output
//!
//!     The full engine walks a grammar's nested begin/end regions and carries a
//!     scope stack across line boundaries. The fast scanner trades scope
//!     fidelity for throughput with a fixed byte-classification table. Both
//!     implement [`LineScanner`](tokenizer::LineScanner) and produce the same
//!     token shape, so downstream consumers never care which one ran.
//!
//! Shared state
//!
//!     A [`Grammar`] and a [`Theme`] are loaded once, never mutated, and safe
//!     to share read-only across any number of tokenization sessions. The only
//!     per-session state is the scope stack threaded through line calls.

pub mod cache;
pub mod grammar;
pub mod render;
pub mod theme;
pub mod tokenizer;

pub use cache::{CacheOptions, TokenCache};
pub use grammar::{Grammar, GrammarError};
pub use theme::{resolve, Style, Theme, ThemeError};
pub use tokenizer::{FastTokenizer, LineScanner, ScopeStack, Token, TokenKind, Tokenizer};

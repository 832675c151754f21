//! Tokenization.
//!
//!     Two scanners, one contract. [`Tokenizer`] is the full scope-stack
//!     engine: grammar-driven, tracks nesting across line boundaries, emits
//!     tokens annotated with their complete scope path. [`FastTokenizer`] is
//!     the reduced-fidelity sibling: a stateless table-driven scanner that
//!     emits flat categories at much higher throughput.
//!
//!     Both implement [`LineScanner`], so the choice between them is caller
//!     policy, never runtime type inspection, and everything downstream
//!     (style resolution, rendering, caching) consumes the same token shape.

pub mod engine;
pub mod fast;
pub mod stack;
pub mod token;

pub use engine::{Session, Tokenizer};
pub use fast::FastTokenizer;
pub use stack::{ScopeFrame, ScopeStack};
pub use token::{Token, TokenKind};

/// A line-oriented token producer.
///
/// `state` threads the nesting state from the previous line into this one;
/// a stateless implementation returns it unchanged. Implementations must
/// uphold the progress guarantee: scanning a line always terminates.
pub trait LineScanner {
    fn scan_line(&self, line: &str, line_no: usize, state: ScopeStack) -> (Vec<Token>, ScopeStack);
}

//! Scope frames and the nesting state.

use std::sync::Arc;

use regex::Regex;

use crate::grammar::{Grammar, Pattern};

/// One level of the scope stack.
#[derive(Debug, Clone)]
pub struct ScopeFrame {
    /// Ordered scope names active at this depth, outermost first
    pub scopes: Vec<String>,
    /// End matcher to test at every offset while this frame is open.
    /// `None` for the root frame.
    pub end: Option<Regex>,
    /// Patterns active while this frame is open
    pub patterns: Arc<Vec<Pattern>>,
}

/// The scope stack at a point in the scan.
///
/// Captured at end-of-line, this is the nesting state carried into the next
/// line's scan; it is the only state that crosses a line boundary. Each
/// session owns its stack outright, so concurrent sessions over one shared
/// grammar never interfere.
#[derive(Debug, Clone)]
pub struct ScopeStack {
    frames: Vec<ScopeFrame>,
}

impl ScopeStack {
    /// The state for "outside any region": a single frame holding just the
    /// grammar's root scope and its top-level patterns.
    pub fn root(grammar: &Grammar) -> ScopeStack {
        ScopeStack {
            frames: vec![ScopeFrame {
                scopes: vec![grammar.scope_name.clone()],
                end: None,
                patterns: Arc::clone(&grammar.patterns),
            }],
        }
    }

    /// The innermost frame. The root frame is never popped, so this always
    /// exists.
    pub fn top(&self) -> &ScopeFrame {
        self.frames.last().expect("stack always holds the root frame")
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub(crate) fn push(&mut self, frame: ScopeFrame) {
        self.frames.push(frame);
    }

    /// Pop the innermost frame, removing exactly the scopes it added.
    /// The root frame stays.
    pub(crate) fn pop(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }
}

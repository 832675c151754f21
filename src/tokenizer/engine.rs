//! Scope-stack tokenization engine.
//!
//!     The engine's state *is* the scope stack; there is no other hidden
//!     state. Each line is scanned left to right from offset 0:
//!
//!         1. Closing check. If the innermost frame was opened by a
//!            begin/end region, its end matcher is tested first, anchored at
//!            the current offset. A hit emits one token for the matched text
//!            and pops the frame. The end check always has priority over new
//!            patterns at the same offset.
//!
//!         2. Pattern matching. Otherwise the frame's patterns are tried in
//!            declaration order, anchored at the current offset. Includes
//!            are resolved lazily against the repository, first success
//!            wins, and a match pattern surfaced through an include counts
//!            exactly as if it were inlined at that position.
//!
//!         3. Fallback. If nothing matched, exactly one character is
//!            consumed as a literal token carrying the current scope path.
//!
//!     The offset strictly increases on every iteration, so a line of
//!     length L terminates in at most L token-producing iterations no
//!     matter how pathological the grammar is. Two consequences of that
//!     guarantee: a zero-width match is treated as non-matching (every
//!     accepted match consumes input), and malformed input can never raise
//!     an error, only degrade to one-character literals.
//!
//! Anchoring
//!
//!     "Matches at the current offset" means the match's start index equals
//!     the offset. A rule that would match later in the line is not a
//!     candidate for this iteration; declaration order among rules that do
//!     match here is the only tie-break, never match length.

use std::sync::Arc;

use log::debug;
use regex::Regex;

use crate::grammar::{Grammar, IncludeRef, Pattern};

use super::stack::{ScopeFrame, ScopeStack};
use super::token::Token;
use super::LineScanner;

/// The grammar-driven tokenizer.
///
/// Holds only shared read-only state. Every per-session value is threaded
/// through the line calls, so one tokenizer serves any number of concurrent
/// sessions.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    grammar: Arc<Grammar>,
}

impl Tokenizer {
    pub fn new(grammar: Arc<Grammar>) -> Tokenizer {
        Tokenizer { grammar }
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// Tokenize a whole document: one token list per line, with the nesting
    /// state threaded from each line into the next. A region that never
    /// finds its end simply stays open; that is not an error.
    pub fn tokenize(&self, text: &str) -> Vec<Vec<Token>> {
        let mut state = ScopeStack::root(&self.grammar);
        let mut lines = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            let (tokens, next_state) = self.tokenize_line(line, line_no, state);
            lines.push(tokens);
            state = next_state;
        }
        lines
    }

    /// Tokenize one line with an inherited nesting state, returning the
    /// tokens and the state to hand to the next line.
    pub fn tokenize_line(
        &self,
        line: &str,
        line_no: usize,
        state: ScopeStack,
    ) -> (Vec<Token>, ScopeStack) {
        let mut stack = state;
        let mut tokens = Vec::new();
        let mut offset = 0;

        while offset < line.len() {
            // 1. Closing check: an end pattern closes before any nested
            //    pattern is tried at the same offset.
            let close = stack.top().end.as_ref().and_then(|end| match_at(end, line, offset));
            if let Some(end) = close {
                tokens.push(Token::new(
                    &line[offset..end],
                    stack.top().scopes.clone(),
                    line_no,
                    offset,
                ));
                stack.pop();
                offset = end;
                continue;
            }

            // 2. Declaration-order pattern matching at the current offset.
            let patterns = Arc::clone(&stack.top().patterns);
            let mut visited = Vec::new();
            if let Some(end) = self.try_patterns(
                &patterns,
                line,
                line_no,
                offset,
                &mut stack,
                &mut tokens,
                &mut visited,
            ) {
                offset = end;
                continue;
            }

            // 3. Fallback: consume exactly one character as a literal.
            let width = char_width(line, offset);
            tokens.push(Token::new(
                &line[offset..offset + width],
                stack.top().scopes.clone(),
                line_no,
                offset,
            ));
            offset += width;
        }

        (tokens, stack)
    }

    /// Try each pattern in order, anchored at `offset`. On success the
    /// matched token(s) are emitted, the stack is updated, and the new
    /// offset is returned. `visited` guards include cycles within this one
    /// attempt.
    #[allow(clippy::too_many_arguments)]
    fn try_patterns(
        &self,
        patterns: &[Pattern],
        line: &str,
        line_no: usize,
        offset: usize,
        stack: &mut ScopeStack,
        tokens: &mut Vec<Token>,
        visited: &mut Vec<String>,
    ) -> Option<usize> {
        for pattern in patterns {
            match pattern {
                Pattern::Match { regex, scope } => {
                    let Some(end) = match_at(regex, line, offset) else {
                        continue;
                    };
                    let mut scopes = stack.top().scopes.clone();
                    if let Some(name) = scope {
                        scopes.push(name.clone());
                    }
                    tokens.push(Token::new(&line[offset..end], scopes, line_no, offset));
                    return Some(end);
                }
                Pattern::BeginEnd {
                    begin,
                    end: end_expr,
                    scope,
                    patterns: nested,
                } => {
                    let Some(end) = match_at(begin, line, offset) else {
                        continue;
                    };
                    let mut scopes = stack.top().scopes.clone();
                    if let Some(name) = scope {
                        scopes.push(name.clone());
                    }
                    tokens.push(Token::new(&line[offset..end], scopes.clone(), line_no, offset));
                    stack.push(ScopeFrame {
                        scopes,
                        end: Some(end_expr.clone()),
                        patterns: Arc::clone(nested),
                    });
                    return Some(end);
                }
                Pattern::Include(reference) => {
                    if let Some(end) = self.try_include(
                        reference, line, line_no, offset, stack, tokens, visited,
                    ) {
                        return Some(end);
                    }
                }
            }
        }
        None
    }

    /// Attempt the referenced group as if inlined at this position. A
    /// missing repository group degrades to "no match"; a group already
    /// being attempted (a cycle) likewise.
    #[allow(clippy::too_many_arguments)]
    fn try_include(
        &self,
        reference: &IncludeRef,
        line: &str,
        line_no: usize,
        offset: usize,
        stack: &mut ScopeStack,
        tokens: &mut Vec<Token>,
        visited: &mut Vec<String>,
    ) -> Option<usize> {
        let key = match reference {
            IncludeRef::SelfRef => "$self",
            IncludeRef::Repository(name) => name.as_str(),
        };
        if visited.iter().any(|seen| seen == key) {
            return None;
        }

        let group = match reference {
            IncludeRef::SelfRef => Arc::clone(&self.grammar.patterns),
            IncludeRef::Repository(name) => match self.grammar.repository.get(name) {
                Some(group) => Arc::clone(group),
                None => {
                    debug!("include target '{}' not in repository, skipping", name);
                    return None;
                }
            },
        };

        visited.push(key.to_string());
        let result =
            self.try_patterns(&group, line, line_no, offset, stack, tokens, visited);
        visited.pop();
        result
    }
}

impl LineScanner for Tokenizer {
    fn scan_line(&self, line: &str, line_no: usize, state: ScopeStack) -> (Vec<Token>, ScopeStack) {
        self.tokenize_line(line, line_no, state)
    }
}

/// Test `regex` anchored at `offset`: the match must start exactly there
/// and consume at least one byte. Returns the end offset.
fn match_at(regex: &Regex, line: &str, offset: usize) -> Option<usize> {
    let m = regex.find_at(line, offset)?;
    if m.start() != offset || m.end() == offset {
        return None;
    }
    Some(m.end())
}

fn char_width(line: &str, offset: usize) -> usize {
    line[offset..]
        .chars()
        .next()
        .map(char::len_utf8)
        .unwrap_or(1)
}

/// An incremental tokenization session.
///
/// Owns the nesting state between calls so large inputs can be fed in
/// line-range batches and consumed progressively. Batches group whole
/// lines; a logical line is never split. Cancellation is simply not
/// feeding further lines.
pub struct Session {
    tokenizer: Tokenizer,
    state: ScopeStack,
    next_line: usize,
}

impl Session {
    pub fn new(tokenizer: Tokenizer) -> Session {
        let state = ScopeStack::root(tokenizer.grammar());
        Session {
            tokenizer,
            state,
            next_line: 0,
        }
    }

    /// Tokenize the next line of the input.
    pub fn feed_line(&mut self, line: &str) -> Vec<Token> {
        let state = self.state.clone();
        let (tokens, next_state) = self.tokenizer.tokenize_line(line, self.next_line, state);
        self.state = next_state;
        self.next_line += 1;
        tokens
    }

    /// Tokenize a batch of whole lines.
    pub fn feed_lines(&mut self, lines: &[&str]) -> Vec<Vec<Token>> {
        lines.iter().map(|line| self.feed_line(line)).collect()
    }

    /// The nesting state after the last fed line.
    pub fn state(&self) -> &ScopeStack {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;

    fn tokenizer(source: &str) -> Tokenizer {
        Tokenizer::new(Arc::new(Grammar::from_json(source).unwrap()))
    }

    fn contents(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.content.as_str()).collect()
    }

    const IF_ONLY: &str = r#"{
        "name": "demo",
        "scopeName": "source.demo",
        "patterns": [{ "match": "\\bif\\b", "name": "keyword.control" }]
    }"#;

    #[test]
    fn test_single_match_with_literal_fallback() {
        let engine = tokenizer(IF_ONLY);
        let lines = engine.tokenize("if (x)");

        let tokens = &lines[0];
        assert_eq!(contents(tokens), vec!["if", " ", "(", "x", ")"]);
        assert_eq!(
            tokens[0].scopes,
            vec!["source.demo".to_string(), "keyword.control".to_string()]
        );
        // Fallback characters carry just the current frame's path.
        assert_eq!(tokens[1].scopes, vec!["source.demo".to_string()]);
    }

    const QUOTED: &str = r#"{
        "name": "demo",
        "scopeName": "source.demo",
        "patterns": [{ "begin": "\"", "end": "\"", "name": "string.quoted" }]
    }"#;

    #[test]
    fn test_nested_region_opens_and_closes() {
        let engine = tokenizer(QUOTED);
        let lines = engine.tokenize("a\"b\"c");

        let tokens = &lines[0];
        assert_eq!(contents(tokens), vec!["a", "\"", "b", "\"", "c"]);
        assert_eq!(tokens[0].scopes, vec!["source.demo".to_string()]);
        // Open quote, content, and close quote all carry the region scope.
        for token in &tokens[1..4] {
            assert_eq!(
                token.scopes,
                vec!["source.demo".to_string(), "string.quoted".to_string()]
            );
        }
        // Popping the frame removes exactly the scopes it added.
        assert_eq!(tokens[4].scopes, vec!["source.demo".to_string()]);
    }

    #[test]
    fn test_region_stays_open_across_lines() {
        let engine = tokenizer(QUOTED);
        let state = ScopeStack::root(engine.grammar());

        let (_, state) = engine.tokenize_line("\"unterminated", 0, state);
        assert_eq!(state.depth(), 2);

        let (tokens, state) = engine.tokenize_line("still inside\"", 1, state);
        assert_eq!(state.depth(), 1);
        // Everything up to the close carries the region scope.
        assert!(tokens
            .iter()
            .all(|t| t.scopes.contains(&"string.quoted".to_string())));
    }

    #[test]
    fn test_end_has_priority_over_nested_patterns() {
        // The nested rule also matches a quote; the end matcher must win.
        let engine = tokenizer(
            r#"{
                "name": "demo",
                "scopeName": "source.demo",
                "patterns": [{
                    "begin": "\"", "end": "\"", "name": "string.quoted",
                    "patterns": [{ "match": "\"", "name": "should.never.apply" }]
                }]
            }"#,
        );
        let lines = engine.tokenize("\"\"");

        assert!(lines[0]
            .iter()
            .all(|t| !t.scopes.contains(&"should.never.apply".to_string())));
    }

    #[test]
    fn test_include_repository_group() {
        let engine = tokenizer(
            r##"{
                "name": "demo",
                "scopeName": "source.demo",
                "patterns": [{ "include": "#numbers" }],
                "repository": {
                    "numbers": [{ "match": "[0-9]+", "name": "constant.numeric" }]
                }
            }"##,
        );
        let lines = engine.tokenize("42");

        assert_eq!(contents(&lines[0]), vec!["42"]);
        assert!(lines[0][0].scopes.contains(&"constant.numeric".to_string()));
    }

    #[test]
    fn test_missing_include_degrades_to_no_match() {
        let engine = tokenizer(
            r##"{
                "name": "demo",
                "scopeName": "source.demo",
                "patterns": [
                    { "include": "#nope" },
                    { "match": "x", "name": "known.rule" }
                ]
            }"##,
        );
        let lines = engine.tokenize("x");

        assert!(lines[0][0].scopes.contains(&"known.rule".to_string()));
    }

    #[test]
    fn test_mutually_recursive_includes_terminate() {
        let engine = tokenizer(
            r##"{
                "name": "demo",
                "scopeName": "source.demo",
                "patterns": [{ "include": "#a" }],
                "repository": {
                    "a": [{ "include": "#b" }],
                    "b": [{ "include": "#a" }, { "match": "z", "name": "found.it" }]
                }
            }"##,
        );
        let lines = engine.tokenize("z!");

        assert_eq!(contents(&lines[0]), vec!["z", "!"]);
        assert!(lines[0][0].scopes.contains(&"found.it".to_string()));
    }

    #[test]
    fn test_declaration_order_beats_match_length() {
        let engine = tokenizer(
            r#"{
                "name": "demo",
                "scopeName": "source.demo",
                "patterns": [
                    { "match": "ab", "name": "first.shorter" },
                    { "match": "abc", "name": "second.longer" }
                ]
            }"#,
        );
        let lines = engine.tokenize("abc");

        assert_eq!(contents(&lines[0]), vec!["ab", "c"]);
        assert!(lines[0][0].scopes.contains(&"first.shorter".to_string()));
    }

    #[test]
    fn test_later_match_is_not_a_candidate_here() {
        // "if" appears later in the line; at offset 0 nothing matches, so
        // the fallback must consume one character instead.
        let engine = tokenizer(IF_ONLY);
        let lines = engine.tokenize("x if");

        assert_eq!(contents(&lines[0]), vec!["x", " ", "if"]);
    }

    #[test]
    fn test_control_characters_fall_back_per_char() {
        let engine = tokenizer(IF_ONLY);
        let line = "\u{1}\u{2}\u{3}";
        let lines = engine.tokenize(line);

        assert_eq!(lines[0].len(), 3);
        let rebuilt: String = lines[0].iter().map(|t| t.content.as_str()).collect();
        assert_eq!(rebuilt, line);
    }

    #[test]
    fn test_multibyte_fallback_respects_char_boundaries() {
        let engine = tokenizer(IF_ONLY);
        let lines = engine.tokenize("héλ");

        let rebuilt: String = lines[0].iter().map(|t| t.content.as_str()).collect();
        assert_eq!(rebuilt, "héλ");
        assert_eq!(lines[0].len(), 3);
    }

    #[test]
    fn test_session_threads_state_between_batches() {
        let engine = tokenizer(QUOTED);
        let mut session = Session::new(engine.clone());

        let first = session.feed_lines(&["\"open", "inside"]);
        assert_eq!(session.state().depth(), 2);

        let second = session.feed_lines(&["close\""]);
        assert_eq!(session.state().depth(), 1);

        // Same result as a single whole-document call.
        let whole = engine.tokenize("\"open\ninside\nclose\"");
        assert_eq!(whole[0], first[0]);
        assert_eq!(whole[1], first[1]);
        assert_eq!(whole[2], second[0]);
    }
}

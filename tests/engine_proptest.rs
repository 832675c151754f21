//! Property-based tests for the scope-stack engine
//!
//! These pin down the engine's hard guarantees over arbitrary input: it
//! always terminates, it never loses a byte, and tokenizing a document in
//! one call is indistinguishable from threading the nesting state through
//! line-by-line calls.

use proptest::prelude::*;

use glint::grammar;
use glint::tokenizer::{ScopeStack, Tokenizer};

fn javascript_engine() -> Tokenizer {
    Tokenizer::new(grammar::builtin("javascript").unwrap())
}

proptest! {
    /// Progress invariant: at most one token-producing iteration per byte,
    /// so the token count never exceeds the line length.
    #[test]
    fn test_engine_terminates_with_bounded_tokens(line in "[ -~]{0,120}") {
        let engine = javascript_engine();
        let state = ScopeStack::root(engine.grammar());

        let (tokens, _) = engine.tokenize_line(&line, 0, state);
        prop_assert!(tokens.len() <= line.len());
    }

    /// Reconstruction invariant: concatenating every token's content, in
    /// order, reproduces the line exactly.
    #[test]
    fn test_tokenization_is_lossless(line in "[ -~]{0,120}") {
        let engine = javascript_engine();
        let state = ScopeStack::root(engine.grammar());

        let (tokens, _) = engine.tokenize_line(&line, 0, state);
        let rebuilt: String = tokens.iter().map(|t| t.content.as_str()).collect();
        prop_assert_eq!(rebuilt, line);
    }

    /// Token spans are adjacent and non-overlapping.
    #[test]
    fn test_tokens_tile_the_line(line in "[ -~]{0,120}") {
        let engine = javascript_engine();
        let state = ScopeStack::root(engine.grammar());

        let (tokens, _) = engine.tokenize_line(&line, 0, state);
        let mut pos = 0;
        for token in &tokens {
            prop_assert_eq!(token.offset, pos);
            pos += token.content.len();
        }
        prop_assert_eq!(pos, line.len());
    }

    /// Continuation determinism: a two-line document tokenized in one call
    /// equals line 1 alone, then line 2 with the captured state.
    #[test]
    fn test_continuation_matches_whole_document(
        first in "[ -~]{0,60}",
        second in "[ -~]{1,60}",
    ) {
        let engine = javascript_engine();
        let text = format!("{first}\n{second}");

        let whole = engine.tokenize(&text);

        let state = ScopeStack::root(engine.grammar());
        let (line1, state) = engine.tokenize_line(&first, 0, state);
        let (line2, _) = engine.tokenize_line(&second, 1, state);

        prop_assert_eq!(&whole[0], &line1);
        prop_assert_eq!(&whole[1], &line2);
    }

    /// Fallback safety: input with no matching rule at all still tokenizes,
    /// one literal token per character.
    #[test]
    fn test_control_bytes_never_error(line in "[\\x00-\\x08\\x0b\\x0e-\\x1f]{1,40}") {
        let engine = javascript_engine();
        let state = ScopeStack::root(engine.grammar());

        let (tokens, _) = engine.tokenize_line(&line, 0, state);
        prop_assert_eq!(tokens.len(), line.chars().count());
    }

    /// Determinism underpinning the cache contract: identical input and
    /// grammar produce byte-identical token streams.
    #[test]
    fn test_tokenization_is_deterministic(text in "[ -~\\n]{0,200}") {
        let engine = javascript_engine();
        prop_assert_eq!(engine.tokenize(&text), engine.tokenize(&text));
    }
}

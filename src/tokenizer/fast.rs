//! Fast-path scanner.
//!
//!     A stateless single-pass alternative to the engine for callers that
//!     accept flat categories instead of nested scope paths. Every possible
//!     input byte is classified once, at compile time, into a fixed
//!     256-entry table; scanning dispatches purely on the class of the
//!     current byte and never backtracks. The only mutable state is the
//!     read offset into the current line.
//!
//!     Whitespace is skipped without emitting a token, so this scanner does
//!     not reproduce the line byte-for-byte the way the engine does; the
//!     renderer fills gaps from token offsets. Everything else honors the
//!     same token contract, which is what makes it a drop-in substitute for
//!     the engine behind [`LineScanner`].
//!
//!     Grammar-specific dispatch (HTML tag scanning, CSS selector/property
//!     splitting, the keyword set) is fixed once at construction from the
//!     grammar's identity, never re-derived per character.

use std::collections::HashMap;

use crate::grammar::Grammar;

use super::stack::ScopeStack;
use super::token::{Token, TokenKind};
use super::LineScanner;

/// Byte classes, one per table slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ByteClass {
    Letter,
    Digit,
    Operator,
    Punct,
    Quote,
    Space,
    Other,
}

const CLASS_TABLE: [ByteClass; 256] = {
    let mut table = [ByteClass::Other; 256];
    let mut i = 0;
    while i < 256 {
        let c = i as u8;
        table[i] = if matches!(c, b'a'..=b'z' | b'A'..=b'Z' | b'_' | b'$') {
            ByteClass::Letter
        } else if matches!(c, b'0'..=b'9') {
            ByteClass::Digit
        } else if matches!(c, b' ' | b'\t' | b'\r') {
            ByteClass::Space
        } else if matches!(c, b'"' | b'\'' | b'`') {
            ByteClass::Quote
        } else if matches!(
            c,
            b'+' | b'-' | b'*' | b'/' | b'%' | b'=' | b'<' | b'>' | b'!' | b'&' | b'|' | b'^' | b'~' | b'?'
        ) {
            ByteClass::Operator
        } else if matches!(c, b'(' | b')' | b'{' | b'}' | b'[' | b']' | b';' | b',' | b'.' | b':') {
            ByteClass::Punct
        } else {
            ByteClass::Other
        };
        i += 1;
    }
    table
};

/// Multi-character operators, longest first. Checked with a fixed 3-then-2
/// byte lookahead before falling back to a single character.
const OPERATORS3: &[&[u8]] = &[
    b"===", b"!==", b"**=", b"<<=", b">>=", b">>>", b"&&=", b"||=", b"??=",
];
const OPERATORS2: &[&[u8]] = &[
    b"==", b"!=", b"<=", b">=", b"&&", b"||", b"??", b"=>", b"->", b"++", b"--", b"+=", b"-=",
    b"*=", b"/=", b"%=", b"&=", b"|=", b"^=", b"<<", b">>", b"**",
];

/// The reduced-fidelity, table-driven scanner.
#[derive(Debug, Clone)]
pub struct FastTokenizer {
    /// Keyword-to-scope lookup, precomputed from the grammar
    keywords: HashMap<String, String>,
    /// Dispatch HTML tag scanning
    html: bool,
    /// Dispatch CSS selector/property splitting
    css: bool,
}

impl FastTokenizer {
    pub fn new(grammar: &Grammar) -> FastTokenizer {
        FastTokenizer {
            keywords: grammar.keywords.clone(),
            html: grammar.name == "html",
            css: grammar.name == "css",
        }
    }

    /// Scan one line into flat-category tokens.
    pub fn scan(&self, line: &str, line_no: usize) -> Vec<Token> {
        let bytes = line.as_bytes();
        let mut tokens = Vec::new();
        let mut offset = 0;

        while offset < bytes.len() {
            let b = bytes[offset];

            // Grammar-specific byte dispatch comes before the class table.
            if self.html && b == b'<' {
                if let Some(next) = self.scan_html_tag(line, line_no, offset, &mut tokens) {
                    offset = next;
                    continue;
                }
            }
            if self.html && b == b'>' {
                self.emit(&mut tokens, line, line_no, offset, offset + 1, TokenKind::Punctuation);
                offset += 1;
                continue;
            }
            if self.css && (b == b'.' || b == b'#' || b == b'@') {
                if let Some(next) = self.scan_css_marker(line, line_no, offset, &mut tokens) {
                    offset = next;
                    continue;
                }
            }

            match CLASS_TABLE[b as usize] {
                ByteClass::Space => {
                    // Skipped, no token.
                    offset += 1;
                }
                ByteClass::Digit => {
                    let end = scan_number(bytes, offset);
                    self.emit(&mut tokens, line, line_no, offset, end, TokenKind::Number);
                    offset = end;
                }
                ByteClass::Quote => {
                    let end = scan_string(bytes, offset);
                    self.emit(&mut tokens, line, line_no, offset, end, TokenKind::Str);
                    offset = end;
                }
                ByteClass::Letter => {
                    offset = self.scan_word(line, line_no, offset, &mut tokens);
                }
                ByteClass::Operator => {
                    if b == b'/' {
                        if let Some(end) = scan_comment(bytes, offset) {
                            self.emit(&mut tokens, line, line_no, offset, end, TokenKind::Comment);
                            offset = end;
                            continue;
                        }
                    }
                    let end = scan_operator(bytes, offset);
                    self.emit(&mut tokens, line, line_no, offset, end, TokenKind::Operator);
                    offset = end;
                }
                ByteClass::Punct => {
                    self.emit(&mut tokens, line, line_no, offset, offset + 1, TokenKind::Punctuation);
                    offset += 1;
                }
                ByteClass::Other => {
                    // Progress guarantee: one whole character as a literal.
                    let end = offset + char_width(line, offset);
                    self.emit(&mut tokens, line, line_no, offset, end, TokenKind::Text);
                    offset = end;
                }
            }
        }

        tokens
    }

    /// Identifier, keyword, or call-site identifier.
    fn scan_word(&self, line: &str, line_no: usize, start: usize, tokens: &mut Vec<Token>) -> usize {
        let bytes = line.as_bytes();
        let mut end = start;
        while end < bytes.len()
            && matches!(CLASS_TABLE[bytes[end] as usize], ByteClass::Letter | ByteClass::Digit)
        {
            end += 1;
        }
        let word = &line[start..end];

        if let Some(scope) = self.keywords.get(word) {
            tokens.push(Token::new(word, vec![scope.clone()], line_no, start));
            return end;
        }

        if self.css {
            // Single-pass split: a name directly before ':' is a property,
            // before '{' or ',' a selector.
            let next = next_significant(bytes, end);
            let kind = match next {
                Some(b':') => TokenKind::Property,
                Some(b'{') | Some(b',') => TokenKind::Selector,
                _ => TokenKind::Identifier,
            };
            self.emit(tokens, line, line_no, start, end, kind);
            return end;
        }

        // A name immediately followed by '(' is a call site.
        let kind = if end < bytes.len() && bytes[end] == b'(' {
            TokenKind::Call
        } else {
            TokenKind::Identifier
        };
        self.emit(tokens, line, line_no, start, end, kind);
        end
    }

    /// `<name`, `</name`: punctuation for the angle part, a tag token for
    /// the name. Returns `None` when this `<` does not open a tag.
    fn scan_html_tag(
        &self,
        line: &str,
        line_no: usize,
        start: usize,
        tokens: &mut Vec<Token>,
    ) -> Option<usize> {
        let bytes = line.as_bytes();
        let mut name_start = start + 1;
        if name_start < bytes.len() && bytes[name_start] == b'/' {
            name_start += 1;
        }
        if name_start >= bytes.len() || CLASS_TABLE[bytes[name_start] as usize] != ByteClass::Letter {
            return None;
        }

        let mut end = name_start;
        while end < bytes.len()
            && matches!(CLASS_TABLE[bytes[end] as usize], ByteClass::Letter | ByteClass::Digit)
        {
            end += 1;
        }

        self.emit(tokens, line, line_no, start, name_start, TokenKind::Punctuation);
        self.emit(tokens, line, line_no, name_start, end, TokenKind::Tag);
        Some(end)
    }

    /// `.class`, `#id`, `@media`: one selector/keyword token including the
    /// marker byte. Returns `None` when no name follows the marker.
    fn scan_css_marker(
        &self,
        line: &str,
        line_no: usize,
        start: usize,
        tokens: &mut Vec<Token>,
    ) -> Option<usize> {
        let bytes = line.as_bytes();
        if start + 1 >= bytes.len() || CLASS_TABLE[bytes[start + 1] as usize] != ByteClass::Letter {
            return None;
        }

        let mut end = start + 1;
        while end < bytes.len()
            && matches!(CLASS_TABLE[bytes[end] as usize], ByteClass::Letter | ByteClass::Digit)
        {
            end += 1;
        }

        let kind = if bytes[start] == b'@' {
            TokenKind::Keyword
        } else {
            TokenKind::Selector
        };
        self.emit(tokens, line, line_no, start, end, kind);
        Some(end)
    }

    fn emit(
        &self,
        tokens: &mut Vec<Token>,
        line: &str,
        line_no: usize,
        start: usize,
        end: usize,
        kind: TokenKind,
    ) {
        tokens.push(Token::new(
            &line[start..end],
            vec![kind.scope().to_string()],
            line_no,
            start,
        ));
    }
}

impl LineScanner for FastTokenizer {
    fn scan_line(&self, line: &str, line_no: usize, state: ScopeStack) -> (Vec<Token>, ScopeStack) {
        // Stateless: the nesting state passes through untouched.
        (self.scan(line, line_no), state)
    }
}

/// Number scan: hex/binary/octal prefixes, then decimal with optional
/// fraction and exponent.
fn scan_number(bytes: &[u8], start: usize) -> usize {
    let len = bytes.len();

    if bytes[start] == b'0' && start + 1 < len {
        let radix: Option<fn(u8) -> bool> = match bytes[start + 1] {
            b'x' | b'X' => Some(|b: u8| b.is_ascii_hexdigit()),
            b'b' | b'B' => Some(|b: u8| matches!(b, b'0' | b'1')),
            b'o' | b'O' => Some(|b: u8| matches!(b, b'0'..=b'7')),
            _ => None,
        };
        if let Some(is_digit) = radix {
            let mut end = start + 2;
            while end < len && (is_digit(bytes[end]) || bytes[end] == b'_') {
                end += 1;
            }
            return end;
        }
    }

    let mut end = start;
    while end < len && (bytes[end].is_ascii_digit() || bytes[end] == b'_') {
        end += 1;
    }
    if end + 1 < len && bytes[end] == b'.' && bytes[end + 1].is_ascii_digit() {
        end += 1;
        while end < len && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }
    if end < len && matches!(bytes[end], b'e' | b'E') {
        let mut exp = end + 1;
        if exp < len && matches!(bytes[exp], b'+' | b'-') {
            exp += 1;
        }
        if exp < len && bytes[exp].is_ascii_digit() {
            end = exp;
            while end < len && bytes[end].is_ascii_digit() {
                end += 1;
            }
        }
    }
    end
}

/// String scan: walk to the matching unescaped quote; an unterminated
/// string absorbs the rest of the line.
fn scan_string(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            i += 2;
        } else if bytes[i] == quote {
            return i + 1;
        } else {
            i += 1;
        }
    }
    bytes.len()
}

/// `//` takes the rest of the line; `/*` scans for the closing marker and
/// absorbs the rest of the line when it is absent. A local single-category
/// decision, not a nested region. Returns `None` when `/` is an operator.
fn scan_comment(bytes: &[u8], start: usize) -> Option<usize> {
    match bytes.get(start + 1) {
        Some(b'/') => Some(bytes.len()),
        Some(b'*') => {
            let mut i = start + 2;
            while i + 1 < bytes.len() {
                if bytes[i] == b'*' && bytes[i + 1] == b'/' {
                    return Some(i + 2);
                }
                i += 1;
            }
            Some(bytes.len())
        }
        _ => None,
    }
}

/// Group operator bytes with the fixed 3-then-2 lookahead tables before
/// falling back to a single character.
fn scan_operator(bytes: &[u8], start: usize) -> usize {
    if start + 3 <= bytes.len() {
        let probe = &bytes[start..start + 3];
        if OPERATORS3.iter().any(|op| *op == probe) {
            return start + 3;
        }
    }
    if start + 2 <= bytes.len() {
        let probe = &bytes[start..start + 2];
        if OPERATORS2.iter().any(|op| *op == probe) {
            return start + 2;
        }
    }
    start + 1
}

/// First non-whitespace byte at or after `start`.
fn next_significant(bytes: &[u8], start: usize) -> Option<u8> {
    let mut i = start;
    while i < bytes.len() && CLASS_TABLE[bytes[i] as usize] == ByteClass::Space {
        i += 1;
    }
    bytes.get(i).copied()
}

fn char_width(line: &str, offset: usize) -> usize {
    line[offset..]
        .chars()
        .next()
        .map(char::len_utf8)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar;

    fn javascript() -> FastTokenizer {
        FastTokenizer::new(&grammar::builtin("javascript").unwrap())
    }

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_keywords_identifiers_and_calls() {
        let scanner = javascript();
        let tokens = scanner.scan("let total = compute(x);", 0);

        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Keyword,     // let
                TokenKind::Identifier,  // total
                TokenKind::Operator,    // =
                TokenKind::Call,        // compute
                TokenKind::Punctuation, // (
                TokenKind::Identifier,  // x
                TokenKind::Punctuation, // )
                TokenKind::Punctuation, // ;
            ]
        );
        // Keywords carry the scope from the grammar's keyword map.
        assert_eq!(tokens[0].scopes, vec!["storage.type".to_string()]);
    }

    #[test]
    fn test_whitespace_is_skipped_without_tokens() {
        let scanner = javascript();
        let tokens = scanner.scan("  a  b  ", 0);

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].offset, 2);
        assert_eq!(tokens[1].offset, 5);
    }

    #[test]
    fn test_number_prefixes_and_exponents() {
        let scanner = javascript();
        for (line, expected) in [
            ("0xFF", "0xFF"),
            ("0b1010", "0b1010"),
            ("0o755", "0o755"),
            ("3.14", "3.14"),
            ("1e9", "1e9"),
            ("6.02e+23", "6.02e+23"),
        ] {
            let tokens = scanner.scan(line, 0);
            assert_eq!(tokens[0].content, expected, "scanning {line:?}");
            assert_eq!(tokens[0].kind, TokenKind::Number);
        }
    }

    #[test]
    fn test_string_walks_past_escaped_quote() {
        let scanner = javascript();
        let tokens = scanner.scan(r#""a\"b" rest"#, 0);

        assert_eq!(tokens[0].content, r#""a\"b""#);
        assert_eq!(tokens[0].kind, TokenKind::Str);
    }

    #[test]
    fn test_unterminated_string_absorbs_line() {
        let scanner = javascript();
        let tokens = scanner.scan("\"never closed", 0);

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].content, "\"never closed");
    }

    #[test]
    fn test_comments_line_block_and_unterminated() {
        let scanner = javascript();

        let tokens = scanner.scan("x // trailing", 0);
        assert_eq!(tokens[1].content, "// trailing");
        assert_eq!(tokens[1].kind, TokenKind::Comment);

        let tokens = scanner.scan("a /* b */ c", 0);
        assert_eq!(tokens[1].content, "/* b */");
        assert_eq!(tokens[1].kind, TokenKind::Comment);

        let tokens = scanner.scan("a /* open", 0);
        assert_eq!(tokens[1].content, "/* open");
        assert_eq!(tokens[1].kind, TokenKind::Comment);
    }

    #[test]
    fn test_division_is_an_operator() {
        let scanner = javascript();
        let tokens = scanner.scan("a / b", 0);

        assert_eq!(tokens[1].content, "/");
        assert_eq!(tokens[1].kind, TokenKind::Operator);
    }

    #[test]
    fn test_operator_lookahead_prefers_longest() {
        let scanner = javascript();
        for (line, expected) in [("a === b", "==="), ("a >>> b", ">>>"), ("a => b", "=>")] {
            let tokens = scanner.scan(line, 0);
            assert_eq!(tokens[1].content, expected, "scanning {line:?}");
        }
    }

    #[test]
    fn test_html_tags_dispatch_on_grammar_identity() {
        let scanner = FastTokenizer::new(&grammar::builtin("html").unwrap());
        let tokens = scanner.scan("<div class=\"x\"></div>", 0);

        assert_eq!(tokens[0].content, "<");
        assert_eq!(tokens[0].kind, TokenKind::Punctuation);
        assert_eq!(tokens[1].content, "div");
        assert_eq!(tokens[1].kind, TokenKind::Tag);
        let closer = tokens.iter().position(|t| t.content == "</").unwrap();
        assert_eq!(tokens[closer + 1].kind, TokenKind::Tag);
    }

    #[test]
    fn test_css_selector_and_property_split() {
        let scanner = FastTokenizer::new(&grammar::builtin("css").unwrap());
        let tokens = scanner.scan(".card { color: red; }", 0);

        assert_eq!(tokens[0].content, ".card");
        assert_eq!(tokens[0].kind, TokenKind::Selector);
        let color = tokens.iter().find(|t| t.content == "color").unwrap();
        assert_eq!(color.kind, TokenKind::Property);
    }

    #[test]
    fn test_unclassified_bytes_consume_one_char() {
        let scanner = javascript();
        let tokens = scanner.scan("§§", 0);

        assert_eq!(tokens.len(), 2);
        assert!(tokens.iter().all(|t| t.kind == TokenKind::Text));
    }

    #[test]
    fn test_stateless_behind_the_scanner_interface() {
        let grammar = grammar::builtin("javascript").unwrap();
        let scanner = FastTokenizer::new(&grammar);
        let state = ScopeStack::root(&grammar);
        let before = state.depth();

        let (_, state) = scanner.scan_line("let x = \"unclosed", 0, state);
        assert_eq!(state.depth(), before);
    }
}

//! ANSI emission.
//!
//!     Resolves each token's scope path against the theme and writes the
//!     styled text as ANSI escape sequences. Gaps between tokens (the fast
//!     scanner skips whitespace) are copied through unstyled from the
//!     source line, so the rendered output always reproduces the input
//!     text exactly.

use crossterm::style::{
    Attribute, Color as TermColor, ResetColor, SetAttribute, SetBackgroundColor,
    SetForegroundColor,
};
use crossterm::Command;

use crate::theme::{resolve, Color, Style, Theme};
use crate::tokenizer::{LineScanner, ScopeStack, Token};
use crate::Grammar;

/// Highlight a whole document into one ANSI string, scanning with whichever
/// [`LineScanner`] the caller selected.
pub fn highlight<S: LineScanner>(
    text: &str,
    scanner: &S,
    grammar: &Grammar,
    theme: &Theme,
) -> String {
    let mut state = ScopeStack::root(grammar);
    let mut out = String::new();
    for (line_no, line) in text.lines().enumerate() {
        let (tokens, next_state) = scanner.scan_line(line, line_no, state);
        render_line(line, &tokens, theme, &mut out);
        out.push('\n');
        state = next_state;
    }
    out
}

/// Render one line's tokens into `out`.
pub fn render_line(line: &str, tokens: &[Token], theme: &Theme, out: &mut String) {
    let mut pos = 0;
    for token in tokens {
        if token.offset > pos {
            out.push_str(&line[pos..token.offset]);
        }
        let style = resolve(&token.scopes, theme);
        if style.is_empty() {
            out.push_str(&token.content);
        } else {
            write_styled(out, &token.content, &style);
        }
        pos = token.offset + token.content.len();
    }
    if pos < line.len() {
        out.push_str(&line[pos..]);
    }
}

fn write_styled(out: &mut String, content: &str, style: &Style) {
    // Writing ANSI into a String cannot fail; the results are ignored the
    // same way fmt::Write adapters do elsewhere in crossterm.
    if let Some(fg) = style.foreground {
        let _ = SetForegroundColor(term_color(fg)).write_ansi(out);
    }
    if let Some(bg) = style.background {
        let _ = SetBackgroundColor(term_color(bg)).write_ansi(out);
    }
    if style.bold {
        let _ = SetAttribute(Attribute::Bold).write_ansi(out);
    }
    if style.italic {
        let _ = SetAttribute(Attribute::Italic).write_ansi(out);
    }
    if style.underline {
        let _ = SetAttribute(Attribute::Underlined).write_ansi(out);
    }
    out.push_str(content);
    let _ = SetAttribute(Attribute::Reset).write_ansi(out);
    let _ = ResetColor.write_ansi(out);
}

fn term_color(color: Color) -> TermColor {
    TermColor::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

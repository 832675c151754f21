//! Rendering: turning classified tokens into terminal output.
//!
//! Everything here sits strictly downstream of the token contract; it never
//! cares which scanner produced the stream.

pub mod ansi;

pub use ansi::{highlight, render_line};

//! Commented JSON (JSONC) parsing.
//!
//! Module registries and the builder selection are hand-edited `.jsonc`
//! files. Comments are stripped with a small state machine that tracks
//! quoted strings, so values like `"https://archlinux.org"` survive intact.
//!
//! Stripped comments are replaced by nothing but their newlines, which keeps
//! serde_json's line numbers pointing at the original text.

use serde_json::Value;
use thiserror::Error;

/// A parsed structured document
pub type Document = Value;

/// Errors produced while parsing a commented JSON document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A `/*` comment was never closed
    #[error("unterminated block comment starting at line {line}")]
    UnterminatedComment { line: usize },

    /// The comment-free text is not valid JSON
    #[error("{0}")]
    Syntax(String),
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        ParseError::Syntax(err.to_string())
    }
}

/// Remove `//` and `/* */` comments that appear outside string literals.
pub fn strip_comments(text: &str) -> Result<String, ParseError> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;
    let mut line = 1;

    while let Some(c) = chars.next() {
        if c == '\n' {
            line += 1;
        }

        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match (c, chars.peek().copied()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                // Line comment: drop everything up to (not including) the newline
                while let Some(&next) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            ('/', Some('*')) => {
                let start = line;
                chars.next();
                let mut closed = false;
                while let Some(next) = chars.next() {
                    if next == '\n' {
                        line += 1;
                        out.push('\n');
                    } else if next == '*' && chars.peek() == Some(&'/') {
                        chars.next();
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    return Err(ParseError::UnterminatedComment { line: start });
                }
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}

/// Parse commented JSON text into a [`Document`].
pub fn parse(text: &str) -> Result<Document, ParseError> {
    let stripped = strip_comments(text)?;
    Ok(serde_json::from_str(&stripped)?)
}

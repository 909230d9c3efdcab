//! Line Classifier
//!
//! Decides whether a raw line is whitespace, a comment or a command, and
//! pulls the command token off the front of a command line. Never fails:
//! a line that does not start with a letter becomes a `<err>` command.

use crate::diagnostics::{DiagnosticCode, Diagnostics};

/// Placeholder code for lines without a recognizable command token
pub const MALFORMED_CODE: &str = "<err>";

/// Result of classifying one line
#[derive(Debug, Clone, PartialEq)]
pub enum Classified<'a> {
    /// Empty after trimming
    Whitespace,
    /// First non-space character is `;`; holds the line without its terminator
    Comment(&'a str),
    Command(CodeToken<'a>),
}

/// The command token of a line and the text that follows it
#[derive(Debug, Clone, PartialEq)]
pub struct CodeToken<'a> {
    /// Upper-cased code used for registry lookup, or [`MALFORMED_CODE`]
    pub code: String,
    /// Token exactly as written
    pub token: &'a str,
    /// Everything after the token and one separating space
    pub field_area: &'a str,
    pub diagnostics: Diagnostics,
}

impl CodeToken<'_> {
    pub fn is_malformed(&self) -> bool {
        self.code == MALFORMED_CODE
    }
}

/// Remove trailing line terminators only
pub fn strip_terminator(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

/// Classify a single line of G-code
pub fn classify(line: &str) -> Classified<'_> {
    let line = strip_terminator(line);
    let trimmed = line.trim();

    if trimmed.is_empty() {
        Classified::Whitespace
    } else if trimmed.starts_with(';') {
        Classified::Comment(line)
    } else {
        Classified::Command(split_code(line))
    }
}

/// Split a command line into its code token and field area
///
/// The token is the leading letter plus everything up to the first
/// whitespace or `;`. This covers plain codes (`G1`, `M104`) as well as
/// lettered suffixes such as `T?` or `Tx`.
pub fn split_code(line: &str) -> CodeToken<'_> {
    let line = strip_terminator(line).trim();
    let mut diagnostics = Diagnostics::new();

    let starts_with_letter = line.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
    if !starts_with_letter {
        diagnostics.report(
            DiagnosticCode::MissingCode,
            "line doesn't start with a letter",
            line,
        );
        return CodeToken {
            code: MALFORMED_CODE.to_string(),
            token: "",
            field_area: line,
            diagnostics,
        };
    }

    let end = line
        .find(|c: char| c.is_whitespace() || c == ';')
        .unwrap_or(line.len());
    let (token, rest) = line.split_at(end);
    let field_area = rest
        .strip_prefix(|c: char| c.is_whitespace())
        .unwrap_or(rest);

    CodeToken {
        code: token.to_ascii_uppercase(),
        token,
        field_area,
        diagnostics,
    }
}

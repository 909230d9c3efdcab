//! GCode Parser
//!
//! Line-at-a-time parsing into the command model. Each line is handled
//! on its own: nothing carries over from previous lines.

pub mod classifier;
pub mod fields;

pub use classifier::{classify, Classified, CodeToken, MALFORMED_CODE};
pub use fields::{parse_fields, FieldParse};

use crate::command::{Command, CommandKind, CommandRegistry};
use crate::diagnostics::DiagnosticCode;

/// A parsed line of GCode
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLine {
    /// An empty or whitespace-only line
    Whitespace,
    /// A comment-only line, text includes the leading `;`
    Comment { text: String },
    /// A recognized, unrecognized or malformed command line
    Command(Command),
}

impl ParsedLine {
    pub fn as_command(&self) -> Option<&Command> {
        match self {
            ParsedLine::Command(command) => Some(command),
            _ => None,
        }
    }
}

/// Parse a single line of GCode with the built-in registry
///
/// This is the main entry point for parsing.
pub fn parse_line(line: &str) -> ParsedLine {
    parse_line_with(CommandRegistry::builtin(), line)
}

/// Parse a single line with a specific registry
pub fn parse_line_with(registry: &CommandRegistry, line: &str) -> ParsedLine {
    match classify(line) {
        Classified::Whitespace => ParsedLine::Whitespace,
        Classified::Comment(text) => ParsedLine::Comment {
            text: text.to_string(),
        },
        Classified::Command(token) => {
            let command = match registry.create(&token.code, line) {
                Some(command) => command,
                None => unmodeled(token, line),
            };
            ParsedLine::Command(command)
        }
    }
}

/// Construct the command on a line, or `None` if it is not a known command
pub fn create_command(line: &str) -> Option<Command> {
    match classify(line) {
        Classified::Command(token) => CommandRegistry::builtin().create(&token.code, line),
        Classified::Whitespace | Classified::Comment(_) => None,
    }
}

/// Best-effort command for lines the registry cannot construct
fn unmodeled(token: CodeToken<'_>, line: &str) -> Command {
    let raw = classifier::strip_terminator(line);
    let (_, comment) = fields::split_comment(token.field_area);
    let malformed = token.is_malformed();
    let mut diagnostics = token.diagnostics;

    let kind = if malformed {
        CommandKind::Malformed
    } else {
        diagnostics.report(
            DiagnosticCode::UnknownCommand,
            format!("unknown gcode element: {}", token.code),
            raw.trim(),
        );
        CommandKind::Unrecognized
    };

    Command::unmodeled(token.code, kind, comment.map(str::to_string), diagnostics, raw)
}

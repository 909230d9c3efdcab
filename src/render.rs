//! Serializer
//!
//! Canonical text for parsed lines. Fields are written in schema order,
//! not input order, so rendering is stable; re-parsing the output yields
//! the same recognized fields and trailing comment.

use crate::command::Command;
use crate::parser::ParsedLine;

/// Canonical text of a command
///
/// Unrecognized and malformed commands have no schema and are written
/// back exactly as they were read.
pub fn render(command: &Command) -> String {
    let Some(schema) = command.schema() else {
        return command.raw().unwrap_or_default().to_string();
    };

    let mut out = command.code().to_string();
    for spec in schema.field_specs() {
        if let Some(value) = command.fields().get(spec.letter) {
            out.push(' ');
            out.push(spec.letter);
            out.push_str(&value.to_string());
        }
    }

    if let Some(comment) = command.comment() {
        out.push_str(" ;");
        out.push_str(comment);
    }

    out
}

/// Canonical text of any parsed line
pub fn render_line(line: &ParsedLine) -> String {
    match line {
        ParsedLine::Whitespace => String::new(),
        ParsedLine::Comment { text } => text.clone(),
        ParsedLine::Command(command) => render(command),
    }
}

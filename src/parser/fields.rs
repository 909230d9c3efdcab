//! Field Schema Engine
//!
//! Turns the field area of a command line (`X10 Y-5.5 F1200 ; comment`)
//! into a typed field map according to a command schema. Issues are
//! recorded as diagnostics; the map is always produced.

use crate::command::schema::{CommandSchema, FieldSpec, ValueKind};
use crate::command::{FieldValue, Fields};
use crate::diagnostics::{DiagnosticCode, Diagnostics};

/// Outcome of parsing one field area
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldParse {
    pub fields: Fields,
    /// Text after the first `;`, verbatim
    pub comment: Option<String>,
    pub diagnostics: Diagnostics,
}

/// Split off the trailing comment at the first `;`
pub fn split_comment(field_area: &str) -> (&str, Option<&str>) {
    match field_area.split_once(';') {
        Some((fields, comment)) => (fields, Some(comment)),
        None => (field_area, None),
    }
}

/// Parse a field area against a schema
///
/// `context` is the full line, attached to every diagnostic.
pub fn parse_fields(field_area: &str, schema: &CommandSchema, context: &str) -> FieldParse {
    let (field_text, comment) = split_comment(field_area);
    let mut result = FieldParse {
        comment: comment.map(str::to_string),
        ..FieldParse::default()
    };

    for element in field_text.split_whitespace() {
        let mut chars = element.chars();
        let Some(first) = chars.next() else {
            continue;
        };
        let letter = first.to_ascii_uppercase();
        let raw_value = chars.as_str();

        let Some(spec) = schema.spec_for(letter) else {
            result.diagnostics.report(
                DiagnosticCode::UnknownField,
                format!("unknown field '{letter}' for {}, dropped", schema.code),
                context,
            );
            continue;
        };

        let Some(value) = parse_value(spec, raw_value) else {
            result.diagnostics.report(
                DiagnosticCode::InvalidValue,
                format!(
                    "field '{letter}' ({}) of {} has unreadable value '{raw_value}'",
                    spec.meaning, schema.code
                ),
                context,
            );
            continue;
        };

        if result.fields.insert(letter, value).is_some() {
            result.diagnostics.report(
                DiagnosticCode::DuplicateField,
                format!("field '{letter}' given more than once on {}, last value kept", schema.code),
                context,
            );
        }
    }

    check_domains(schema, &result.fields, &mut result.diagnostics, context);
    result
}

/// Apply the letter's own parser, falling back to the generic one
fn parse_value(spec: &FieldSpec, raw: &str) -> Option<FieldValue> {
    let specific = match spec.kind {
        ValueKind::Int => raw.parse().ok().map(FieldValue::Int),
        ValueKind::Float => parse_float(raw).map(FieldValue::Float),
        ValueKind::Flag => raw.is_empty().then_some(FieldValue::Flag),
        ValueKind::Text => (!raw.is_empty()).then(|| FieldValue::Text(raw.to_string())),
    };
    specific.or_else(|| parse_generic(raw))
}

/// Generic parser: bare letter or any decimal literal
fn parse_generic(raw: &str) -> Option<FieldValue> {
    if raw.is_empty() {
        return Some(FieldValue::Flag);
    }
    parse_float(raw).map(FieldValue::Float)
}

fn parse_float(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Range checks run after every field is collected, one diagnostic each
fn check_domains(schema: &CommandSchema, fields: &Fields, diagnostics: &mut Diagnostics, context: &str) {
    for spec in schema.field_specs() {
        let (Some(domain), Some(value)) = (spec.domain, fields.get(spec.letter)) else {
            continue;
        };
        if let Some(problem) = domain.check(value) {
            diagnostics.report(
                DiagnosticCode::OutOfRange,
                format!(
                    "{} has an invalid {} ({}); {problem}, was {}{value}",
                    schema.code, spec.meaning, spec.letter, spec.letter
                ),
                context,
            );
        }
    }
}

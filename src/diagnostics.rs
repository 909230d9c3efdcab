//! Diagnostics
//!
//! Structured, non-fatal issues found while classifying, parsing or
//! rendering a single line. Nothing here aborts processing: a command is
//! always constructed and the diagnostics travel alongside it.

use std::fmt;

use serde::Serialize;

/// Severity of a diagnostic message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        f.write_str(label)
    }
}

/// What kind of issue a diagnostic describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticCode {
    /// Command token was not written in canonical upper case
    CaseMismatch,
    /// Line's code differs from the code the command was constructed for
    CodeMismatch,
    /// Field letter not declared by the command's schema; the field is dropped
    UnknownField,
    /// Same letter given twice on one line; the later value wins
    DuplicateField,
    /// Value text could not be coerced by the letter's parser or its fallback
    InvalidValue,
    /// Value parsed but lies outside the documented domain; kept as-is
    OutOfRange,
    /// Code is neither registered nor a tool change
    UnknownCommand,
    /// `T` code whose tool identifier is neither numeric nor a known marker
    UnknownToolChange,
    /// Line does not start with a letter, so no code could be extracted
    MissingCode,
    /// Schema declares `T` while also taking an extruder choice
    SchemaConflict,
}

impl DiagnosticCode {
    /// Default severity for this kind of issue
    pub fn severity(self) -> Severity {
        match self {
            DiagnosticCode::MissingCode | DiagnosticCode::InvalidValue => Severity::Error,
            DiagnosticCode::CaseMismatch => Severity::Info,
            DiagnosticCode::UnknownField
            | DiagnosticCode::CodeMismatch
            | DiagnosticCode::DuplicateField
            | DiagnosticCode::OutOfRange
            | DiagnosticCode::UnknownCommand
            | DiagnosticCode::UnknownToolChange
            | DiagnosticCode::SchemaConflict => Severity::Warning,
        }
    }

    /// Stable kebab-case name, as used in configuration and reports
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticCode::CaseMismatch => "case-mismatch",
            DiagnosticCode::CodeMismatch => "code-mismatch",
            DiagnosticCode::UnknownField => "unknown-field",
            DiagnosticCode::DuplicateField => "duplicate-field",
            DiagnosticCode::InvalidValue => "invalid-value",
            DiagnosticCode::OutOfRange => "out-of-range",
            DiagnosticCode::UnknownCommand => "unknown-command",
            DiagnosticCode::UnknownToolChange => "unknown-tool-change",
            DiagnosticCode::MissingCode => "missing-code",
            DiagnosticCode::SchemaConflict => "schema-conflict",
        }
    }

    /// Parse a kebab-case name back into a code
    pub fn from_name(name: &str) -> Option<Self> {
        const ALL: [DiagnosticCode; 10] = [
            DiagnosticCode::CaseMismatch,
            DiagnosticCode::CodeMismatch,
            DiagnosticCode::UnknownField,
            DiagnosticCode::DuplicateField,
            DiagnosticCode::InvalidValue,
            DiagnosticCode::OutOfRange,
            DiagnosticCode::UnknownCommand,
            DiagnosticCode::UnknownToolChange,
            DiagnosticCode::MissingCode,
            DiagnosticCode::SchemaConflict,
        ];
        ALL.into_iter()
            .find(|code| code.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single non-fatal issue attached to the line it arose from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: String,
    /// The line text the issue was found on
    pub context: String,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, message: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            severity: code.severity(),
            code,
            message: message.into(),
            context: context.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)
    }
}

/// Ordered collection of diagnostics for one line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        log::debug!("{}: {}", diagnostic, diagnostic.context);
        self.entries.push(diagnostic);
    }

    /// Record an issue with the default severity for its code
    pub fn report(&mut self, code: DiagnosticCode, message: impl Into<String>, context: &str) {
        self.push(Diagnostic::new(code, message, context));
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any entry carries the given code
    pub fn contains(&self, code: DiagnosticCode) -> bool {
        self.entries.iter().any(|d| d.code == code)
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|d| d.severity == Severity::Error)
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

//! Command Registry
//!
//! Maps canonical codes to their static schemas and constructs commands
//! from raw lines. `T<n|?|x|c>` codes are matched by shape rather than by
//! key. Schema conflicts are reported once, when a schema is registered.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::schema::{BUILTIN_SCHEMAS, CommandSchema, TOOL_CHANGE_SCHEMA};
use super::{Command, ToolId};
use crate::diagnostics::{DiagnosticCode, Diagnostics};
use crate::parser::classifier::split_code;
use crate::parser::fields::parse_fields;

static BUILTIN: LazyLock<CommandRegistry> =
    LazyLock::new(|| CommandRegistry::with_schemas(BUILTIN_SCHEMAS));

/// Code to schema registry
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    commands: HashMap<&'static str, &'static CommandSchema>,
    tool_change: &'static CommandSchema,
    registration: Diagnostics,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    /// Registry knowing only tool changes
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
            tool_change: &TOOL_CHANGE_SCHEMA,
            registration: Diagnostics::new(),
        }
    }

    /// Registry holding every schema of a static table
    pub fn with_schemas(schemas: &'static [CommandSchema]) -> Self {
        let mut registry = Self::new();
        for schema in schemas {
            registry.register(schema);
        }
        registry
    }

    /// Shared registry of all built-in commands
    pub fn builtin() -> &'static CommandRegistry {
        &BUILTIN
    }

    /// Add a schema, replacing any previous one for the same code
    pub fn register(&mut self, schema: &'static CommandSchema) {
        if schema.has_extruder_conflict() {
            log::warn!(
                "{} declares a T field, which conflicts with the extruder choice",
                schema.code
            );
            self.registration.report(
                DiagnosticCode::SchemaConflict,
                format!(
                    "{} declares a T field, which conflicts with the extruder choice",
                    schema.code
                ),
                schema.code,
            );
        }
        self.commands.insert(schema.code, schema);
    }

    /// Issues found while registering schemas
    pub fn registration_diagnostics(&self) -> &Diagnostics {
        &self.registration
    }

    pub fn get(&self, code: &str) -> Option<&'static CommandSchema> {
        self.commands
            .get(code.trim().to_ascii_uppercase().as_str())
            .copied()
    }

    /// Registered literal codes, sorted
    pub fn codes(&self) -> Vec<&'static str> {
        let mut codes: Vec<_> = self.commands.keys().copied().collect();
        codes.sort_unstable();
        codes
    }

    /// Construct the command for `code` from a raw line
    ///
    /// Returns `None` when the code is neither registered nor a tool
    /// change. The line's own token is checked against `code`; a mismatch
    /// is a diagnostic, not a failure.
    pub fn create(&self, code: &str, line: &str) -> Option<Command> {
        let requested = code.trim().to_ascii_uppercase();

        if let Some(schema) = self.commands.get(requested.as_str()).copied() {
            return Some(build(schema, &requested, schema.code.to_string(), None, line));
        }

        if !is_tool_change(&requested) {
            log::debug!("not a known command: {requested}");
            return None;
        }

        let suffix = &code.trim()[1..];
        let command = match ToolId::from_suffix(suffix) {
            Some(tool) => build(self.tool_change, &requested, tool.code(), Some(tool), line),
            None => {
                let fallback = ToolId::Index(0);
                let mut command =
                    build(self.tool_change, &requested, fallback.code(), Some(fallback), line);
                let message = if suffix.bytes().all(|b| b.is_ascii_digit()) {
                    format!("tool index {suffix} out of range, using T0")
                } else {
                    format!("unknown tool change '{}', using T0", code.trim())
                };
                command
                    .diagnostics
                    .report(DiagnosticCode::UnknownToolChange, message, line.trim());
                command
            }
        };
        Some(command)
    }
}

/// `T` followed by at least one character
fn is_tool_change(code: &str) -> bool {
    code.len() >= 2 && code.starts_with('T')
}

fn build(
    schema: &'static CommandSchema,
    requested: &str,
    code: String,
    tool: Option<ToolId>,
    line: &str,
) -> Command {
    let token = split_code(line);
    let context = line.trim();
    let mut diagnostics = token.diagnostics;

    if token.code != requested {
        diagnostics.report(
            DiagnosticCode::CodeMismatch,
            format!("{} does not match this code of {code}", token.token),
            context,
        );
    } else if token.token != code && token.token.eq_ignore_ascii_case(&code) {
        diagnostics.report(
            DiagnosticCode::CaseMismatch,
            format!("{} should be written as {code}", token.token),
            context,
        );
    }

    let parsed = parse_fields(token.field_area, schema, context);
    diagnostics.extend(parsed.diagnostics);

    Command {
        code,
        kind: schema.kind,
        schema: Some(schema),
        tool,
        fields: parsed.fields,
        comment: parsed.comment,
        diagnostics,
        raw: None,
    }
}

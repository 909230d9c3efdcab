//! GCode Command Model
//!
//! Parses single lines of 3D-printer GCode into a typed command model and
//! writes them back out in canonical form.
//!
//! This library provides:
//! - Line classification and schema-driven field parsing
//! - A registry of known commands with firmware variant resolution
//! - Round-trip serialization
//! - Whole-file batching and the `gcode-check` driver

pub mod cli;
pub mod command;
pub mod config;
pub mod diagnostics;
pub mod document;
pub mod parser;
pub mod render;

// Re-exports for clean public API
pub use command::{
    Command, CommandKind, CommandRegistry, FieldValue, Fields, Firmware, ToolId, TypedCommand,
    Variant,
};
pub use config::Config;
pub use diagnostics::{Diagnostic, DiagnosticCode, Diagnostics, Severity};
pub use document::{detect_firmware, parse_document, Document, ParsedLines};
pub use parser::{create_command, parse_line, ParsedLine};
pub use render::{render, render_line};

//! Command Model
//!
//! A parsed command line: its canonical code, the typed field map built
//! from the command's schema, the trailing comment and the diagnostics
//! collected while parsing it. Typed accessors live in [`typed`], firmware
//! reinterpretations in [`variant`].

pub mod registry;
pub mod schema;
pub mod tool;
pub mod typed;
pub mod variant;

use std::collections::BTreeMap;
use std::fmt;

use crate::diagnostics::Diagnostics;

pub use registry::CommandRegistry;
pub use schema::{CommandSchema, Domain, FieldSpec, ValueKind};
pub use tool::ToolId;
pub use typed::TypedCommand;
pub use variant::{Firmware, PrusaBuildPercentage, Variant};

/// A single typed field value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    /// Letter present without a value
    Flag,
    Text(String),
}

impl FieldValue {
    /// Integer view; floats are truncated toward zero
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(value) => Some(*value),
            FieldValue::Float(value) => Some(value.trunc() as i64),
            FieldValue::Flag | FieldValue::Text(_) => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Int(value) => Some(*value as f64),
            FieldValue::Float(value) => Some(*value),
            FieldValue::Flag | FieldValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(value) => write!(f, "{value}"),
            // Shortest representation that parses back to the same value
            FieldValue::Float(value) => write!(f, "{value}"),
            FieldValue::Flag => Ok(()),
            FieldValue::Text(value) => f.write_str(value),
        }
    }
}

/// Letter to value mapping for one line; letters are unique
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    values: BTreeMap<char, FieldValue>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning the one it replaced
    pub fn insert(&mut self, letter: char, value: FieldValue) -> Option<FieldValue> {
        self.values.insert(letter.to_ascii_uppercase(), value)
    }

    pub fn get(&self, letter: char) -> Option<&FieldValue> {
        self.values.get(&letter.to_ascii_uppercase())
    }

    pub fn contains(&self, letter: char) -> bool {
        self.values.contains_key(&letter.to_ascii_uppercase())
    }

    /// Whether every letter is present
    pub fn contains_all(&self, letters: &[char]) -> bool {
        letters.iter().all(|letter| self.contains(*letter))
    }

    pub fn int(&self, letter: char) -> Option<i64> {
        self.get(letter)?.as_int()
    }

    pub fn float(&self, letter: char) -> Option<f64> {
        self.get(letter)?.as_float()
    }

    pub fn text(&self, letter: char) -> Option<&str> {
        self.get(letter)?.as_text()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Fields in letter order (not schema order)
    pub fn iter(&self) -> impl Iterator<Item = (char, &FieldValue)> {
        self.values.iter().map(|(letter, value)| (*letter, value))
    }
}

/// Which command a line holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    RapidMove,
    LinearMove,
    Dwell,
    UnitsInches,
    UnitsMillimeters,
    Home,
    MeshBedLeveling,
    PrintMeshLevel,
    AbsolutePositioning,
    RelativePositioning,
    SetPosition,
    SetBuildPercentage,
    ExtruderAbsolute,
    ExtruderRelative,
    SetExtruderTemperature,
    FanOn,
    FanOff,
    WaitExtruderTemperature,
    FirmwareCapabilities,
    SetBedTemperature,
    WaitBedTemperature,
    MaxAcceleration,
    MaxFeedrate,
    DefaultAcceleration,
    AdvancedSettings,
    ExtrudeFactorOverride,
    LinearAdvance,
    ToolChange,
    /// Well-formed code the registry does not know
    Unrecognized,
    /// Line did not start with a letter
    Malformed,
}

/// One parsed command line
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub(crate) code: String,
    pub(crate) kind: CommandKind,
    pub(crate) schema: Option<&'static CommandSchema>,
    pub(crate) tool: Option<ToolId>,
    pub(crate) fields: Fields,
    pub(crate) comment: Option<String>,
    pub(crate) diagnostics: Diagnostics,
    /// Original text, kept only for lines without a schema
    pub(crate) raw: Option<String>,
}

impl Command {
    /// Best-effort command for a line the registry could not construct
    pub(crate) fn unmodeled(
        code: String,
        kind: CommandKind,
        comment: Option<String>,
        diagnostics: Diagnostics,
        raw: &str,
    ) -> Self {
        Self {
            code,
            kind,
            schema: None,
            tool: None,
            fields: Fields::new(),
            comment,
            diagnostics,
            raw: Some(raw.to_string()),
        }
    }

    /// Canonical code, e.g. "G1", "M104" or "T?"
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    pub fn schema(&self) -> Option<&'static CommandSchema> {
        self.schema
    }

    /// Whether the code was found in the registry
    pub fn is_recognized(&self) -> bool {
        self.schema.is_some()
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Trailing text after the inline `;`, verbatim
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Original line text for unrecognized or malformed commands
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// Tool identifier of a tool change
    pub fn tool(&self) -> Option<ToolId> {
        self.tool
    }

    /// Target extruder for commands taking an extruder choice
    pub fn extruder_index(&self) -> Option<i64> {
        self.schema
            .filter(|schema| schema.extruder_choice)
            .and_then(|_| self.fields.int('T'))
    }

    pub fn get(&self, letter: char) -> Option<&FieldValue> {
        self.fields.get(letter)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::render::render(self))
    }
}

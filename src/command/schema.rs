//! Command Schemas
//!
//! Static, declarative field tables: one `CommandSchema` per supported
//! code, each an ordered list of (letter, value kind, domain) entries.
//! Declaration order is the serialization order.

use super::{CommandKind, FieldValue};

/// How the raw text after a field letter is coerced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Int,
    Float,
    /// Letter stands alone, e.g. `G28 X`
    Flag,
    /// Free text kept verbatim, e.g. a firmware version
    Text,
}

/// Post-construction range check applied to a parsed value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Domain {
    NonNegative,
    /// 0 to 100 inclusive
    Percentage,
    /// 0 to 255 inclusive
    Byte,
}

impl Domain {
    /// Describe the violation, if the value lies outside this domain
    pub fn check(self, value: &FieldValue) -> Option<String> {
        let number = value.as_float()?;
        match self {
            Domain::NonNegative if number < 0.0 => Some("must be 0 or greater".to_string()),
            Domain::Percentage if !(0.0..=100.0).contains(&number) => {
                Some("must be between 0 and 100".to_string())
            }
            Domain::Byte if !(0.0..=255.0).contains(&number) => {
                Some("must be between 0 and 255".to_string())
            }
            _ => None,
        }
    }
}

/// One recognized letter of a command
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub letter: char,
    pub kind: ValueKind,
    pub domain: Option<Domain>,
    /// Human readable meaning, used in diagnostics
    pub meaning: &'static str,
}

impl FieldSpec {
    const fn new(letter: char, kind: ValueKind, meaning: &'static str) -> Self {
        Self {
            letter,
            kind,
            domain: None,
            meaning,
        }
    }

    const fn within(mut self, domain: Domain) -> Self {
        self.domain = Some(domain);
        self
    }
}

const fn int(letter: char, meaning: &'static str) -> FieldSpec {
    FieldSpec::new(letter, ValueKind::Int, meaning)
}

const fn float(letter: char, meaning: &'static str) -> FieldSpec {
    FieldSpec::new(letter, ValueKind::Float, meaning)
}

const fn flag(letter: char, meaning: &'static str) -> FieldSpec {
    FieldSpec::new(letter, ValueKind::Flag, meaning)
}

const fn text(letter: char, meaning: &'static str) -> FieldSpec {
    FieldSpec::new(letter, ValueKind::Text, meaning)
}

/// The reserved `T` field layered onto extruder-choice commands
pub static EXTRUDER_FIELD: FieldSpec = int('T', "extruder index").within(Domain::NonNegative);

/// Field table for one command code
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommandSchema {
    /// Canonical upper-case code, e.g. "G1"
    pub code: &'static str,
    pub kind: CommandKind,
    pub description: &'static str,
    pub fields: &'static [FieldSpec],
    /// Also accepts `T` as the target extruder index
    pub extruder_choice: bool,
}

impl CommandSchema {
    /// Recognized letters in serialization order, extruder field last
    pub fn field_specs(&self) -> impl Iterator<Item = &'static FieldSpec> {
        let extruder = self.extruder_choice.then_some(&EXTRUDER_FIELD);
        self.fields.iter().chain(extruder)
    }

    /// Spec for a letter; the command's own fields shadow the extruder field
    pub fn spec_for(&self, letter: char) -> Option<&'static FieldSpec> {
        self.field_specs().find(|spec| spec.letter == letter)
    }

    /// Own schema declares `T` while also taking an extruder choice
    pub fn has_extruder_conflict(&self) -> bool {
        self.extruder_choice && self.fields.iter().any(|spec| spec.letter == 'T')
    }
}

const MOVE: &[FieldSpec] = &[
    float('X', "position on X"),
    float('Y', "position on Y"),
    float('Z', "position on Z"),
    float('E', "amount to extrude"),
    float('F', "feedrate per minute"),
    float('S', "laser power"),
];

const DWELL: &[FieldSpec] = &[
    int('P', "milliseconds").within(Domain::NonNegative),
    float('S', "seconds").within(Domain::NonNegative),
];

const HOME: &[FieldSpec] = &[
    flag('X', "home X"),
    flag('Y', "home Y"),
    flag('Z', "home Z"),
    flag('W', "skip mesh bed leveling"),
];

const MESH_BED_LEVELING: &[FieldSpec] = &[
    int('N', "probe points per axis").within(Domain::NonNegative),
    int('R', "probe retries").within(Domain::NonNegative),
];

const SET_POSITION: &[FieldSpec] = &[
    float('X', "position on X"),
    float('Y', "position on Y"),
    float('Z', "position on Z"),
    float('E', "extruder position"),
];

const BUILD_PERCENTAGE: &[FieldSpec] = &[
    int('P', "percentage complete").within(Domain::Percentage),
    int('R', "minutes remaining").within(Domain::NonNegative),
    int('Q', "silent mode percentage complete").within(Domain::Percentage),
    int('S', "silent mode minutes remaining").within(Domain::NonNegative),
];

const EXTRUDER_TEMPERATURE: &[FieldSpec] = &[int('S', "temperature").within(Domain::NonNegative)];

const FAN_ON: &[FieldSpec] = &[
    int('P', "fan index").within(Domain::NonNegative),
    int('S', "fan speed").within(Domain::Byte),
];

const WAIT_TEMPERATURE: &[FieldSpec] = &[
    int('S', "temperature, wait while heating").within(Domain::NonNegative),
    int('R', "temperature, wait while heating or cooling").within(Domain::NonNegative),
];

const FIRMWARE_CAPABILITIES: &[FieldSpec] = &[
    flag('V', "report firmware version"),
    text('U', "expected firmware version"),
];

const BED_TEMPERATURE: &[FieldSpec] = &[int('S', "temperature").within(Domain::NonNegative)];

const AXIS_LIMITS: &[FieldSpec] = &[
    float('X', "X axis limit").within(Domain::NonNegative),
    float('Y', "Y axis limit").within(Domain::NonNegative),
    float('Z', "Z axis limit").within(Domain::NonNegative),
    float('E', "extruder limit").within(Domain::NonNegative),
];

const DEFAULT_ACCELERATION: &[FieldSpec] = &[
    int('P', "printing acceleration").within(Domain::NonNegative),
    int('R', "retract acceleration").within(Domain::NonNegative),
    int('S', "legacy printing and travel acceleration").within(Domain::NonNegative),
    int('T', "travel acceleration, or legacy filament acceleration").within(Domain::NonNegative),
];

const ADVANCED_SETTINGS: &[FieldSpec] = &[
    int('S', "minimum feedrate"),
    int('T', "minimum travel feedrate"),
    float('B', "minimum segment time"),
    float('X', "maximum X jerk"),
    float('Y', "maximum Y jerk"),
    float('Z', "maximum Z jerk"),
    float('E', "maximum E jerk"),
];

const EXTRUDE_FACTOR: &[FieldSpec] = &[int('S', "extrude factor percentage").within(Domain::Percentage)];

const LINEAR_ADVANCE: &[FieldSpec] = &[
    float('K', "advance factor").within(Domain::NonNegative),
    float('R', "ratio"),
    float('W', "extrusion width"),
    float('H', "layer height"),
    float('D', "filament diameter"),
];

const TOOL_CHANGE_FIELDS: &[FieldSpec] = &[int('P', "macro bitmask").within(Domain::NonNegative)];

const fn schema(
    code: &'static str,
    kind: CommandKind,
    description: &'static str,
    fields: &'static [FieldSpec],
) -> CommandSchema {
    CommandSchema {
        code,
        kind,
        description,
        fields,
        extruder_choice: false,
    }
}

const fn with_extruder(mut schema: CommandSchema) -> CommandSchema {
    schema.extruder_choice = true;
    schema
}

/// Every literal code the built-in registry knows
pub static BUILTIN_SCHEMAS: &[CommandSchema] = &[
    schema("G0", CommandKind::RapidMove, "Rapid move", MOVE),
    schema("G1", CommandKind::LinearMove, "Linear move", MOVE),
    schema("G4", CommandKind::Dwell, "Dwell", DWELL),
    schema("G20", CommandKind::UnitsInches, "Set units to inches", &[]),
    schema("G21", CommandKind::UnitsMillimeters, "Set units to millimeters", &[]),
    schema("G28", CommandKind::Home, "Move to origin", HOME),
    schema("G80", CommandKind::MeshBedLeveling, "Mesh bed leveling", MESH_BED_LEVELING),
    schema("G81", CommandKind::PrintMeshLevel, "Print mesh bed leveling", &[]),
    schema("G90", CommandKind::AbsolutePositioning, "Absolute positioning", &[]),
    schema("G91", CommandKind::RelativePositioning, "Relative positioning", &[]),
    schema("G92", CommandKind::SetPosition, "Set position", SET_POSITION),
    schema("M73", CommandKind::SetBuildPercentage, "Set build percentage", BUILD_PERCENTAGE),
    schema("M82", CommandKind::ExtruderAbsolute, "Set extruder to absolute mode", &[]),
    schema("M83", CommandKind::ExtruderRelative, "Set extruder to relative mode", &[]),
    with_extruder(schema(
        "M104",
        CommandKind::SetExtruderTemperature,
        "Set extruder temperature",
        EXTRUDER_TEMPERATURE,
    )),
    schema("M106", CommandKind::FanOn, "Fan on", FAN_ON),
    schema("M107", CommandKind::FanOff, "Fan off", &[]),
    with_extruder(schema(
        "M109",
        CommandKind::WaitExtruderTemperature,
        "Set extruder temperature and wait",
        WAIT_TEMPERATURE,
    )),
    schema(
        "M115",
        CommandKind::FirmwareCapabilities,
        "Get firmware version and capabilities",
        FIRMWARE_CAPABILITIES,
    ),
    schema("M140", CommandKind::SetBedTemperature, "Set bed temperature", BED_TEMPERATURE),
    schema(
        "M190",
        CommandKind::WaitBedTemperature,
        "Wait for bed temperature",
        WAIT_TEMPERATURE,
    ),
    schema(
        "M201",
        CommandKind::MaxAcceleration,
        "Set max printing acceleration",
        AXIS_LIMITS,
    ),
    schema("M203", CommandKind::MaxFeedrate, "Set max feedrate", AXIS_LIMITS),
    schema(
        "M204",
        CommandKind::DefaultAcceleration,
        "Set default acceleration",
        DEFAULT_ACCELERATION,
    ),
    schema("M205", CommandKind::AdvancedSettings, "Advanced settings", ADVANCED_SETTINGS),
    with_extruder(schema(
        "M221",
        CommandKind::ExtrudeFactorOverride,
        "Set extrude factor override percentage",
        EXTRUDE_FACTOR,
    )),
    schema("M900", CommandKind::LinearAdvance, "Set linear advance factors", LINEAR_ADVANCE),
];

/// Schema shared by every `T<n|?|x|c>` code
pub static TOOL_CHANGE_SCHEMA: CommandSchema =
    schema("T", CommandKind::ToolChange, "Tool change", TOOL_CHANGE_FIELDS);

//! Typed Command Views
//!
//! The tagged union of every modeled command. Each case wraps a small view
//! borrowing the command's field map and exposing named, typed accessors.

use std::time::Duration;

use super::{Command, CommandKind, Fields, ToolId};

/// Typed view of a parsed command
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypedCommand<'a> {
    RapidMove(Move<'a>),
    LinearMove(Move<'a>),
    Dwell(Dwell<'a>),
    UnitsInches,
    UnitsMillimeters,
    Home(Home<'a>),
    MeshBedLeveling(MeshBedLeveling<'a>),
    PrintMeshLevel,
    AbsolutePositioning,
    RelativePositioning,
    SetPosition(SetPosition<'a>),
    SetBuildPercentage(BuildPercentage<'a>),
    ExtruderAbsolute,
    ExtruderRelative,
    SetExtruderTemperature(Temperature<'a>),
    FanOn(FanOn<'a>),
    FanOff,
    WaitExtruderTemperature(WaitTemperature<'a>),
    FirmwareCapabilities(FirmwareCapabilities<'a>),
    SetBedTemperature(Temperature<'a>),
    WaitBedTemperature(WaitTemperature<'a>),
    MaxAcceleration(AxisLimits<'a>),
    MaxFeedrate(AxisLimits<'a>),
    DefaultAcceleration(DefaultAcceleration<'a>),
    AdvancedSettings(AdvancedSettings<'a>),
    ExtrudeFactorOverride(ExtrudeFactor<'a>),
    LinearAdvance(LinearAdvance<'a>),
    ToolChange(ToolChange<'a>),
    /// Unrecognized or malformed line
    Unmodeled,
}

impl Command {
    /// Typed view matching this command's kind
    pub fn typed(&self) -> TypedCommand<'_> {
        let fields = &self.fields;
        match self.kind {
            CommandKind::RapidMove => TypedCommand::RapidMove(Move {
                fields,
                linear: false,
            }),
            CommandKind::LinearMove => TypedCommand::LinearMove(Move {
                fields,
                linear: true,
            }),
            CommandKind::Dwell => TypedCommand::Dwell(Dwell { fields }),
            CommandKind::UnitsInches => TypedCommand::UnitsInches,
            CommandKind::UnitsMillimeters => TypedCommand::UnitsMillimeters,
            CommandKind::Home => TypedCommand::Home(Home { fields }),
            CommandKind::MeshBedLeveling => TypedCommand::MeshBedLeveling(MeshBedLeveling { fields }),
            CommandKind::PrintMeshLevel => TypedCommand::PrintMeshLevel,
            CommandKind::AbsolutePositioning => TypedCommand::AbsolutePositioning,
            CommandKind::RelativePositioning => TypedCommand::RelativePositioning,
            CommandKind::SetPosition => TypedCommand::SetPosition(SetPosition { fields }),
            CommandKind::SetBuildPercentage => TypedCommand::SetBuildPercentage(BuildPercentage { fields }),
            CommandKind::ExtruderAbsolute => TypedCommand::ExtruderAbsolute,
            CommandKind::ExtruderRelative => TypedCommand::ExtruderRelative,
            CommandKind::SetExtruderTemperature => {
                TypedCommand::SetExtruderTemperature(Temperature { fields })
            }
            CommandKind::FanOn => TypedCommand::FanOn(FanOn { fields }),
            CommandKind::FanOff => TypedCommand::FanOff,
            CommandKind::WaitExtruderTemperature => {
                TypedCommand::WaitExtruderTemperature(WaitTemperature { fields })
            }
            CommandKind::FirmwareCapabilities => {
                TypedCommand::FirmwareCapabilities(FirmwareCapabilities { fields })
            }
            CommandKind::SetBedTemperature => TypedCommand::SetBedTemperature(Temperature { fields }),
            CommandKind::WaitBedTemperature => {
                TypedCommand::WaitBedTemperature(WaitTemperature { fields })
            }
            CommandKind::MaxAcceleration => TypedCommand::MaxAcceleration(AxisLimits { fields }),
            CommandKind::MaxFeedrate => TypedCommand::MaxFeedrate(AxisLimits { fields }),
            CommandKind::DefaultAcceleration => {
                TypedCommand::DefaultAcceleration(DefaultAcceleration { fields })
            }
            CommandKind::AdvancedSettings => TypedCommand::AdvancedSettings(AdvancedSettings { fields }),
            CommandKind::ExtrudeFactorOverride => {
                TypedCommand::ExtrudeFactorOverride(ExtrudeFactor { fields })
            }
            CommandKind::LinearAdvance => TypedCommand::LinearAdvance(LinearAdvance { fields }),
            CommandKind::ToolChange => TypedCommand::ToolChange(ToolChange {
                fields,
                // Tool codes always carry an identifier; 0 mirrors the
                // fallback used for unreadable ones
                tool: self.tool.unwrap_or(ToolId::Index(0)),
            }),
            CommandKind::Unrecognized | CommandKind::Malformed => TypedCommand::Unmodeled,
        }
    }
}

/// G0 / G1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Move<'a> {
    fields: &'a Fields,
    linear: bool,
}

impl Move<'_> {
    pub fn is_linear_move(&self) -> bool {
        self.linear
    }

    pub fn x(&self) -> Option<f64> {
        self.fields.float('X')
    }

    pub fn y(&self) -> Option<f64> {
        self.fields.float('Y')
    }

    pub fn z(&self) -> Option<f64> {
        self.fields.float('Z')
    }

    /// Amount to extrude between start and end point
    pub fn e(&self) -> Option<f64> {
        self.fields.float('E')
    }

    /// Feedrate per minute
    pub fn f(&self) -> Option<f64> {
        self.fields.float('F')
    }

    /// Laser power
    pub fn s(&self) -> Option<f64> {
        self.fields.float('S')
    }
}

/// G4
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dwell<'a> {
    fields: &'a Fields,
}

impl Dwell<'_> {
    pub fn milliseconds(&self) -> Option<i64> {
        self.fields.int('P')
    }

    pub fn seconds(&self) -> Option<f64> {
        self.fields.float('S')
    }

    /// Requested pause; `P` wins when both are given. Negative or
    /// unrepresentable values yield `None`.
    pub fn duration(&self) -> Option<Duration> {
        if let Some(ms) = self.milliseconds() {
            return u64::try_from(ms).ok().map(Duration::from_millis);
        }
        self.seconds()
            .and_then(|s| Duration::try_from_secs_f64(s).ok())
    }
}

/// G28
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Home<'a> {
    fields: &'a Fields,
}

impl Home<'_> {
    pub fn x(&self) -> bool {
        self.fields.contains('X')
    }

    pub fn y(&self) -> bool {
        self.fields.contains('Y')
    }

    pub fn z(&self) -> bool {
        self.fields.contains('Z')
    }

    /// No axis named means every axis
    pub fn homes_all(&self) -> bool {
        !(self.x() || self.y() || self.z())
    }

    /// Prusa `W`: home without mesh bed leveling
    pub fn skip_mesh_leveling(&self) -> bool {
        self.fields.contains('W')
    }
}

/// G80
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshBedLeveling<'a> {
    fields: &'a Fields,
}

impl MeshBedLeveling<'_> {
    pub fn points(&self) -> Option<i64> {
        self.fields.int('N')
    }

    pub fn probe_retries(&self) -> Option<i64> {
        self.fields.int('R')
    }
}

/// G92
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetPosition<'a> {
    fields: &'a Fields,
}

impl SetPosition<'_> {
    pub fn x(&self) -> Option<f64> {
        self.fields.float('X')
    }

    pub fn y(&self) -> Option<f64> {
        self.fields.float('Y')
    }

    pub fn z(&self) -> Option<f64> {
        self.fields.float('Z')
    }

    pub fn e(&self) -> Option<f64> {
        self.fields.float('E')
    }
}

/// M73 read as the base command; see [`super::PrusaBuildPercentage`] for
/// the firmware-specific reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildPercentage<'a> {
    fields: &'a Fields,
}

impl BuildPercentage<'_> {
    pub fn percentage_complete(&self) -> Option<i64> {
        self.fields.int('P')
    }
}

/// M104 and M140
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Temperature<'a> {
    fields: &'a Fields,
}

impl Temperature<'_> {
    pub fn temperature(&self) -> Option<i64> {
        self.fields.int('S')
    }

    /// Only set on M104
    pub fn extruder_index(&self) -> Option<i64> {
        self.fields.int('T')
    }
}

/// M109 and M190
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaitTemperature<'a> {
    fields: &'a Fields,
}

impl WaitTemperature<'_> {
    /// Target temperature from `S`, else `R`
    pub fn temperature(&self) -> Option<i64> {
        self.fields.int('S').or_else(|| self.fields.int('R'))
    }

    /// `R` waits while cooling too; `S` only while heating
    pub fn waits_for_cooling(&self) -> bool {
        !self.fields.contains('S') && self.fields.contains('R')
    }

    /// Only set on M109
    pub fn extruder_index(&self) -> Option<i64> {
        self.fields.int('T')
    }
}

/// M106
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FanOn<'a> {
    fields: &'a Fields,
}

impl FanOn<'_> {
    pub fn fan_index(&self) -> Option<i64> {
        self.fields.int('P')
    }

    /// 0 to 255
    pub fn speed(&self) -> Option<i64> {
        self.fields.int('S')
    }
}

/// M115
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FirmwareCapabilities<'a> {
    fields: &'a Fields,
}

impl<'a> FirmwareCapabilities<'a> {
    pub fn get_version(&self) -> bool {
        self.fields.contains('V')
    }

    /// Version the file expects the firmware to be at least
    pub fn test_version(&self) -> Option<&'a str> {
        self.fields.text('U')
    }
}

/// M201 and M203
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisLimits<'a> {
    fields: &'a Fields,
}

impl AxisLimits<'_> {
    pub fn x(&self) -> Option<f64> {
        self.fields.float('X')
    }

    pub fn y(&self) -> Option<f64> {
        self.fields.float('Y')
    }

    pub fn z(&self) -> Option<f64> {
        self.fields.float('Z')
    }

    pub fn e(&self) -> Option<f64> {
        self.fields.float('E')
    }
}

/// M204. Legacy firmware takes `S` (all moves) and `T` (filament moves);
/// newer firmware takes `P` (printing), `R` (filament) and `T` (travel).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DefaultAcceleration<'a> {
    fields: &'a Fields,
}

impl DefaultAcceleration<'_> {
    pub fn is_legacy(&self) -> bool {
        self.fields.contains('S')
    }

    /// Moves while printing, mm/s^2
    pub fn print(&self) -> Option<i64> {
        if self.is_legacy() {
            self.fields.int('S')
        } else {
            self.fields.int('P')
        }
    }

    /// Filament moves, mm/s^2
    pub fn filament(&self) -> Option<i64> {
        if self.is_legacy() {
            self.fields.int('T')
        } else {
            self.fields.int('R')
        }
    }

    /// Moves without printing, mm/s^2
    pub fn travel(&self) -> Option<i64> {
        if self.is_legacy() {
            self.fields.int('S')
        } else {
            self.fields.int('T')
        }
    }
}

/// M205
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdvancedSettings<'a> {
    fields: &'a Fields,
}

impl AdvancedSettings<'_> {
    pub fn min_feedrate(&self) -> Option<i64> {
        self.fields.int('S')
    }

    pub fn min_travel_feedrate(&self) -> Option<i64> {
        self.fields.int('T')
    }

    pub fn min_segment_time(&self) -> Option<f64> {
        self.fields.float('B')
    }

    pub fn max_x_jerk(&self) -> Option<f64> {
        self.fields.float('X')
    }

    pub fn max_y_jerk(&self) -> Option<f64> {
        self.fields.float('Y')
    }

    pub fn max_z_jerk(&self) -> Option<f64> {
        self.fields.float('Z')
    }

    pub fn max_e_jerk(&self) -> Option<f64> {
        self.fields.float('E')
    }
}

/// M221
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtrudeFactor<'a> {
    fields: &'a Fields,
}

impl ExtrudeFactor<'_> {
    /// Percentage
    pub fn override_factor(&self) -> Option<i64> {
        self.fields.int('S')
    }

    pub fn extruder_index(&self) -> Option<i64> {
        self.fields.int('T')
    }
}

/// M900
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearAdvance<'a> {
    fields: &'a Fields,
}

impl LinearAdvance<'_> {
    pub fn k_factor(&self) -> Option<f64> {
        self.fields.float('K')
    }

    pub fn ratio(&self) -> Option<f64> {
        self.fields.float('R')
    }

    pub fn width(&self) -> Option<f64> {
        self.fields.float('W')
    }

    pub fn height(&self) -> Option<f64> {
        self.fields.float('H')
    }

    pub fn diameter(&self) -> Option<f64> {
        self.fields.float('D')
    }
}

/// T<n|?|x|c>
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolChange<'a> {
    fields: &'a Fields,
    tool: ToolId,
}

impl ToolChange<'_> {
    pub fn tool(&self) -> ToolId {
        self.tool
    }

    pub fn user_request_mmu_selection(&self) -> bool {
        self.tool.user_request_mmu_selection()
    }

    /// Bitmask of MMU macros to run, from `P`
    pub fn macros(&self) -> Option<i64> {
        self.fields.int('P')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::create_command;

    #[test]
    fn test_move_accessors() {
        let command = create_command("G1 X10 Y-5.5 F1200").unwrap();
        let TypedCommand::LinearMove(movement) = command.typed() else {
            panic!("Expected linear move");
        };
        assert!(movement.is_linear_move());
        assert_eq!(movement.x(), Some(10.0));
        assert_eq!(movement.y(), Some(-5.5));
        assert_eq!(movement.f(), Some(1200.0));
        assert_eq!(movement.z(), None);
    }

    #[test]
    fn test_dwell_duration() {
        let command = create_command("G4 P500").unwrap();
        let TypedCommand::Dwell(dwell) = command.typed() else {
            panic!("Expected dwell");
        };
        assert_eq!(dwell.duration(), Some(Duration::from_millis(500)));

        let command = create_command("G4 S1.5").unwrap();
        let TypedCommand::Dwell(dwell) = command.typed() else {
            panic!("Expected dwell");
        };
        assert_eq!(dwell.duration(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_dwell_duration_out_of_range() {
        let command = create_command("G4 S1e20").unwrap();
        assert!(command.diagnostics().is_empty());
        let TypedCommand::Dwell(dwell) = command.typed() else {
            panic!("Expected dwell");
        };
        assert_eq!(dwell.seconds(), Some(1e20));
        assert_eq!(dwell.duration(), None);

        let command = create_command("G4 S-1").unwrap();
        let TypedCommand::Dwell(dwell) = command.typed() else {
            panic!("Expected dwell");
        };
        assert_eq!(dwell.duration(), None);
    }

    #[test]
    fn test_home_flags() {
        let command = create_command("G28 W").unwrap();
        let TypedCommand::Home(home) = command.typed() else {
            panic!("Expected home");
        };
        assert!(home.homes_all());
        assert!(home.skip_mesh_leveling());

        let command = create_command("G28 X Y").unwrap();
        let TypedCommand::Home(home) = command.typed() else {
            panic!("Expected home");
        };
        assert!(home.x() && home.y() && !home.z());
        assert!(!home.homes_all());
    }

    #[test]
    fn test_default_acceleration_modes() {
        let legacy = create_command("M204 S1000 T800").unwrap();
        let TypedCommand::DefaultAcceleration(acc) = legacy.typed() else {
            panic!("Expected M204");
        };
        assert!(acc.is_legacy());
        assert_eq!(acc.print(), Some(1000));
        assert_eq!(acc.travel(), Some(1000));
        assert_eq!(acc.filament(), Some(800));

        let split = create_command("M204 P1250 R1250 T1500").unwrap();
        let TypedCommand::DefaultAcceleration(acc) = split.typed() else {
            panic!("Expected M204");
        };
        assert!(!acc.is_legacy());
        assert_eq!(acc.print(), Some(1250));
        assert_eq!(acc.filament(), Some(1250));
        assert_eq!(acc.travel(), Some(1500));
    }

    #[test]
    fn test_wait_temperature() {
        let command = create_command("M109 R180 T1").unwrap();
        let TypedCommand::WaitExtruderTemperature(wait) = command.typed() else {
            panic!("Expected M109");
        };
        assert_eq!(wait.temperature(), Some(180));
        assert!(wait.waits_for_cooling());
        assert_eq!(wait.extruder_index(), Some(1));
    }

    #[test]
    fn test_firmware_capabilities() {
        let command = create_command("M115 U3.8.1").unwrap();
        let TypedCommand::FirmwareCapabilities(caps) = command.typed() else {
            panic!("Expected M115");
        };
        assert_eq!(caps.test_version(), Some("3.8.1"));
        assert!(!caps.get_version());
    }

    #[test]
    fn test_advanced_settings_mixed_types() {
        let command = create_command("M205 S0 T0 B20000 X10 E4.5").unwrap();
        let TypedCommand::AdvancedSettings(settings) = command.typed() else {
            panic!("Expected M205");
        };
        assert_eq!(settings.min_feedrate(), Some(0));
        assert_eq!(settings.min_segment_time(), Some(20000.0));
        assert_eq!(settings.max_e_jerk(), Some(4.5));
        assert!(command.diagnostics().is_empty());
    }

    #[test]
    fn test_tool_change() {
        let command = create_command("T?").unwrap();
        let TypedCommand::ToolChange(change) = command.typed() else {
            panic!("Expected tool change");
        };
        assert!(change.user_request_mmu_selection());
        assert_eq!(change.macros(), None);
    }
}

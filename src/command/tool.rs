//! Tool identifiers of `T` codes.

use std::fmt;

/// Tool selected by a `T` code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolId {
    /// `T<n>`
    Index(u32),
    /// `T?`: let the user pick the filament slot on the printer
    Ask,
    /// `Tx`: load filament up to the extruder gears
    LoadToGears,
    /// `Tc`: load filament from the gears to the nozzle
    LoadToNozzle,
}

impl ToolId {
    /// Parse the characters after `T`; markers are case-insensitive
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "?" => Some(ToolId::Ask),
            "x" | "X" => Some(ToolId::LoadToGears),
            "c" | "C" => Some(ToolId::LoadToNozzle),
            digits if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
                digits.parse().ok().map(ToolId::Index)
            }
            _ => None,
        }
    }

    /// Canonical code, e.g. "T2" or "Tx"
    pub fn code(self) -> String {
        format!("T{self}")
    }

    pub fn index(self) -> Option<u32> {
        match self {
            ToolId::Index(index) => Some(index),
            _ => None,
        }
    }

    pub fn user_request_mmu_selection(self) -> bool {
        self == ToolId::Ask
    }

    pub fn load_to_gears(self) -> bool {
        self == ToolId::LoadToGears
    }

    pub fn load_to_nozzle(self) -> bool {
        self == ToolId::LoadToNozzle
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolId::Index(index) => write!(f, "{index}"),
            ToolId::Ask => f.write_str("?"),
            ToolId::LoadToGears => f.write_str("x"),
            ToolId::LoadToNozzle => f.write_str("c"),
        }
    }
}

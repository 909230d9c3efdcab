//! Check reports, as text lines or JSON

use std::fmt::Write as _;

use anyhow::Result;
use serde::Serialize;

use crate::command::{CommandKind, Firmware, TypedCommand};
use crate::config::Config;
use crate::diagnostics::{Diagnostic, Severity};
use crate::document::Document;

/// Last build-progress marker seen in a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub percentage: Option<i64>,
    pub minutes_remaining: Option<i64>,
    /// Prusa silent-mode pair (`Q`/`S`)
    pub silent: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub lines: usize,
    pub commands: usize,
    pub unrecognized: usize,
    pub firmware: Firmware,
    pub progress: Option<Progress>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Entry<'a> {
    pub line: usize,
    #[serde(flatten)]
    pub diagnostic: &'a Diagnostic,
}

/// Everything gcode-check says about one file
#[derive(Debug, Clone, Serialize)]
pub struct Report<'a> {
    pub file: String,
    pub summary: Summary,
    pub diagnostics: Vec<Entry<'a>>,
}

impl<'a> Report<'a> {
    /// Build a report, leaving out ignored diagnostic codes
    pub fn new(file: String, document: &'a Document, firmware: Firmware, config: &Config) -> Self {
        let diagnostics = document
            .diagnostics()
            .filter(|(_, diagnostic)| !config.is_ignored(diagnostic.code))
            .map(|(line, diagnostic)| Entry { line, diagnostic })
            .collect();

        let summary = Summary {
            lines: document.len(),
            commands: document.commands().count(),
            unrecognized: document.unrecognized_count(),
            firmware,
            progress: last_progress(document, firmware),
        };

        Self {
            file,
            summary,
            diagnostics,
        }
    }

    /// Whether the check fails; strict mode also fails on warnings
    pub fn failed(&self, strict: bool) -> bool {
        let threshold = if strict {
            Severity::Warning
        } else {
            Severity::Error
        };
        self.diagnostics
            .iter()
            .any(|entry| entry.diagnostic.severity >= threshold)
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for entry in &self.diagnostics {
            let _ = writeln!(out, "{}:{}: {}", self.file, entry.line, entry.diagnostic);
        }

        let summary = &self.summary;
        let _ = writeln!(
            out,
            "{}: {} lines, {} commands, {} unrecognized, firmware {}, {} diagnostics",
            self.file,
            summary.lines,
            summary.commands,
            summary.unrecognized,
            summary.firmware,
            self.diagnostics.len()
        );

        if let Some(progress) = &summary.progress {
            let percentage = progress
                .percentage
                .map_or_else(|| "?".to_string(), |p| p.to_string());
            let _ = write!(out, "{}: last progress {percentage}%", self.file);
            if let Some(minutes) = progress.minutes_remaining {
                let _ = write!(out, ", {minutes} min remaining");
            }
            if progress.silent {
                out.push_str(" (silent mode)");
            }
            out.push('\n');
        }
        out
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Progress reported by the last M73, read the way the firmware reads it
fn last_progress(document: &Document, firmware: Firmware) -> Option<Progress> {
    let command = document
        .commands()
        .filter(|command| command.kind() == CommandKind::SetBuildPercentage)
        .last()?;

    if firmware == Firmware::Prusa {
        if let Some(view) = command.prusa_build_percentage() {
            return Some(Progress {
                percentage: view.percentage_complete(),
                minutes_remaining: view.minutes_remaining(),
                silent: !view.is_regular_percentage(),
            });
        }
    }

    match command.typed() {
        TypedCommand::SetBuildPercentage(view) => Some(Progress {
            percentage: view.percentage_complete(),
            minutes_remaining: None,
            silent: false,
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Args;
    use clap::Parser;

    fn config(extra: &[&str]) -> Config {
        let mut argv = vec!["gcode-check", "part.gcode"];
        argv.extend_from_slice(extra);
        Config::merge(Args::parse_from(argv), None, None).unwrap()
    }

    const CONTENT: &str = "G28\nM104 S-5\nM73 Q40 S9\nM73 P50 R12\nM999\n";

    #[test]
    fn test_text_report() {
        let document = Document::parse(CONTENT);
        let report = Report::new("part.gcode".into(), &document, Firmware::Prusa, &config(&[]));
        let text = report.to_text();
        assert!(text.contains("part.gcode:2: warning[out-of-range]:"));
        assert!(text.contains("part.gcode:5: warning[unknown-command]: unknown gcode element: M999"));
        assert!(text.contains("5 lines, 5 commands, 1 unrecognized, firmware prusa, 2 diagnostics"));
        assert!(text.contains("last progress 50%, 12 min remaining"));
    }

    #[test]
    fn test_generic_firmware_ignores_prusa_pairs() {
        let document = Document::parse("M73 Q40 S9\n");
        let report = Report::new("a".into(), &document, Firmware::Generic, &config(&[]));
        let progress = report.summary.progress.unwrap();
        assert_eq!(progress.percentage, None);
        assert!(!progress.silent);

        let report = Report::new("a".into(), &document, Firmware::Prusa, &config(&[]));
        let progress = report.summary.progress.unwrap();
        assert_eq!(progress.percentage, Some(40));
        assert!(progress.silent);
    }

    #[test]
    fn test_ignored_codes_and_failure() {
        let document = Document::parse(CONTENT);
        let report = Report::new("a".into(), &document, Firmware::Generic, &config(&[]));
        assert!(!report.failed(false));
        assert!(report.failed(true));

        let config = config(&["--ignore", "out-of-range", "--ignore", "unknown-command"]);
        let report = Report::new("a".into(), &document, Firmware::Generic, &config);
        assert!(report.diagnostics.is_empty());
        assert!(!report.failed(true));
    }

    #[test]
    fn test_json_report() {
        let document = Document::parse("1 X2\n");
        let report = Report::new("a".into(), &document, Firmware::Generic, &config(&[]));
        assert!(report.failed(false));

        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["summary"]["firmware"], "generic");
        assert_eq!(value["diagnostics"][0]["line"], 1);
        assert_eq!(value["diagnostics"][0]["severity"], "error");
        assert_eq!(value["diagnostics"][0]["code"], "missing-code");
    }
}

//! Document batching
//!
//! Whole-file helpers on top of the line parser: a sequential fold into a
//! `Document`, a streaming iterator over any `BufRead`, and firmware
//! detection from modelines and slicer header comments.

use std::io::BufRead;
use std::sync::LazyLock;

use regex::Regex;

use crate::command::{Command, CommandKind, CommandRegistry, Firmware};
use crate::diagnostics::{Diagnostic, Severity};
use crate::parser::{parse_line_with, ParsedLine};
use crate::render::render_line;

static MODELINE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"gcode_flavor\s*=\s*([A-Za-z0-9_-]+)").ok());

static SLICER_HEADER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)generated by (PrusaSlicer|Slic3r Prusa Edition)").ok());

/// How many lines at each end of a file are searched for a modeline
const MODELINE_WINDOW: usize = 5;

/// All lines of one file, in order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    lines: Vec<ParsedLine>,
}

impl Document {
    /// Parse every line of `content` with the built-in registry
    pub fn parse(content: &str) -> Self {
        Self::parse_with(CommandRegistry::builtin(), content)
    }

    pub fn parse_with(registry: &CommandRegistry, content: &str) -> Self {
        let lines = content
            .lines()
            .map(|line| parse_line_with(registry, line))
            .collect();
        Self { lines }
    }

    pub fn lines(&self) -> &[ParsedLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Every command line, recognized or not
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.lines.iter().filter_map(ParsedLine::as_command)
    }

    /// Diagnostics in file order with 1-based line numbers
    pub fn diagnostics(&self) -> impl Iterator<Item = (usize, &Diagnostic)> {
        self.lines.iter().enumerate().flat_map(|(index, line)| {
            line.as_command()
                .into_iter()
                .flat_map(|command| command.diagnostics().iter())
                .map(move |diagnostic| (index + 1, diagnostic))
        })
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics()
            .any(|(_, diagnostic)| diagnostic.severity == Severity::Error)
    }

    /// Number of command lines the registry could not model
    pub fn unrecognized_count(&self) -> usize {
        self.commands()
            .filter(|command| {
                matches!(
                    command.kind(),
                    CommandKind::Unrecognized | CommandKind::Malformed
                )
            })
            .count()
    }

    /// Canonical text of the whole document, one line per input line
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&render_line(line));
            out.push('\n');
        }
        out
    }
}

/// Parse a whole file with the built-in registry
pub fn parse_document(content: &str) -> Document {
    Document::parse(content)
}

/// Streaming parser over a reader; the caller owns the reader
pub struct ParsedLines<'r, R: BufRead> {
    reader: R,
    registry: &'r CommandRegistry,
    line_buffer: String,
}

impl<R: BufRead> ParsedLines<'static, R> {
    pub fn new(reader: R) -> Self {
        Self::with_registry(reader, CommandRegistry::builtin())
    }
}

impl<'r, R: BufRead> ParsedLines<'r, R> {
    pub fn with_registry(reader: R, registry: &'r CommandRegistry) -> Self {
        Self {
            reader,
            registry,
            line_buffer: String::new(),
        }
    }
}

impl<R: BufRead> Iterator for ParsedLines<'_, R> {
    type Item = std::io::Result<ParsedLine>;

    fn next(&mut self) -> Option<Self::Item> {
        self.line_buffer.clear();
        match self.reader.read_line(&mut self.line_buffer) {
            Ok(0) => None, // EOF
            Ok(_) => Some(Ok(parse_line_with(self.registry, &self.line_buffer))),
            Err(e) => Some(Err(e)),
        }
    }
}

/// Detect the firmware a file targets
///
/// A `gcode_flavor=<name>` modeline in the first or last few lines wins;
/// otherwise a PrusaSlicer header comment implies Prusa firmware.
pub fn detect_firmware(content: &str) -> Option<Firmware> {
    detect_modeline_firmware(content).or_else(|| detect_slicer_firmware(content))
}

/// Firmware named by a modeline such as `; gcode_flavor=prusa`
pub fn detect_modeline_firmware(content: &str) -> Option<Firmware> {
    let modeline = MODELINE.as_ref()?;
    let lines: Vec<&str> = content.lines().collect();
    let check_lines: Vec<&str> = if lines.len() <= MODELINE_WINDOW * 2 {
        lines
    } else {
        let mut check = Vec::new();
        check.extend_from_slice(&lines[..MODELINE_WINDOW]);
        check.extend_from_slice(&lines[lines.len() - MODELINE_WINDOW..]);
        check
    };

    check_lines
        .iter()
        .filter(|line| line.trim_start().starts_with(';'))
        .filter_map(|line| modeline.captures(line))
        .find_map(|captures| captures.get(1)?.as_str().parse().ok())
}

/// Firmware implied by the slicer that generated the file
fn detect_slicer_firmware(content: &str) -> Option<Firmware> {
    let header = SLICER_HEADER.as_ref()?;
    content
        .lines()
        .take(MODELINE_WINDOW)
        .any(|line| line.trim_start().starts_with(';') && header.is_match(line))
        .then_some(Firmware::Prusa)
}

//! Configuration management for gcode-check.
//!
//! Handles:
//! - Command-line argument parsing
//! - User and project TOML configuration files
//!
//! Precedence is command line, then project file, then user file, then
//! built-in defaults.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use serde::Deserialize;

use crate::command::Firmware;
use crate::diagnostics::DiagnosticCode;

/// Name of the per-project configuration file
pub const PROJECT_CONFIG_FILE: &str = ".gcode-check.toml";

/// How diagnostics are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Command-line arguments for gcode-check
#[derive(Debug, Parser)]
#[command(name = "gcode-check")]
#[command(about = "Check and normalize G-code files")]
#[command(version)]
pub struct Args {
    /// G-code file to check
    pub file: PathBuf,

    #[arg(long, value_enum, help = "Report format")]
    pub format: Option<OutputFormat>,

    #[arg(long, help = "Write the normalized G-code instead of a report")]
    pub render: bool,

    #[arg(short, long, help = "Write output to this file instead of stdout")]
    pub output: Option<PathBuf>,

    #[arg(long, help = "Fail on warnings as well as errors")]
    pub strict: bool,

    /// Explicitly specify the firmware instead of detecting it
    #[arg(long, help = "Target firmware (generic, prusa)")]
    pub firmware: Option<Firmware>,

    #[arg(long = "ignore", value_name = "CODE", help = "Diagnostic code to ignore (repeatable)")]
    pub ignore: Vec<String>,

    #[arg(long, help = "Re-check the file whenever it changes")]
    pub watch: bool,

    #[arg(long, help = "Project configuration file to use instead of searching for one")]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        default_value = "warn",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

/// Contents of a configuration file; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub firmware: Option<Firmware>,
    pub strict: Option<bool>,
    pub format: Option<OutputFormat>,
    pub ignore: Vec<String>,
}

impl FileConfig {
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    pub file: PathBuf,
    pub format: OutputFormat,
    pub render: bool,
    pub output: Option<PathBuf>,
    pub strict: bool,
    /// Firmware explicitly configured; `None` means detect from the file
    pub firmware: Option<Firmware>,
    pub ignore: Vec<DiagnosticCode>,
    pub watch: bool,
    pub log_level: String,
    /// Project config that was applied, if any
    pub project_config_path: Option<PathBuf>,
}

impl Config {
    /// Create configuration from command-line arguments and config files
    pub fn from_args_and_env() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Create configuration from explicit arguments, reading config files
    pub fn from_args(args: Args) -> Result<Self> {
        let user = match user_config_path() {
            Some(path) if path.is_file() => Some(FileConfig::load(&path)?),
            _ => None,
        };

        let project_path = match &args.config {
            Some(path) => Some(path.clone()),
            None => {
                let cwd = std::env::current_dir().context("Failed to read working directory")?;
                find_project_config(&cwd)
            }
        };
        let project = project_path.as_deref().map(FileConfig::load).transpose()?;
        if let Some(path) = &project_path {
            log::info!("Using project config {}", path.display());
        }

        let mut config = Self::merge(args, project, user)?;
        config.project_config_path = project_path;
        Ok(config)
    }

    /// Apply precedence to already loaded sources (useful for testing)
    ///
    /// Ignored codes accumulate across every source.
    pub fn merge(args: Args, project: Option<FileConfig>, user: Option<FileConfig>) -> Result<Self> {
        let files: Vec<FileConfig> = project.into_iter().chain(user).collect();

        let format = args
            .format
            .or_else(|| files.iter().find_map(|file| file.format))
            .unwrap_or_default();
        let strict = args.strict || files.iter().find_map(|file| file.strict).unwrap_or(false);
        let firmware = args
            .firmware
            .or_else(|| files.iter().find_map(|file| file.firmware));

        let mut ignore = Vec::new();
        let names = args
            .ignore
            .iter()
            .chain(files.iter().flat_map(|file| file.ignore.iter()));
        for name in names {
            let Some(code) = DiagnosticCode::from_name(name) else {
                bail!("Unknown diagnostic code in ignore list: {name}");
            };
            if !ignore.contains(&code) {
                ignore.push(code);
            }
        }

        Ok(Config {
            file: args.file,
            format,
            render: args.render,
            output: args.output,
            strict,
            firmware,
            ignore,
            watch: args.watch,
            log_level: args.log_level,
            project_config_path: None,
        })
    }

    pub fn is_ignored(&self, code: DiagnosticCode) -> bool {
        self.ignore.contains(&code)
    }
}

/// `<config_dir>/gcode-check/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("gcode-check").join("config.toml"))
}

/// Closest project config at or above `start`
pub fn find_project_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(PROJECT_CONFIG_FILE))
        .find(|candidate| candidate.is_file())
}

//! gcode-check driver
//!
//! Reads one file, parses it as a document and either reports its
//! diagnostics or writes the normalized text back out.

pub mod report;
pub mod watch;

pub use report::{Progress, Report, Summary};

use std::process::ExitCode;

use anyhow::{Context, Result};
use tokio::io::AsyncWriteExt;

use crate::config::{Config, OutputFormat};
use crate::document::{detect_firmware, Document};

/// Initialize logging; `RUST_LOG` wins over the configured level
pub fn init_logging(level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Run gcode-check with a resolved configuration
pub async fn run(config: Config) -> Result<ExitCode> {
    if config.watch {
        watch::watch(&config).await?;
        return Ok(ExitCode::SUCCESS);
    }

    let passed = check_once(&config).await?;
    Ok(if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Check the configured file once and write the result; `Ok(false)` means
/// the file has diagnostics that fail the check
pub async fn check_once(config: &Config) -> Result<bool> {
    let content = tokio::fs::read_to_string(&config.file)
        .await
        .with_context(|| format!("Failed to read {}", config.file.display()))?;

    let document = Document::parse(&content);
    let firmware = config
        .firmware
        .or_else(|| detect_firmware(&content))
        .unwrap_or_default();
    log::debug!(
        "Parsed {} lines of {} as {firmware}",
        document.len(),
        config.file.display()
    );

    let report = Report::new(config.file.display().to_string(), &document, firmware, config);
    let passed = !report.failed(config.strict);

    let output = if config.render {
        document.render()
    } else {
        match config.format {
            OutputFormat::Text => report.to_text(),
            OutputFormat::Json => report.to_json()?,
        }
    };
    write_output(config, &output).await?;

    Ok(passed)
}

async fn write_output(config: &Config, output: &str) -> Result<()> {
    match &config.output {
        Some(path) => tokio::fs::write(path, output)
            .await
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(output.as_bytes()).await?;
            stdout.flush().await?;
            Ok(())
        }
    }
}

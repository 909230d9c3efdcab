use std::process::ExitCode;

use anyhow::Result;
use gcode_model::cli;
use gcode_model::config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let config = Config::from_args_and_env()?;
    cli::init_logging(&config.log_level);
    cli::run(config).await
}

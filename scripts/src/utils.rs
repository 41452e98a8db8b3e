//! Utilities for the migration scripts.

use std::process::{self, Command};

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::errors::ScriptError;

/// Executes a command, returning an error if the command fails
pub fn command_success_or(mut cmd: Command, err_msg: &str) -> Result<(), ScriptError> {
    info!("Running command: {:?}", cmd);
    let status = cmd
        .status()
        .map_err(|e| ScriptError::ContractCompilation(format!("{err_msg}: {e}")))?;

    if !status.success() {
        Err(ScriptError::ContractCompilation(format!("{err_msg} ({status})")))
    } else {
        Ok(())
    }
}

/// Install the pretty log formatter, `RUST_LOG` overrides the `info` default
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .pretty()
        .with_env_filter(filter)
        .init();
}

/// Log the error and terminate the process with its exit code
pub fn exit_with(err: ScriptError) -> ! {
    error!("Error: {}", err);
    process::exit(err.exit_code())
}

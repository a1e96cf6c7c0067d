//! # Firebreak CLI
//!
//! Shared plumbing for the `boxoauth2` and `firebreak-box` binaries.

pub mod args;
pub mod authorize;
pub mod scan;

use core_runtime::logging::{init_logging, LogLevel, LoggingConfig};

/// Start stderr logging at the level `--debug` selects.
pub fn init_cli_logging(debug: u8) -> anyhow::Result<()> {
    init_logging(LoggingConfig::default().with_level(LogLevel::from_debug_level(debug)))?;
    Ok(())
}

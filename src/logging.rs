//! Logging initialization
//!
//! The filter comes from `DMC_DB_LOG`, then the config file, then the
//! `-v` count. The interactive browser owns the terminal, so it logs to a
//! file instead of stderr.

use anyhow::{anyhow, Context, Result};
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Default filter directive for a `-v` count
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn env_filter(directive: Option<&str>, verbosity: u8) -> Result<EnvFilter> {
    if std::env::var_os(crate::config::LOG_ENV).is_some() {
        return EnvFilter::try_from_env(crate::config::LOG_ENV)
            .with_context(|| format!("Invalid {}", crate::config::LOG_ENV));
    }
    let directive = directive.unwrap_or_else(|| level_for(verbosity));
    EnvFilter::try_new(directive).with_context(|| format!("Invalid log filter {:?}", directive))
}

/// Log to stderr
pub fn init(directive: Option<&str>, verbosity: u8) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(directive, verbosity)?)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!(e))
}

/// Log to `path`, appending
pub fn init_file(directive: Option<&str>, verbosity: u8, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create log directory")?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {:?}", path))?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(directive, verbosity)?)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!(e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for() {
        assert_eq!(level_for(0), "warn");
        assert_eq!(level_for(2), "debug");
        assert_eq!(level_for(9), "trace");
    }
}

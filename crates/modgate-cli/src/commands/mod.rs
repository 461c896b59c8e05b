//! Subcommand implementations.

pub mod check;
pub mod modules;

use anyhow::Context;
use modgate_checker::CheckerConfig;
use std::path::Path;

/// File name looked up next to the program file when `--config` is absent
pub const CONFIG_FILE: &str = "modgate.toml";

/// Load the checker configuration for a run
pub fn load_config(program: &Path, explicit: Option<&Path>) -> anyhow::Result<CheckerConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let beside = program
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(CONFIG_FILE);
            if !beside.is_file() {
                tracing::debug!("no {} found, using defaults", CONFIG_FILE);
                return Ok(CheckerConfig::default());
            }
            beside
        }
    };

    tracing::debug!(path = %path.display(), "loading config");
    CheckerConfig::from_file(&path)
        .with_context(|| format!("Failed to load config {}", path.display()))
}

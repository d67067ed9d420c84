use crate::error::{Result, StypeError};
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing::Level;

pub fn parse_level(level: &str) -> Result<Level> {
    level
        .trim()
        .parse::<Level>()
        .map_err(|err| StypeError::Logging(format!("invalid log level {level:?}: {err}")))
}

/// Send `tracing` output to `path`; the terminal belongs to the UI.
pub fn init(level: &str, path: &Path) -> Result<()> {
    let level = parse_level(level)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_target(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| StypeError::Logging(err.to_string()))
}

//! Read/write `SynthConfig` JSON files.
//!
//! Missing keys fall back to defaults, so a file may contain only the
//! parameters it overrides.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::debug;

use crate::domain::SynthConfig;
use crate::error::AppError;

/// Read and validate a config JSON file.
pub fn read_config_json(path: &Path) -> Result<SynthConfig, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::invalid(format!("Failed to open config JSON '{}': {e}", path.display())))?;
    let config: SynthConfig = serde_json::from_reader(file)
        .map_err(|e| AppError::invalid(format!("Invalid config JSON '{}': {e}", path.display())))?;
    config.validate()?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Write a config as pretty JSON.
pub fn write_config_json(path: &Path, config: &SynthConfig) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::invalid(format!("Failed to create config JSON '{}': {e}", path.display())))?;
    write_config(file, config)
}

pub fn write_config<W: Write>(mut out: W, config: &SynthConfig) -> Result<(), AppError> {
    serde_json::to_writer_pretty(&mut out, config)
        .map_err(|e| AppError::invalid(format!("Failed to write config JSON: {e}")))?;
    writeln!(out).map_err(|e| AppError::invalid(format!("Failed to write config JSON: {e}")))?;
    Ok(())
}

//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod scan;
pub mod simulate;
pub mod validate;

use mrio_core::types::SectorKey;

use crate::{CliError, Result};

/// Parse a `REGION:Sector` argument into a sector key.
pub fn parse_sector_key(value: &str) -> Result<SectorKey> {
    match value.split_once(':') {
        Some((region, sector)) if !region.is_empty() && !sector.is_empty() => {
            Ok(SectorKey::new(region.trim(), sector.trim()))
        }
        _ => Err(CliError::InvalidArgument(format!(
            "expected REGION:Sector, got '{}'",
            value
        ))),
    }
}

/// Read a file the command requires, mapping absence to a clear error.
pub fn read_required(path: &str) -> Result<String> {
    if !std::path::Path::new(path).exists() {
        return Err(CliError::FileNotFound(path.to_string()));
    }
    Ok(std::fs::read_to_string(path)?)
}

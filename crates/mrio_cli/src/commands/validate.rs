//! Validate command implementation
//!
//! Parses a scenario file and, when a period is given, checks that every
//! shocked (region, sector) pair exists in that period's label universe.

use mrio_engine::shock_set_from_yaml;
use mrio_store::{CsvDatasetSource, MatrixStore};
use tracing::info;

use super::read_required;
use crate::{CliError, Result};

/// Run the validate command
pub fn run(data_dir: &str, scenario: &str, period: Option<i32>) -> Result<()> {
    let shocks = shock_set_from_yaml(&read_required(scenario)?)?;
    info!("Parsed {} shocks from {}", shocks.len(), scenario);

    if let Some(period) = period {
        let store = MatrixStore::new(CsvDatasetSource::new(data_dir));
        let tables = store.get(period)?;
        let unknown: Vec<String> = shocks
            .iter()
            .filter(|shock| !tables.labels().contains(&shock.key()))
            .map(|shock| shock.key().to_string())
            .collect();
        if !unknown.is_empty() {
            return Err(CliError::InvalidArgument(format!(
                "scenario references sectors absent from period {}: {}",
                period,
                unknown.join(", ")
            )));
        }
        println!(
            "{}: {} shocks, all sectors present in period {}",
            scenario,
            shocks.len(),
            period
        );
    } else {
        println!("{}: {} shocks, well-formed", scenario, shocks.len());
    }
    Ok(())
}

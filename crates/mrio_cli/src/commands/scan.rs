//! Scan command implementation
//!
//! Ranks every sector in the period's universe by the damage a single
//! shock to it does to the target sector.

use mrio_core::types::SectorKey;
use mrio_store::{CsvDatasetSource, MatrixStore};
use serde_json::json;
use tracing::info;

use super::parse_sector_key;
use crate::{CliError, Result};

/// Run the scan command
pub fn run(
    data_dir: &str,
    period: i32,
    target: &str,
    magnitude: f64,
    top: usize,
    format: &str,
) -> Result<()> {
    let target = parse_sector_key(target)?;
    info!("Scanning period {} for worst shocks on {}", period, target);

    let store = MatrixStore::new(CsvDatasetSource::new(data_dir));
    let tables = store.get(period)?;
    let candidates: Vec<SectorKey> = tables.labels().iter().cloned().collect();
    let hits = mrio_engine::scan(&tables, &target, &candidates, magnitude, top)?;

    match format {
        "json" => {
            let doc = json!({
                "period": period,
                "target": { "region": &target.region, "sector": &target.sector },
                "magnitude": magnitude,
                "hits": hits
                    .iter()
                    .map(|hit| json!({
                        "region": &hit.candidate.region,
                        "sector": &hit.candidate.sector,
                        "delta_x": hit.delta_x,
                    }))
                    .collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        "table" => {
            println!(
                "\nWorst single shocks on {} at magnitude {:.0}%:",
                target,
                magnitude * 100.0
            );
            for (rank, hit) in hits.iter().enumerate() {
                println!(
                    "  {:>3}. {:<36} Δ {:>14.4}",
                    rank + 1,
                    hit.candidate,
                    hit.delta_x
                );
            }
            if hits.is_empty() {
                println!("  (no candidates produced a solvable shock)");
            }
        }
        other => {
            return Err(CliError::InvalidArgument(format!(
                "Unknown format: {}. Supported: json, table",
                other
            )));
        }
    }

    info!("Scan complete");
    Ok(())
}

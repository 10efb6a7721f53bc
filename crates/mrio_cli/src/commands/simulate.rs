//! Simulate command implementation
//!
//! Loads a period's tables, propagates the scenario's shocks under the
//! requested closure and reports the output changes, plus attribution at
//! a target sector or aggregated over a portfolio.

use mrio_core::regions::country_name;
use mrio_engine::{
    attribute, portfolio_from_yaml, shock_set_from_yaml, solve, Attribution, AttributionBasis,
    Closure,
};
use mrio_store::{CsvDatasetSource, MatrixStore};
use serde_json::json;
use tracing::info;

use super::{parse_sector_key, read_required};
use crate::{CliError, Result};

/// How many sectors the Δx summary shows.
const SUMMARY_ROWS: usize = 10;

/// Run the simulate command
#[allow(clippy::too_many_arguments)]
pub fn run(
    data_dir: &str,
    period: i32,
    closure: &str,
    scenario: &str,
    target: Option<&str>,
    portfolio: Option<&str>,
    format: &str,
) -> Result<()> {
    let closure = parse_closure(closure)?;
    info!("Simulating scenario {} for period {}", scenario, period);
    info!("  Closure: {}", closure);

    let store = MatrixStore::new(CsvDatasetSource::new(data_dir));
    let tables = store.get(period)?;
    let shocks = shock_set_from_yaml(&read_required(scenario)?)?;
    let outcome = solve(&tables, &shocks, closure)?;

    let target_report = match target {
        Some(raw) => {
            let key = parse_sector_key(raw)?;
            let attribution = attribute(
                &tables,
                &outcome.delta_x,
                &shocks,
                &key,
                AttributionBasis::from(closure),
            )?;
            Some((key, attribution))
        }
        None => None,
    };

    let portfolio_report = match portfolio {
        Some(path) => {
            let portfolio = portfolio_from_yaml(&read_required(path)?)?;
            let impact = portfolio.value_impact(&tables, &outcome.delta_x)?;
            let attribution = portfolio.attribute(
                &tables,
                &outcome.delta_x,
                &shocks,
                AttributionBasis::from(closure),
            )?;
            Some((impact, attribution))
        }
        None => None,
    };

    let top = outcome.top_impacts(tables.labels(), SUMMARY_ROWS);

    match format {
        "json" => {
            let mut doc = json!({
                "period": period,
                "closure": closure.name(),
                "shocks": shocks.len(),
                "top_impacts": top
                    .iter()
                    .map(|(key, delta)| json!({
                        "region": &key.region,
                        "sector": &key.sector,
                        "delta_x": delta,
                    }))
                    .collect::<Vec<_>>(),
            });
            if let Some((key, attribution)) = &target_report {
                doc["target"] = json!({
                    "region": &key.region,
                    "sector": &key.sector,
                    "total_impact": attribution.total_impact,
                    "causes": attribution_json(attribution),
                });
            }
            if let Some((impact, attribution)) = &portfolio_report {
                doc["portfolio"] = json!({
                    "before": impact.before,
                    "after": impact.after,
                    "percent_change": impact.percent_change(),
                    "causes": attribution_json(attribution),
                });
            }
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        "table" => {
            println!("\nTop output changes (period {}, {}):", period, closure);
            println!("┌──────────────────────────────────────┬──────────────────┐");
            println!("│ Sector                               │ Δ output         │");
            println!("├──────────────────────────────────────┼──────────────────┤");
            for (key, delta) in &top {
                println!("│ {:<36} │ {:>16.4} │", truncate(&key.to_string(), 36), delta);
            }
            println!("└──────────────────────────────────────┴──────────────────┘");

            if let Some((key, attribution)) = &target_report {
                println!("\nAttribution at {}:", key);
                print_attribution(attribution);
            }
            if let Some((impact, attribution)) = &portfolio_report {
                println!("\nPortfolio value: {:.4} -> {:.4} ({:+.2}%)",
                    impact.before, impact.after, impact.percent_change());
                print_attribution(attribution);
            }
        }
        other => {
            return Err(CliError::InvalidArgument(format!(
                "Unknown format: {}. Supported: json, table",
                other
            )));
        }
    }

    info!("Simulation complete");
    Ok(())
}

fn parse_closure(value: &str) -> Result<Closure> {
    match value {
        "leontief" => Ok(Closure::Leontief),
        "ghosh" => Ok(Closure::Ghosh),
        other => Err(CliError::InvalidArgument(format!(
            "Unknown closure: {}. Supported: leontief, ghosh",
            other
        ))),
    }
}

fn attribution_json(attribution: &Attribution) -> serde_json::Value {
    json!(attribution
        .causes()
        .iter()
        .map(|(key, pct)| json!({
            "region": &key.region,
            "sector": &key.sector,
            "percent": pct,
        }))
        .collect::<Vec<_>>())
}

fn print_attribution(attribution: &Attribution) {
    if !attribution.has_impact() {
        println!("  no measurable impact");
        return;
    }
    println!("  total impact: {:.4}", attribution.total_impact);
    for (key, pct) in attribution.causes() {
        println!(
            "  {:>7.2}%  {} - {}",
            pct,
            country_name(&key.region),
            key.sector
        );
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let cut: String = value.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

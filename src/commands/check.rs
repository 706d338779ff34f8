use anyhow::Result;
use std::path::Path;

use super::load_unit_graph;

/// Checks a rule file for conversion cycles. Returns whether it is clean.
pub fn run(rules: &Path, json: bool) -> Result<bool> {
    let graph = load_unit_graph(rules)?;
    let report = graph.check()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(report.ok);
    }

    if let Some(warning) = report.warning() {
        eprintln!("Warning: {}", warning);
        for cycle in &report.cycles {
            eprintln!("  {}", cycle);
        }
        return Ok(false);
    }

    println!(
        "Rules OK: {} units, {} conversions, no cycles",
        report.unit_count, report.conversion_count
    );
    Ok(true)
}

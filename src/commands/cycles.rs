use anyhow::Result;
use std::path::Path;
use unitgraph::units::NamedCircle;

use super::load_unit_graph;

pub fn run(rules: &Path, json: bool, limit: usize) -> Result<()> {
    let graph = load_unit_graph(rules)?;
    let cycles = graph.find_cycles()?;

    if json {
        print_json(&cycles, limit)?;
    } else {
        print!("{}", format_human(&cycles, limit));
    }
    Ok(())
}

fn listed(cycles: &[NamedCircle], limit: usize) -> &[NamedCircle] {
    if limit == 0 || limit >= cycles.len() {
        cycles
    } else {
        &cycles[..limit]
    }
}

fn print_json(cycles: &[NamedCircle], limit: usize) -> Result<()> {
    let output = serde_json::json!({
        "cycle_count": cycles.len(),
        "inconsistent_count": cycles.iter().filter(|c| c.is_inconsistent()).count(),
        "cycles": listed(cycles, limit),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub(crate) fn format_human(cycles: &[NamedCircle], limit: usize) -> String {
    if cycles.is_empty() {
        return "No conversion cycles detected.\n".to_string();
    }

    let mut out = format!("Cycles detected: {}\n\n", cycles.len());
    let shown = listed(cycles, limit);
    for (i, cycle) in shown.iter().enumerate() {
        out.push_str(&format!("  {}. {}", i + 1, cycle));
        if let Some(factor) = cycle.round_trip_factor {
            out.push_str(&format!(" [round trip x{}]", factor));
        }
        if cycle.is_inconsistent() {
            out.push_str(" INCONSISTENT");
        }
        out.push('\n');
    }
    if shown.len() < cycles.len() {
        out.push_str(&format!("  ... and {} more\n", cycles.len() - shown.len()));
    }
    out
}

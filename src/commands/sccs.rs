use anyhow::Result;
use std::path::Path;

use super::load_unit_graph;

pub fn run(rules: &Path, json: bool) -> Result<()> {
    let graph = load_unit_graph(rules)?;
    let components = graph.cyclic_components()?;

    if json {
        let output = serde_json::json!({
            "component_count": components.len(),
            "components": components,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if components.is_empty() {
        println!("No mutually convertible unit groups.");
        return Ok(());
    }
    println!("Mutually convertible unit groups: {}\n", components.len());
    for (i, units) in components.iter().enumerate() {
        println!("  {}. {}", i + 1, units.join(", "));
    }
    Ok(())
}

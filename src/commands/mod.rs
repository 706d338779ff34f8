pub mod check;
pub mod cycles;
pub mod sccs;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use unitgraph::config::{CONFIG_FILE, Config};
use unitgraph::rules::RuleSet;
use unitgraph::units::UnitGraph;

/// Loads a rule file and builds its conversion graph.
pub fn load_unit_graph(rules: &Path) -> Result<UnitGraph> {
    let set = RuleSet::load(rules)
        .with_context(|| format!("Failed to load rules from {}", rules.display()))?;
    let graph = set
        .to_unit_graph()
        .with_context(|| format!("Invalid rules in {}", rules.display()))?;
    Ok(graph)
}

/// Path of the config file: explicit, or `unitgraph.toml` next to the rules.
pub fn config_path(explicit: Option<&Path>, rules: &Path) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => rules
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(CONFIG_FILE),
    }
}

pub fn load_config(explicit: Option<&Path>, rules: &Path) -> Result<Config> {
    let path = config_path(explicit, rules);
    if explicit.is_some() {
        return Config::load(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()));
    }
    Config::load_or_default(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_defaults_next_to_rules() {
        let path = config_path(None, Path::new("/data/rules.toml"));
        assert_eq!(path, PathBuf::from("/data/unitgraph.toml"));

        let explicit = config_path(Some(Path::new("other.toml")), Path::new("/data/rules.toml"));
        assert_eq!(explicit, PathBuf::from("other.toml"));
    }

    #[test]
    fn test_load_unit_graph_reports_path() {
        let tmp = tempfile::TempDir::new().unwrap();
        let rules = tmp.path().join("rules.csv");
        std::fs::write(&rules, "kg,g").unwrap();
        let err = load_unit_graph(&rules).unwrap_err();
        assert!(format!("{:#}", err).contains("rules.csv"));
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let tmp = tempfile::TempDir::new().unwrap();
        let rules = tmp.path().join("rules.toml");
        let missing = tmp.path().join("nope.toml");
        assert!(load_config(Some(&missing), &rules).is_err());
        assert_eq!(load_config(None, &rules).unwrap(), Config::default());
    }
}

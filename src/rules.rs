use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::error::GraphError;
use crate::units::UnitGraph;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unsupported rule file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("conversion {from} -> {to} uses undeclared unit '{unit}'")]
    UnknownUnit {
        unit: String,
        from: String,
        to: String,
    },
    #[error("conversion {from} -> {to} has non-positive factor {factor}")]
    InvalidFactor { from: String, to: String, factor: f64 },
    #[error(transparent)]
    Graph(#[from] GraphError),
}

// ---------------------------------------------------------------------------
// Rule files
// ---------------------------------------------------------------------------

/// Serialization format of a rule file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Json,
    Yaml,
}

impl Format {
    /// Picks the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, RuleError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Ok(Format::Toml),
            Some("json") => Ok(Format::Json),
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            _ => Err(RuleError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// One accepted conversion rule: `from` can be converted into `to`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    pub from: String,
    pub to: String,
    /// Multiplier taking an amount in `from` to an amount in `to`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factor: Option<f64>,
}

/// A set of conversion rules as stored on disk.
///
/// ```toml
/// units = ["kg", "g"]
///
/// [[conversions]]
/// from = "kg"
/// to = "g"
/// factor = 1000.0
/// ```
///
/// When `units` is non-empty every conversion must use declared units, and
/// the declared order fixes the unit ids. Otherwise units are taken from
/// the conversions in the order they appear.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub units: Vec<String>,
    #[serde(default, alias = "conversion")]
    pub conversions: Vec<Conversion>,
}

impl RuleSet {
    /// Loads a rule file, choosing the parser by extension.
    pub fn load(path: &Path) -> Result<Self, RuleError> {
        let format = Format::from_path(path)?;
        let content = fs::read_to_string(path)?;
        let rules = Self::parse(&content, format)?;
        debug!(
            "loaded {} conversions from {}",
            rules.conversions.len(),
            path.display()
        );
        Ok(rules)
    }

    pub fn parse(content: &str, format: Format) -> Result<Self, RuleError> {
        Ok(match format {
            Format::Toml => toml::from_str(content)?,
            Format::Json => serde_json::from_str(content)?,
            Format::Yaml => serde_yaml::from_str(content)?,
        })
    }

    /// Checks declared units and factors, then builds the conversion graph.
    pub fn to_unit_graph(&self) -> Result<UnitGraph, RuleError> {
        let mut graph = UnitGraph::new();
        for unit in &self.units {
            graph.add_unit(unit);
        }
        let strict = !self.units.is_empty();

        for rule in &self.conversions {
            if strict {
                for unit in [&rule.from, &rule.to] {
                    if graph.id_of(unit).is_none() {
                        return Err(RuleError::UnknownUnit {
                            unit: unit.clone(),
                            from: rule.from.clone(),
                            to: rule.to.clone(),
                        });
                    }
                }
            }
            if let Some(factor) = rule.factor
                && (factor.is_nan() || factor <= 0.0)
            {
                return Err(RuleError::InvalidFactor {
                    from: rule.from.clone(),
                    to: rule.to.clone(),
                    factor,
                });
            }
            graph.add_conversion(&rule.from, &rule.to, rule.factor);
        }
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOML_RULES: &str = r#"
units = ["kg", "g", "mg"]

[[conversions]]
from = "kg"
to = "g"
factor = 1000.0

[[conversions]]
from = "g"
to = "kg"
factor = 0.001

[[conversions]]
from = "g"
to = "mg"
"#;

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("a.toml")).unwrap(), Format::Toml);
        assert_eq!(Format::from_path(Path::new("a.json")).unwrap(), Format::Json);
        assert_eq!(Format::from_path(Path::new("a.yml")).unwrap(), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("a.yaml")).unwrap(), Format::Yaml);
        assert!(matches!(
            Format::from_path(Path::new("rules.txt")),
            Err(RuleError::UnsupportedFormat(_))
        ));
        assert!(Format::from_path(Path::new("rules")).is_err());
    }

    #[test]
    fn test_parse_toml() {
        let rules = RuleSet::parse(TOML_RULES, Format::Toml).unwrap();
        assert_eq!(rules.units, vec!["kg", "g", "mg"]);
        assert_eq!(rules.conversions.len(), 3);
        assert_eq!(rules.conversions[0].factor, Some(1000.0));
        assert_eq!(rules.conversions[2].factor, None);
    }

    #[test]
    fn test_parse_singular_table_name() {
        let rules = RuleSet::parse(
            "[[conversion]]\nfrom = \"a\"\nto = \"b\"\n",
            Format::Toml,
        )
        .unwrap();
        assert_eq!(rules.conversions.len(), 1);
        assert!(rules.units.is_empty());
    }

    #[test]
    fn test_parse_json_and_yaml() {
        let json = r#"{"conversions": [{"from": "cup", "to": "ml", "factor": 240.0}]}"#;
        let rules = RuleSet::parse(json, Format::Json).unwrap();
        assert_eq!(rules.conversions[0].to, "ml");

        let yaml = "conversions:\n  - from: cup\n    to: ml\n  - from: ml\n    to: cup\n";
        let rules = RuleSet::parse(yaml, Format::Yaml).unwrap();
        assert_eq!(rules.conversions.len(), 2);
        let cycles = rules.to_unit_graph().unwrap().find_cycles().unwrap();
        assert_eq!(cycles.len(), 1);
    }

    #[test]
    fn test_parse_errors_are_typed() {
        assert!(matches!(
            RuleSet::parse("conversions = 3", Format::Toml),
            Err(RuleError::Toml(_))
        ));
        assert!(matches!(
            RuleSet::parse("{", Format::Json),
            Err(RuleError::Json(_))
        ));
    }

    #[test]
    fn test_declared_units_fix_ids() {
        let rules = RuleSet::parse(TOML_RULES, Format::Toml).unwrap();
        let graph = rules.to_unit_graph().unwrap();
        assert_eq!(graph.id_of("mg"), Some(3));
        let cycles = graph.find_cycles().unwrap();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].units, vec!["kg", "g"]);
    }

    #[test]
    fn test_undeclared_unit_rejected() {
        let rules = RuleSet {
            units: vec!["kg".into()],
            conversions: vec![Conversion {
                from: "kg".into(),
                to: "lb".into(),
                factor: None,
            }],
        };
        let err = rules.to_unit_graph().unwrap_err();
        assert!(matches!(err, RuleError::UnknownUnit { ref unit, .. } if unit == "lb"));
        assert_eq!(
            err.to_string(),
            "conversion kg -> lb uses undeclared unit 'lb'"
        );
    }

    #[test]
    fn test_non_positive_factor_rejected() {
        let rules = RuleSet {
            units: Vec::new(),
            conversions: vec![Conversion {
                from: "a".into(),
                to: "b".into(),
                factor: Some(0.0),
            }],
        };
        assert!(matches!(
            rules.to_unit_graph(),
            Err(RuleError::InvalidFactor { .. })
        ));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.toml");
        fs::write(&path, TOML_RULES).unwrap();
        let rules = RuleSet::load(&path).unwrap();
        assert_eq!(rules.conversions.len(), 3);

        let missing = dir.path().join("missing.toml");
        assert!(matches!(RuleSet::load(&missing), Err(RuleError::Io(_))));
    }
}

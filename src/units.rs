//! Unit-of-measure conversion graphs.
//!
//! Bridges string unit names ("kg", "cup", ...) and the integer vertex ids
//! used by the graph algorithms. Units get ids `1..=n` in the order they
//! are first seen, so the built [`Graph`] uses the default 1-based naming.

use std::collections::HashMap;
use std::fmt;

use log::info;
use serde::Serialize;

use crate::circle::CircleSearch;
use crate::error::Result;
use crate::graph::{Graph, Vertex};
use crate::scc::SccFinder;

/// A conversion rule chain that leads back to its starting unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedCircle {
    /// Units in traversal order; the last converts back into the first.
    pub units: Vec<String>,
    /// Product of the conversion factors around the circuit, when every
    /// rule on it carries a factor. Anything other than 1 means the rules
    /// contradict each other.
    pub round_trip_factor: Option<f64>,
}

impl NamedCircle {
    /// True when the round trip multiplies by something other than 1.
    pub fn is_inconsistent(&self) -> bool {
        self.round_trip_factor
            .is_some_and(|f| (f - 1.0).abs() > 1e-9 * f.abs().max(1.0))
    }
}

impl fmt::Display for NamedCircle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for unit in &self.units {
            write!(f, "{} -> ", unit)?;
        }
        match self.units.first() {
            Some(first) => write!(f, "{}", first),
            None => Ok(()),
        }
    }
}

/// Result of checking a set of conversion rules for cycles.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub ok: bool,
    pub unit_count: usize,
    pub conversion_count: usize,
    /// Groups of units that can all be converted into each other.
    pub components: Vec<Vec<String>>,
    pub cycles: Vec<NamedCircle>,
}

impl CycleReport {
    /// Units that take part in at least one cycle, first-seen order.
    pub fn cyclic_units(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for unit in self.cycles.iter().flat_map(|c| &c.units) {
            if !out.contains(&unit.as_str()) {
                out.push(unit);
            }
        }
        out
    }

    /// User-facing warning, or `None` if no cycle was found.
    pub fn warning(&self) -> Option<String> {
        if self.ok {
            return None;
        }
        Some(format!(
            "Units {} have a cyclic conversion chain ({} cycle{})",
            self.cyclic_units().join(", "),
            self.cycles.len(),
            if self.cycles.len() == 1 { "" } else { "s" }
        ))
    }
}

/// Directed graph of unit conversions with string-named units.
#[derive(Debug, Clone, Default)]
pub struct UnitGraph {
    names: Vec<String>,
    name_to_id: HashMap<String, Vertex>,
    adj: Vec<Vec<Vertex>>,
    factors: HashMap<(Vertex, Vertex), f64>,
}

impl UnitGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a unit and returns its id. Existing units keep their id.
    pub fn add_unit(&mut self, name: &str) -> Vertex {
        if let Some(&id) = self.name_to_id.get(name) {
            return id;
        }
        self.names.push(name.to_string());
        self.adj.push(Vec::new());
        let id = self.names.len() as Vertex;
        self.name_to_id.insert(name.to_string(), id);
        id
    }

    /// Records that `from` can be converted into `to`, adding either unit
    /// if needed. Repeating a conversion does not add a second edge; a
    /// later factor replaces an earlier one.
    pub fn add_conversion(&mut self, from: &str, to: &str, factor: Option<f64>) {
        let from_id = self.add_unit(from);
        let to_id = self.add_unit(to);
        let successors = &mut self.adj[(from_id - 1) as usize];
        if !successors.contains(&to_id) {
            successors.push(to_id);
        }
        if let Some(factor) = factor {
            self.factors.insert((from_id, to_id), factor);
        }
    }

    pub fn id_of(&self, name: &str) -> Option<Vertex> {
        self.name_to_id.get(name).copied()
    }

    pub fn name_of(&self, id: Vertex) -> Option<&str> {
        let i = usize::try_from(id.checked_sub(1)?).ok()?;
        self.names.get(i).map(String::as_str)
    }

    pub fn unit_count(&self) -> usize {
        self.names.len()
    }

    pub fn conversion_count(&self) -> usize {
        self.adj.iter().map(Vec::len).sum()
    }

    /// Builds the conversion graph (vertex `i` is the i-th unit added).
    pub fn graph(&self) -> Result<Graph> {
        let vertices: Vec<Vertex> = (1..=self.names.len() as Vertex).collect();
        let mut edge_pointers = Vec::with_capacity(self.adj.len() + 1);
        let mut edges = Vec::with_capacity(self.conversion_count());
        edge_pointers.push(0);
        for successors in &self.adj {
            edges.extend_from_slice(successors);
            edge_pointers.push(edges.len());
        }
        Graph::new(vertices, edge_pointers, edges)
    }

    fn names_of(&self, ids: &[Vertex]) -> Vec<String> {
        ids.iter()
            .map(|&id| self.name_of(id).unwrap_or("?").to_string())
            .collect()
    }

    fn round_trip_factor(&self, ids: &[Vertex]) -> Option<f64> {
        let n = ids.len();
        (0..n)
            .map(|i| self.factors.get(&(ids[i], ids[(i + 1) % n])).copied())
            .product()
    }

    /// Every elementary conversion cycle, named.
    pub fn find_cycles(&self) -> Result<Vec<NamedCircle>> {
        let graph = self.graph()?;
        let mut search = CircleSearch::new(&graph);
        Ok(search
            .run()?
            .iter()
            .map(|c| NamedCircle {
                units: self.names_of(c.vertices()),
                round_trip_factor: self.round_trip_factor(c.vertices()),
            })
            .collect())
    }

    /// Groups of mutually convertible units (more than one unit each).
    pub fn cyclic_components(&self) -> Result<Vec<Vec<String>>> {
        let graph = self.graph()?;
        Ok(SccFinder::new(&graph)
            .run()?
            .iter()
            .map(|c| self.names_of(c.vertices()))
            .collect())
    }

    /// Runs the full check: components and cycles.
    pub fn check(&self) -> Result<CycleReport> {
        let components = self.cyclic_components()?;
        let cycles = self.find_cycles()?;
        info!(
            "checked {} units, {} conversions: {} cycles",
            self.unit_count(),
            self.conversion_count(),
            cycles.len()
        );
        Ok(CycleReport {
            ok: cycles.is_empty(),
            unit_count: self.unit_count(),
            conversion_count: self.conversion_count(),
            components,
            cycles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kitchen() -> UnitGraph {
        let mut g = UnitGraph::new();
        g.add_conversion("kg", "g", Some(1000.0));
        g.add_conversion("g", "kg", Some(0.001));
        g.add_conversion("g", "mg", Some(1000.0));
        g.add_conversion("cup", "ml", Some(240.0));
        g
    }

    // ─────────────────────────────────────────────────────
    // Building
    // ─────────────────────────────────────────────────────

    #[test]
    fn test_ids_are_one_based_in_insertion_order() {
        let g = kitchen();
        assert_eq!(g.id_of("kg"), Some(1));
        assert_eq!(g.id_of("g"), Some(2));
        assert_eq!(g.id_of("mg"), Some(3));
        assert_eq!(g.id_of("ml"), Some(5));
        assert_eq!(g.id_of("oz"), None);
        assert_eq!(g.name_of(4), Some("cup"));
        assert_eq!(g.name_of(0), None);
        assert_eq!(g.name_of(6), None);
        assert_eq!(g.unit_count(), 5);
    }

    #[test]
    fn test_duplicate_conversion_is_one_edge() {
        let mut g = UnitGraph::new();
        g.add_conversion("a", "b", None);
        g.add_conversion("a", "b", Some(2.0));
        assert_eq!(g.conversion_count(), 1);
        let graph = g.graph().unwrap();
        assert_eq!(graph.out_neighbours(1), Some(&[2][..]));
    }

    #[test]
    fn test_graph_layout() {
        let graph = kitchen().graph().unwrap();
        assert_eq!(graph.vertices(), &[1, 2, 3, 4, 5]);
        assert_eq!(graph.edge_pointers(), &[0, 1, 3, 3, 4, 4]);
        assert_eq!(graph.edges(), &[2, 1, 3, 5]);
    }

    // ─────────────────────────────────────────────────────
    // Cycles
    // ─────────────────────────────────────────────────────

    #[test]
    fn test_finds_kg_g_cycle() {
        let cycles = kitchen().find_cycles().unwrap();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].units, vec!["kg", "g"]);
        assert_eq!(cycles[0].to_string(), "kg -> g -> kg");
        let factor = cycles[0].round_trip_factor.unwrap();
        assert!((factor - 1.0).abs() < 1e-12);
        assert!(!cycles[0].is_inconsistent());
    }

    #[test]
    fn test_inconsistent_round_trip() {
        let mut g = UnitGraph::new();
        g.add_conversion("cup", "tbsp", Some(16.0));
        g.add_conversion("tbsp", "tsp", Some(3.0));
        g.add_conversion("tsp", "cup", Some(1.0 / 50.0));
        let cycles = g.find_cycles().unwrap();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].units, vec!["cup", "tbsp", "tsp"]);
        assert!(cycles[0].is_inconsistent());
    }

    #[test]
    fn test_missing_factor_gives_none() {
        let mut g = UnitGraph::new();
        g.add_conversion("a", "b", Some(2.0));
        g.add_conversion("b", "a", None);
        let cycles = g.find_cycles().unwrap();
        assert_eq!(cycles[0].round_trip_factor, None);
        assert!(!cycles[0].is_inconsistent());
    }

    #[test]
    fn test_self_conversion_not_reported() {
        let mut g = UnitGraph::new();
        g.add_conversion("pinch", "pinch", Some(1.0));
        assert!(g.find_cycles().unwrap().is_empty());
        assert!(g.check().unwrap().ok);
    }

    // ─────────────────────────────────────────────────────
    // Report
    // ─────────────────────────────────────────────────────

    #[test]
    fn test_report_for_kitchen() {
        let report = kitchen().check().unwrap();
        assert!(!report.ok);
        assert_eq!(report.unit_count, 5);
        assert_eq!(report.conversion_count, 4);
        assert_eq!(report.components, vec![vec!["kg".to_string(), "g".to_string()]]);
        assert_eq!(report.cyclic_units(), vec!["kg", "g"]);
        assert_eq!(
            report.warning().unwrap(),
            "Units kg, g have a cyclic conversion chain (1 cycle)"
        );
    }

    #[test]
    fn test_report_ok_has_no_warning() {
        let mut g = UnitGraph::new();
        g.add_conversion("l", "ml", Some(1000.0));
        let report = g.check().unwrap();
        assert!(report.ok);
        assert!(report.cycles.is_empty());
        assert_eq!(report.warning(), None);
    }

    #[test]
    fn test_report_serializes() {
        let report = kitchen().check().unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["ok"], false);
        assert_eq!(json["cycles"][0]["units"], serde_json::json!(["kg", "g"]));
    }
}

pub mod error;
pub mod graph;
pub mod stack;
pub mod dfs;
pub mod scc;
pub mod circle;
pub mod units;
pub mod rules;
pub mod config;

pub use error::GraphError;
pub use graph::{Graph, Vertex};
pub use stack::Stack;
pub use dfs::{Dfs, DfsVisitor, Discovery};
pub use scc::SccFinder;
pub use circle::{Circle, CircleSearch, elementary_circuits};
pub use units::{CycleReport, NamedCircle, UnitGraph};
pub use rules::{Conversion, Format, RuleError, RuleSet};
pub use config::Config;

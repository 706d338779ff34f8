use thiserror::Error;

use crate::graph::Vertex;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors raised while building a [`Graph`](crate::graph::Graph) or running
/// one of the traversal algorithms over it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("edge pointer array has length {actual}, expected {expected} (vertex count + 1)")]
    PointerLength { expected: usize, actual: usize },
    #[error("edge pointer array must start at 0, found {0}")]
    PointerStart(usize),
    #[error("last edge pointer is {actual} but there are {edges} edges")]
    PointerEnd { actual: usize, edges: usize },
    #[error("edge pointers decrease at position {position} ({previous} > {next})")]
    NonMonotonicPointers {
        position: usize,
        previous: usize,
        next: usize,
    },
    #[error("edge {from} -> {to} points at a vertex that is not in the graph")]
    UnknownEdgeTarget { from: Vertex, to: Vertex },
    #[error("vertex {0} appears more than once")]
    DuplicateVertex(Vertex),
    #[error("vertex {found} at position {position} breaks the 1..n naming (expected {expected})")]
    NonContiguousNames {
        position: usize,
        expected: Vertex,
        found: Vertex,
    },
    #[error("vertex {0} is not in the graph")]
    UnknownVertex(Vertex),
    #[error("empty stack")]
    EmptyStack,
}

pub type Result<T> = std::result::Result<T, GraphError>;

//! Compact directed graph over integer-named vertices.
//!
//! The graph is stored in compressed sparse row form:
//!
//! * `vertices`: the external vertex names, length n
//! * `edge_pointers`: prefix sums of out-degrees, length n + 1
//! * `edges`: concatenated successor names
//!
//! The successors of `vertices[i]` are `edges[edge_pointers[i]..edge_pointers[i + 1]]`.
//! Algorithms never see internal indices directly; they translate names
//! with [`Graph::index_of`].

use std::collections::HashMap;
use std::fmt;

use crate::error::{GraphError, Result};

/// External vertex name (a unit-of-measure id in the calling domain).
pub type Vertex = i64;

/// How a graph maps an external vertex name to its internal index.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Naming {
    /// Names are `1..=n`; index is `name - 1`.
    OneBased,
    /// Index is the position of the name in `vertices`.
    Positional(HashMap<Vertex, usize>),
}

/// Immutable directed graph. Build once, share freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    vertices: Vec<Vertex>,
    edge_pointers: Vec<usize>,
    edges: Vec<Vertex>,
    naming: Naming,
}

impl Default for Graph {
    fn default() -> Self {
        Self::empty()
    }
}

impl Graph {
    /// Builds a graph whose vertices are named `1..=n` in order.
    ///
    /// # Errors
    /// Fails if the names are not exactly `1, 2, .., n` or if the pointer
    /// and edge arrays are inconsistent (see [`Graph::with_names`]).
    ///
    /// # Example
    /// ```
    /// use unitgraph::graph::Graph;
    ///
    /// // 1 → 2 → 3 → 1
    /// let g = Graph::new(vec![1, 2, 3], vec![0, 1, 2, 3], vec![2, 3, 1]).unwrap();
    /// assert_eq!(g.out_neighbours(2), Some(&[3][..]));
    /// assert_eq!(g.out_neighbours(7), None);
    /// ```
    pub fn new(vertices: Vec<Vertex>, edge_pointers: Vec<usize>, edges: Vec<Vertex>) -> Result<Self> {
        for (position, &found) in vertices.iter().enumerate() {
            let expected = position as Vertex + 1;
            if found != expected {
                return Err(GraphError::NonContiguousNames {
                    position,
                    expected,
                    found,
                });
            }
        }
        Self::validate_pointers(vertices.len(), &edge_pointers, edges.len())?;
        let n = vertices.len() as Vertex;
        for i in 0..vertices.len() {
            for &to in &edges[edge_pointers[i]..edge_pointers[i + 1]] {
                if !(1..=n).contains(&to) {
                    return Err(GraphError::UnknownEdgeTarget {
                        from: vertices[i],
                        to,
                    });
                }
            }
        }
        Ok(Self {
            vertices,
            edge_pointers,
            edges,
            naming: Naming::OneBased,
        })
    }

    /// Builds a graph over arbitrary distinct vertex names. Internal indices
    /// are positions in `vertices`.
    ///
    /// # Errors
    /// * [`GraphError::DuplicateVertex`] if a name repeats
    /// * pointer errors if `edge_pointers` is not a valid prefix-sum array
    ///   of length `vertices.len() + 1` ending at `edges.len()`
    /// * [`GraphError::UnknownEdgeTarget`] if an edge names a missing vertex
    pub fn with_names(
        vertices: Vec<Vertex>,
        edge_pointers: Vec<usize>,
        edges: Vec<Vertex>,
    ) -> Result<Self> {
        let lookup = positions(&vertices)?;
        Self::validate_pointers(vertices.len(), &edge_pointers, edges.len())?;
        for (i, &from) in vertices.iter().enumerate() {
            for &to in &edges[edge_pointers[i]..edge_pointers[i + 1]] {
                if !lookup.contains_key(&to) {
                    return Err(GraphError::UnknownEdgeTarget { from, to });
                }
            }
        }
        Ok(Self {
            vertices,
            edge_pointers,
            edges,
            naming: Naming::Positional(lookup),
        })
    }

    /// Builds a graph from `(vertex, successors)` pairs, keeping both the
    /// vertex order and each successor list order.
    pub fn from_adjacency(adjacency: &[(Vertex, Vec<Vertex>)]) -> Result<Self> {
        let mut vertices = Vec::with_capacity(adjacency.len());
        let mut edge_pointers = Vec::with_capacity(adjacency.len() + 1);
        let mut edges = Vec::new();
        edge_pointers.push(0);
        for (v, successors) in adjacency {
            vertices.push(*v);
            edges.extend_from_slice(successors);
            edge_pointers.push(edges.len());
        }
        Self::with_names(vertices, edge_pointers, edges)
    }

    /// The graph with no vertices.
    pub fn empty() -> Self {
        Self {
            vertices: Vec::new(),
            edge_pointers: vec![0],
            edges: Vec::new(),
            naming: Naming::OneBased,
        }
    }

    fn validate_pointers(n: usize, edge_pointers: &[usize], edge_count: usize) -> Result<()> {
        if edge_pointers.len() != n + 1 {
            return Err(GraphError::PointerLength {
                expected: n + 1,
                actual: edge_pointers.len(),
            });
        }
        if edge_pointers[0] != 0 {
            return Err(GraphError::PointerStart(edge_pointers[0]));
        }
        for (position, pair) in edge_pointers.windows(2).enumerate() {
            if pair[0] > pair[1] {
                return Err(GraphError::NonMonotonicPointers {
                    position: position + 1,
                    previous: pair[0],
                    next: pair[1],
                });
            }
        }
        if edge_pointers[n] != edge_count {
            return Err(GraphError::PointerEnd {
                actual: edge_pointers[n],
                edges: edge_count,
            });
        }
        Ok(())
    }

    /// Maps an external vertex name to its internal index.
    pub fn index_of(&self, v: Vertex) -> Option<usize> {
        match &self.naming {
            Naming::OneBased => {
                let i = usize::try_from(v.checked_sub(1)?).ok()?;
                (i < self.vertices.len()).then_some(i)
            }
            Naming::Positional(lookup) => lookup.get(&v).copied(),
        }
    }

    /// Successors of `v` in stored order, or `None` if `v` is not a vertex.
    pub fn out_neighbours(&self, v: Vertex) -> Option<&[Vertex]> {
        self.index_of(v).map(|i| self.successors_at(i))
    }

    /// Successors of the vertex at internal index `i`.
    pub(crate) fn successors_at(&self, i: usize) -> &[Vertex] {
        &self.edges[self.edge_pointers[i]..self.edge_pointers[i + 1]]
    }

    /// Returns the subgraph induced by `subset`.
    ///
    /// The result keeps the names of `subset` verbatim and in the given
    /// order, and keeps exactly those edges whose endpoints are both in
    /// `subset`, in their original order.
    ///
    /// # Errors
    /// [`GraphError::UnknownVertex`] if a name is not in this graph,
    /// [`GraphError::DuplicateVertex`] if `subset` repeats a name.
    pub fn induced_subgraph(&self, subset: &[Vertex]) -> Result<Self> {
        let lookup = positions(subset)?;
        let mut edge_pointers = Vec::with_capacity(subset.len() + 1);
        let mut edges = Vec::new();
        edge_pointers.push(0);
        for &v in subset {
            let i = self.index_of(v).ok_or(GraphError::UnknownVertex(v))?;
            edges.extend(
                self.successors_at(i)
                    .iter()
                    .filter(|w| lookup.contains_key(w))
                    .copied(),
            );
            edge_pointers.push(edges.len());
        }
        Ok(Self {
            vertices: subset.to_vec(),
            edge_pointers,
            edges,
            naming: Naming::Positional(lookup),
        })
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn edge_pointers(&self) -> &[usize] {
        &self.edge_pointers
    }

    pub fn edges(&self) -> &[Vertex] {
        &self.edges
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains(&self, v: Vertex) -> bool {
        self.index_of(v).is_some()
    }

    pub fn has_edge(&self, from: Vertex, to: Vertex) -> bool {
        self.out_neighbours(from)
            .is_some_and(|succ| succ.contains(&to))
    }

    pub fn min_vertex(&self) -> Option<Vertex> {
        self.vertices.iter().copied().min()
    }

    pub fn max_vertex(&self) -> Option<Vertex> {
        self.vertices.iter().copied().max()
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.vertices.iter().enumerate() {
            let succ: Vec<String> = self.successors_at(i).iter().map(|w| w.to_string()).collect();
            writeln!(f, "{} -> [{}]", v, succ.join(", "))?;
        }
        Ok(())
    }
}

fn positions(names: &[Vertex]) -> Result<HashMap<Vertex, usize>> {
    let mut lookup = HashMap::with_capacity(names.len());
    for (i, &v) in names.iter().enumerate() {
        if lookup.insert(v, i).is_some() {
            return Err(GraphError::DuplicateVertex(v));
        }
    }
    Ok(lookup)
}

//! Generic depth-first traversal with pluggable hooks.
//!
//! A [`Dfs`] walks every vertex of a [`Graph`] in stored order and every
//! edge in stored order, numbering vertices as it discovers them. What the
//! traversal *computes* is supplied by a [`DfsVisitor`]: the SCC finder is
//! one visitor, and tests use small recording visitors.
//!
//! The walk is iterative (an explicit stack of `(vertex, edge cursor)`
//! frames), so deep graphs do not exhaust the native call stack.

use crate::error::{GraphError, Result};
use crate::graph::{Graph, Vertex};

/// Traversal callbacks. Every hook defaults to a no-op.
///
/// Hooks receive the traversal's [`Discovery`] so they can compare
/// discovery numbers, and may fail; the first error aborts the run.
pub trait DfsVisitor {
    /// Called once before any vertex is visited.
    fn init(&mut self, _dfs: &Discovery<'_>) -> Result<()> {
        Ok(())
    }

    /// A new DFS tree starts at `v`. `v` is already numbered.
    fn root(&mut self, _dfs: &Discovery<'_>, _v: Vertex) -> Result<()> {
        Ok(())
    }

    /// Edge `v → w` where `w` was unvisited. `w` is already numbered and
    /// will be explored right after this hook returns.
    fn traverse_tree_edge(&mut self, _dfs: &Discovery<'_>, _v: Vertex, _w: Vertex) -> Result<()> {
        Ok(())
    }

    /// Edge `v → w` where `w` was already visited (back, forward, cross
    /// edges and self-loops).
    fn traverse_non_tree_edge(
        &mut self,
        _dfs: &Discovery<'_>,
        _v: Vertex,
        _w: Vertex,
    ) -> Result<()> {
        Ok(())
    }

    /// Exploration of `v` finished; `u` is the tree parent `v` was entered
    /// from (`u == v` for a root).
    fn backtrack(&mut self, _dfs: &Discovery<'_>, _u: Vertex, _v: Vertex) -> Result<()> {
        Ok(())
    }
}

/// Discovery numbers assigned so far during one traversal.
#[derive(Debug, Clone)]
pub struct Discovery<'g> {
    graph: &'g Graph,
    numbers: Vec<usize>,
    next: usize,
}

impl<'g> Discovery<'g> {
    fn new(graph: &'g Graph) -> Self {
        Self {
            graph,
            numbers: vec![graph.len() + 1; graph.len()],
            next: 1,
        }
    }

    fn reset(&mut self) {
        let unvisited = self.unvisited();
        self.numbers.fill(unvisited);
        self.next = 1;
    }

    fn visit(&mut self, index: usize) {
        self.numbers[index] = self.next;
        self.next += 1;
    }

    fn is_visited(&self, index: usize) -> bool {
        self.numbers[index] != self.unvisited()
    }

    /// The sentinel number of a vertex that has not been reached: `n + 1`.
    pub fn unvisited(&self) -> usize {
        self.graph.len() + 1
    }

    /// Discovery number of `v` (1-based), or `n + 1` if `v` has not been
    /// visited or is not a vertex of the graph.
    pub fn get(&self, v: Vertex) -> usize {
        self.graph
            .index_of(v)
            .map_or_else(|| self.unvisited(), |i| self.numbers[i])
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }
}

struct Frame {
    index: usize,
    parent: usize,
    cursor: usize,
}

/// Depth-first traversal executor over one graph.
///
/// # Example
/// ```
/// use unitgraph::dfs::{Dfs, DfsVisitor, Discovery};
/// use unitgraph::error::Result;
/// use unitgraph::graph::{Graph, Vertex};
///
/// #[derive(Default)]
/// struct Roots(Vec<Vertex>);
///
/// impl DfsVisitor for Roots {
///     fn root(&mut self, _dfs: &Discovery<'_>, v: Vertex) -> Result<()> {
///         self.0.push(v);
///         Ok(())
///     }
/// }
///
/// // 1 → 2, 3 isolated
/// let g = Graph::new(vec![1, 2, 3], vec![0, 1, 1, 1], vec![2]).unwrap();
/// let mut roots = Roots::default();
/// let mut dfs = Dfs::new(&g);
/// dfs.run(&mut roots).unwrap();
/// assert_eq!(roots.0, vec![1, 3]);
/// assert_eq!(dfs.get(2), 2);
/// ```
pub struct Dfs<'g> {
    discovery: Discovery<'g>,
}

impl<'g> Dfs<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self {
            discovery: Discovery::new(graph),
        }
    }

    /// Traverses the whole graph, firing `visitor`'s hooks.
    ///
    /// Discovery numbers from a previous run are discarded first.
    pub fn run<V: DfsVisitor>(&mut self, visitor: &mut V) -> Result<()> {
        let graph = self.discovery.graph;
        let names = graph.vertices();
        self.discovery.reset();
        visitor.init(&self.discovery)?;

        let mut frames: Vec<Frame> = Vec::new();
        for start in 0..graph.len() {
            if self.discovery.is_visited(start) {
                continue;
            }
            self.discovery.visit(start);
            visitor.root(&self.discovery, names[start])?;
            frames.push(Frame {
                index: start,
                parent: start,
                cursor: 0,
            });

            while let Some(frame) = frames.last_mut() {
                let successors = graph.successors_at(frame.index);
                if frame.cursor < successors.len() {
                    let v = names[frame.index];
                    let from = frame.index;
                    let w = successors[frame.cursor];
                    frame.cursor += 1;

                    let wi = graph.index_of(w).ok_or(GraphError::UnknownVertex(w))?;
                    if self.discovery.is_visited(wi) {
                        visitor.traverse_non_tree_edge(&self.discovery, v, w)?;
                    } else {
                        self.discovery.visit(wi);
                        visitor.traverse_tree_edge(&self.discovery, v, w)?;
                        frames.push(Frame {
                            index: wi,
                            parent: from,
                            cursor: 0,
                        });
                    }
                } else {
                    let Some(done) = frames.pop() else { break };
                    visitor.backtrack(&self.discovery, names[done.parent], names[done.index])?;
                }
            }
        }
        Ok(())
    }

    /// Discovery number of `v` from the last run (`n + 1` if unvisited).
    pub fn get(&self, v: Vertex) -> usize {
        self.discovery.get(v)
    }

    pub fn discovery(&self) -> &Discovery<'g> {
        &self.discovery
    }
}

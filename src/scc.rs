//! Strongly connected components, path-based.
//!
//! A single [`Dfs`] pass with two stacks: candidate representatives and
//! vertices not yet assigned to a component. A non-tree edge into a vertex
//! that is still unassigned merges every candidate discovered after it;
//! when the traversal backtracks out of the candidate on top, that
//! candidate is confirmed and everything above it on the unassigned stack
//! forms its component.
//!
//! Reference: Gabow, "Path-based depth-first search for strong and
//! biconnected components," IPL 2000.

use std::collections::HashMap;

use log::debug;

use crate::dfs::{Dfs, DfsVisitor, Discovery};
use crate::error::{GraphError, Result};
use crate::graph::{Graph, Vertex};
use crate::stack::Stack;

struct PathBased<'g> {
    graph: &'g Graph,
    representatives: Stack<Vertex>,
    unassigned: Stack<Vertex>,
    /// Representative of each vertex's component, by internal index.
    component: Vec<Option<Vertex>>,
}

impl<'g> PathBased<'g> {
    fn new(graph: &'g Graph) -> Self {
        Self {
            graph,
            representatives: Stack::with_capacity(graph.len()),
            unassigned: Stack::with_capacity(graph.len()),
            component: vec![None; graph.len()],
        }
    }

    fn discover(&mut self, v: Vertex) {
        self.representatives.push(v);
        self.unassigned.push(v);
    }
}

impl DfsVisitor for PathBased<'_> {
    fn root(&mut self, _dfs: &Discovery<'_>, v: Vertex) -> Result<()> {
        self.discover(v);
        Ok(())
    }

    fn traverse_tree_edge(&mut self, _dfs: &Discovery<'_>, _v: Vertex, w: Vertex) -> Result<()> {
        self.discover(w);
        Ok(())
    }

    fn traverse_non_tree_edge(&mut self, dfs: &Discovery<'_>, _v: Vertex, w: Vertex) -> Result<()> {
        if self.unassigned.contains(&w) {
            let bound = dfs.get(w);
            while dfs.get(*self.representatives.top()?) > bound {
                self.representatives.pop()?;
            }
        }
        Ok(())
    }

    fn backtrack(&mut self, _dfs: &Discovery<'_>, _u: Vertex, v: Vertex) -> Result<()> {
        if *self.representatives.top()? != v {
            return Ok(());
        }
        self.representatives.pop()?;
        loop {
            let x = self.unassigned.pop()?;
            let i = self.graph.index_of(x).ok_or(GraphError::UnknownVertex(x))?;
            self.component[i] = Some(v);
            if x == v {
                break;
            }
        }
        Ok(())
    }
}

/// Strongly connected component decomposition of one graph.
///
/// # Example
/// ```
/// use unitgraph::graph::Graph;
/// use unitgraph::scc::SccFinder;
///
/// // 1 ⇄ 2, 3 alone
/// let g = Graph::new(vec![1, 2, 3], vec![0, 1, 2, 2], vec![2, 1]).unwrap();
/// let sccs = SccFinder::new(&g).run().unwrap();
/// assert_eq!(sccs.len(), 1);
/// assert_eq!(sccs[0].vertices(), &[1, 2]);
/// ```
pub struct SccFinder<'g> {
    graph: &'g Graph,
}

impl<'g> SccFinder<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self { graph }
    }

    /// Every component, singletons included.
    ///
    /// Components are ordered by the stored position of their first
    /// vertex; members keep the graph's vertex order.
    pub fn components(&self) -> Result<Vec<Vec<Vertex>>> {
        let mut visitor = PathBased::new(self.graph);
        Dfs::new(self.graph).run(&mut visitor)?;

        let mut group_of: HashMap<Vertex, usize> = HashMap::new();
        let mut groups: Vec<Vec<Vertex>> = Vec::new();
        for (i, &v) in self.graph.vertices().iter().enumerate() {
            let rep = visitor.component[i].ok_or(GraphError::UnknownVertex(v))?;
            let g = *group_of.entry(rep).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[g].push(v);
        }
        Ok(groups)
    }

    /// Non-trivial components (more than one vertex) as induced subgraphs.
    ///
    /// A single vertex is never returned, even with a self-loop: it cannot
    /// take part in a multi-vertex circuit.
    pub fn run(&self) -> Result<Vec<Graph>> {
        let components = self.components()?;
        let total = components.len();
        let nontrivial = components
            .into_iter()
            .filter(|members| members.len() > 1)
            .map(|members| self.graph.induced_subgraph(&members))
            .collect::<Result<Vec<_>>>()?;
        debug!(
            "scc: {} vertices, {} components, {} non-trivial",
            self.graph.len(),
            total,
            nontrivial.len()
        );
        Ok(nontrivial)
    }
}

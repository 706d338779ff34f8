//! Elementary circuit enumeration (Johnson's algorithm).
//!
//! Reference: Donald B. Johnson, "Finding All the Elementary Circuits of a
//! Directed Graph," SIAM J. Computing 4(1), 1975.
//!
//! The search restricts itself to vertices named `>= s` for a rising lower
//! bound `s`. For each `s` it takes the non-trivial strongly connected
//! component holding the least vertex of that restricted graph and
//! enumerates every circuit through that least vertex inside the
//! component. Blocking keeps each vertex from being re-entered until a
//! circuit has been found through it, which bounds the total work by
//! O((V + E)(C + 1)) for C circuits.

use std::fmt;

use log::{debug, trace};
use serde::Serialize;

use crate::error::{GraphError, Result};
use crate::graph::{Graph, Vertex};
use crate::scc::SccFinder;
use crate::stack::Stack;

/// One elementary circuit `v1 → v2 → … → vk → v1`. The closing edge back
/// to the first vertex is implied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Circle {
    vertices: Vec<Vertex>,
}

impl Circle {
    pub fn new(vertices: Vec<Vertex>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn contains(&self, v: Vertex) -> bool {
        self.vertices.contains(&v)
    }

    /// The edges of the circuit, closing edge last.
    pub fn edges(&self) -> impl Iterator<Item = (Vertex, Vertex)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }
}

impl fmt::Display for Circle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for v in &self.vertices {
            write!(f, "{} -> ", v)?;
        }
        match self.vertices.first() {
            Some(first) => write!(f, "{}", first),
            None => Ok(()),
        }
    }
}

/// Enumerates every elementary circuit of a graph, once.
///
/// The result is computed on the first [`run`](CircleSearch::run) and
/// cached; later calls return the same list.
///
/// # Example
/// ```
/// use unitgraph::circle::CircleSearch;
/// use unitgraph::graph::Graph;
///
/// // kg(1) → g(2) → kg(1), g(2) → mg(3)
/// let g = Graph::new(vec![1, 2, 3], vec![0, 1, 3, 3], vec![2, 1, 3]).unwrap();
/// let mut search = CircleSearch::new(&g);
/// let circles = search.run().unwrap();
/// assert_eq!(circles.len(), 1);
/// assert_eq!(circles[0].vertices(), &[1, 2]);
/// ```
pub struct CircleSearch<'g> {
    graph: &'g Graph,
    circles: Option<Vec<Circle>>,
}

impl<'g> CircleSearch<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self {
            graph,
            circles: None,
        }
    }

    /// All elementary circuits, ordered by ascending least vertex and then
    /// by stored edge order within one start vertex.
    pub fn run(&mut self) -> Result<&[Circle]> {
        if self.circles.is_none() {
            self.circles = Some(self.search()?);
        }
        Ok(self.circles.as_deref().unwrap_or_default())
    }

    /// The cached result, if [`run`](CircleSearch::run) has completed.
    pub fn circles(&self) -> Option<&[Circle]> {
        self.circles.as_deref()
    }

    fn search(&self) -> Result<Vec<Circle>> {
        let mut circles = Vec::new();
        let (Some(mut s), Some(last)) = (self.graph.min_vertex(), self.graph.max_vertex()) else {
            return Ok(circles);
        };

        while s < last {
            let subset: Vec<Vertex> = self
                .graph
                .vertices()
                .iter()
                .copied()
                .filter(|&v| v >= s)
                .collect();
            let remaining = self.graph.induced_subgraph(&subset)?;
            let components = SccFinder::new(&remaining).run()?;

            let Some((least, component)) = components
                .into_iter()
                .filter_map(|c| c.min_vertex().map(|m| (m, c)))
                .min_by_key(|(m, _)| *m)
            else {
                break;
            };

            s = least;
            let before = circles.len();
            Johnson::new(&component, s)?.circuits(&mut circles)?;
            debug!(
                "circle search: start {} in component of {} vertices, {} circuits",
                s,
                component.len(),
                circles.len() - before
            );
            s += 1;
        }

        Ok(circles)
    }
}

/// Convenience wrapper: every elementary circuit of `graph`.
pub fn elementary_circuits(graph: &Graph) -> Result<Vec<Circle>> {
    let mut search = CircleSearch::new(graph);
    Ok(search.run()?.to_vec())
}

struct CircuitFrame {
    index: usize,
    cursor: usize,
    found: bool,
}

/// Blocking state for the circuits through one start vertex of one
/// component.
struct Johnson<'a> {
    component: &'a Graph,
    root: Vertex,
    blocked: Vec<bool>,
    /// `dependents[u]` holds vertices to unblock once `u` is unblocked.
    dependents: Vec<Vec<usize>>,
    path: Stack<Vertex>,
}

impl<'a> Johnson<'a> {
    fn new(component: &'a Graph, root: Vertex) -> Result<Self> {
        if !component.contains(root) {
            return Err(GraphError::UnknownVertex(root));
        }
        Ok(Self {
            component,
            root,
            blocked: vec![false; component.len()],
            dependents: vec![Vec::new(); component.len()],
            path: Stack::with_capacity(component.len()),
        })
    }

    fn index(&self, v: Vertex) -> Result<usize> {
        self.component
            .index_of(v)
            .ok_or(GraphError::UnknownVertex(v))
    }

    fn enter(&mut self, v: Vertex, index: usize) {
        self.path.push(v);
        self.blocked[index] = true;
    }

    /// Appends every circuit through `root` to `out`.
    fn circuits(&mut self, out: &mut Vec<Circle>) -> Result<bool> {
        let component = self.component;
        let root_index = self.index(self.root)?;
        self.enter(self.root, root_index);
        let mut frames = vec![CircuitFrame {
            index: root_index,
            cursor: 0,
            found: false,
        }];
        let mut found_any = false;

        while let Some(frame) = frames.last_mut() {
            let successors = component.successors_at(frame.index);
            if frame.cursor < successors.len() {
                let u = successors[frame.cursor];
                frame.cursor += 1;
                if u == self.root {
                    let circle = Circle::new(self.path.content().to_vec());
                    trace!("circuit {}", circle);
                    out.push(circle);
                    frame.found = true;
                } else {
                    let ui = self.index(u)?;
                    if !self.blocked[ui] {
                        self.enter(u, ui);
                        frames.push(CircuitFrame {
                            index: ui,
                            cursor: 0,
                            found: false,
                        });
                    }
                }
                continue;
            }

            let Some(done) = frames.pop() else { break };
            if done.found {
                self.unblock(done.index);
            } else {
                for &u in component.successors_at(done.index) {
                    let ui = self.index(u)?;
                    if !self.dependents[ui].contains(&done.index) {
                        self.dependents[ui].push(done.index);
                    }
                }
            }
            self.path.pop()?;
            match frames.last_mut() {
                Some(parent) => parent.found |= done.found,
                None => found_any = done.found,
            }
        }

        Ok(found_any)
    }

    fn unblock(&mut self, index: usize) {
        let mut pending = vec![index];
        while let Some(i) = pending.pop() {
            self.blocked[i] = false;
            for w in std::mem::take(&mut self.dependents[i]) {
                if self.blocked[w] {
                    pending.push(w);
                }
            }
        }
    }
}

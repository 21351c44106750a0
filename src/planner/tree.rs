use crate::state::Configuration;
use num_traits::Float;

/// A vertex in a search tree.
#[derive(Clone)]
pub struct Vertex<F: Float, const N: usize> {
    /// The configuration, immutable once the vertex is created.
    config: Configuration<F, N>,
    /// The index of the parent vertex (None if the vertex is the root).
    parent: Option<usize>,
    /// How many connect attempts starting from this vertex collided on
    /// their first step.
    fails: u32,
    /// How many connect attempts starting from this vertex advanced at
    /// least one step.
    successes: u32,
    /// Whether the vertex has been retired from nearest neighbor selection.
    exhausted: bool,
}

impl<F: Float, const N: usize> Vertex<F, N> {
    pub fn config(&self) -> &Configuration<F, N> {
        &self.config
    }

    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    pub fn fails(&self) -> u32 {
        self.fails
    }

    pub fn successes(&self) -> u32 {
        self.successes
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

/// A rooted arborescence of configurations stored as an arena: a growable
/// vertex list plus a parallel (parent, child) edge list, indexed by integer
/// handle. Vertices and edges are appended only; nothing is removed or
/// mutated between clears except the per-vertex counters.
pub struct Tree<F: Float, const N: usize> {
    vertices: Vec<Vertex<F, N>>,
    edges: Vec<(usize, usize)>,
    /// The furthest projection onto the start-to-goal axis reached by any
    /// vertex of this tree, measured from the tree's own anchor.
    frontier: F,
}

impl<F: Float, const N: usize> Tree<F, N> {
    /// Constructs an empty tree.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            edges: Vec::new(),
            frontier: F::zero(),
        }
    }

    /// Appends a vertex with zeroed statistics and returns its index.
    /// The first vertex added after a clear is the root.
    pub fn add_vertex(&mut self, config: Configuration<F, N>) -> usize {
        let index = self.vertices.len();
        self.vertices.push(Vertex {
            config,
            parent: None,
            fails: 0,
            successes: 0,
            exhausted: false,
        });
        index
    }

    /// Records the directed parent-to-child relation.
    ///
    /// Every non-root vertex has exactly one incoming edge, so the child
    /// must not already have a parent.
    pub fn add_edge(&mut self, parent: usize, child: usize) {
        debug_assert!(parent < self.vertices.len() && child < self.vertices.len());
        debug_assert!(
            self.vertices[child].parent.is_none() && child != 0,
            "a non-root vertex has exactly one incoming edge"
        );
        self.vertices[child].parent = Some(parent);
        self.edges.push((parent, child));
    }

    /// Removes all vertices and edges and resets the frontier estimate.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
        self.frontier = F::zero();
    }

    pub fn vertex(&self, index: usize) -> &Vertex<F, N> {
        &self.vertices[index]
    }

    pub fn vertices(&self) -> &[Vertex<F, N>] {
        &self.vertices
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Bumps the failure counter of a vertex and returns the new count.
    pub fn record_failure(&mut self, index: usize) -> u32 {
        self.vertices[index].fails += 1;
        self.vertices[index].fails
    }

    /// Bumps the success counter of a vertex.
    pub fn record_success(&mut self, index: usize) {
        self.vertices[index].successes += 1;
    }

    /// Retires a vertex from nearest neighbor selection. The vertex stays in
    /// the tree; it merely stops being selectable.
    pub fn mark_exhausted(&mut self, index: usize) {
        self.vertices[index].exhausted = true;
    }

    pub fn frontier(&self) -> F {
        self.frontier
    }

    /// Seeds the frontier estimate at the start of a plan attempt.
    pub fn seed_frontier(&mut self, value: F) {
        self.frontier = value;
    }

    /// Raises the frontier estimate to `projection` if it is the furthest
    /// observed so far.
    pub fn observe_projection(&mut self, projection: F) {
        if projection > self.frontier {
            self.frontier = projection;
        }
    }

    /// The vertex indices from `from` back to the root, in walk order.
    pub fn walk_to_root(&self, from: usize) -> Vec<usize> {
        let mut walk = vec![from];
        let mut current = from;
        while let Some(parent) = self.vertices[current].parent {
            walk.push(parent);
            current = parent;
        }
        walk
    }
}

impl<F: Float, const N: usize> Default for Tree<F, N> {
    fn default() -> Self {
        Self::new()
    }
}

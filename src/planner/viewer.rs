use crate::state::Configuration;
use num_traits::Float;

/// An observer notified on every vertex and edge insertion, typically to
/// drive a visualization. Purely observational; nothing it does feeds back
/// into planning.
pub trait Viewer<F: Float, const N: usize> {
    /// Called after a configuration is added as a tree vertex.
    fn configuration_vertex(&mut self, q: &Configuration<F, N>);

    /// Called after a parent-to-child edge is recorded.
    fn configuration_edge(&mut self, parent: &Configuration<F, N>, child: &Configuration<F, N>);
}

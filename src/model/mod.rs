pub mod analytic;
pub mod obstacles;

pub use analytic::AnalyticModel;
pub use obstacles::{AnalyticObstacle, StaticRectangularObstacle, StaticSphericalObstacle};

use crate::state::Configuration;
use num_traits::Float;

/// The collision/kinematics collaborator consumed by the planner.
///
/// The model is stateful: collision queries reflect only the most recently
/// committed configuration, so a configuration must be committed before
/// `is_colliding` is meaningful for it. One current configuration at a time;
/// instances are not meant for concurrent queries.
pub trait Model<F: Float, const N: usize> {
    /// The dimension of the configuration space.
    fn dof(&self) -> usize {
        N
    }

    /// The lower joint bounds.
    fn minimum(&self) -> &Configuration<F, N>;

    /// The upper joint bounds.
    fn maximum(&self) -> &Configuration<F, N>;

    /// The true distance between two configurations.
    fn distance(&self, a: &Configuration<F, N>, b: &Configuration<F, N>) -> F {
        a.euclidean_distance(b)
    }

    /// A transformed distance that is monotonic in the true distance and
    /// cheaper to compute. The default is the squared true distance.
    fn transformed_distance(&self, a: &Configuration<F, N>, b: &Configuration<F, N>) -> F {
        let d = self.distance(a, b);
        d * d
    }

    /// Maps a transformed distance back to the true distance. Must be the
    /// exact inverse of `transformed_distance`.
    fn inverse_of_transformed_distance(&self, d: F) -> F {
        d.sqrt()
    }

    /// The configuration a fraction `t` of the way from `a` to `b` under the
    /// model's metric.
    fn interpolate(&self, a: &Configuration<F, N>, b: &Configuration<F, N>, t: F) -> Configuration<F, N> {
        a + &((b - a) * t)
    }

    /// Projects a configuration into the joint bounds in place.
    fn clip(&self, q: &mut Configuration<F, N>) {
        q.clamp_to(self.minimum(), self.maximum());
    }

    /// Sets the current configuration and refreshes any derived frames.
    /// Must be called before `is_colliding` reflects `q`.
    fn commit(&mut self, q: &Configuration<F, N>);

    /// The collision state of the last committed configuration.
    fn is_colliding(&self) -> bool;
}

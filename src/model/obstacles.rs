use crate::state::Configuration;
use num_traits::Float;
use serde::{Deserialize, Serialize};

/// An obstacle with an analytic occupancy test in configuration space.
pub trait AnalyticObstacle<F: Float, const N: usize> {
    /// Checks if a configuration lies inside the obstacle.
    fn contains(&self, q: &Configuration<F, N>) -> bool;
}

/// An axis-aligned hyper-rectangular obstacle.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StaticRectangularObstacle<F: Float, const N: usize> {
    min_corner: Configuration<F, N>,
    max_corner: Configuration<F, N>,
}

impl<F: Float, const N: usize> StaticRectangularObstacle<F, N> {
    /// Creates a new rectangular obstacle from its corners.
    ///
    /// Parameters:
    /// - `min_corner`: The corner with the smallest coordinates.
    /// - `max_corner`: The corner with the largest coordinates.
    pub fn new(min_corner: Configuration<F, N>, max_corner: Configuration<F, N>) -> Self {
        Self {
            min_corner,
            max_corner,
        }
    }

    /// Creates a hyper-cube obstacle from its center and half-width.
    pub fn from_center(center: Configuration<F, N>, half_width: F) -> Self {
        let mut min_corner = center;
        let mut max_corner = center;
        for i in 0..N {
            min_corner[i] = center[i] - half_width;
            max_corner[i] = center[i] + half_width;
        }
        Self {
            min_corner,
            max_corner,
        }
    }

    pub fn min_corner(&self) -> &Configuration<F, N> {
        &self.min_corner
    }

    pub fn max_corner(&self) -> &Configuration<F, N> {
        &self.max_corner
    }
}

impl<F: Float, const N: usize> AnalyticObstacle<F, N> for StaticRectangularObstacle<F, N> {
    fn contains(&self, q: &Configuration<F, N>) -> bool {
        // for every dimension, q[i] ∈ [min[i], max[i]]
        (0..N).all(|i| q[i] >= self.min_corner[i] && q[i] <= self.max_corner[i])
    }
}

/// A hyper-spherical obstacle.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StaticSphericalObstacle<F: Float, const N: usize> {
    center: Configuration<F, N>,
    radius: F,
}

impl<F: Float, const N: usize> StaticSphericalObstacle<F, N> {
    /// Creates a new spherical obstacle with the given center and radius.
    pub fn new(center: Configuration<F, N>, radius: F) -> Self {
        Self { center, radius }
    }

    pub fn center(&self) -> &Configuration<F, N> {
        &self.center
    }

    pub fn radius(&self) -> F {
        self.radius
    }
}

impl<F: Float, const N: usize> AnalyticObstacle<F, N> for StaticSphericalObstacle<F, N> {
    fn contains(&self, q: &Configuration<F, N>) -> bool {
        q.euclidean_distance_squared(&self.center) <= self.radius * self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_contains_boundary_and_interior() {
        let obstacle = StaticRectangularObstacle::from_center(Configuration::new([5.0f64, 5.0]), 1.0);
        assert!(obstacle.contains(&Configuration::new([5.0, 5.0])));
        assert!(obstacle.contains(&Configuration::new([4.0, 6.0])));
        assert!(!obstacle.contains(&Configuration::new([3.9, 5.0])));
        assert!(!obstacle.contains(&Configuration::new([5.0, 6.1])));
    }

    #[test]
    fn sphere_contains() {
        let obstacle = StaticSphericalObstacle::new(Configuration::new([0.0f64, 0.0]), 2.0);
        assert!(obstacle.contains(&Configuration::new([1.0, 1.0])));
        assert!(obstacle.contains(&Configuration::new([2.0, 0.0])));
        assert!(!obstacle.contains(&Configuration::new([2.0, 1.0])));
    }
}

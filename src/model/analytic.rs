use crate::error::PlannerError;
use crate::model::{AnalyticObstacle, Model};
use crate::state::Configuration;
use num_traits::Float;

/// A model over a bounded configuration space with analytic obstacles.
///
/// Collision checking treats the robot as a point in configuration space,
/// which is what analytic obstacle scenarios describe. The model keeps the
/// usual query statistics so callers can report how many collision checks a
/// plan attempt spent and how many of those were free.
pub struct AnalyticModel<F: Float, const N: usize> {
    minimum: Configuration<F, N>,
    maximum: Configuration<F, N>,
    obstacles: Vec<Box<dyn AnalyticObstacle<F, N>>>,
    /// Optional per-joint weights applied inside the metric family.
    weights: Option<Configuration<F, N>>,
    current: Configuration<F, N>,
    colliding: bool,
    total_queries: usize,
    free_queries: usize,
}

impl<F: Float, const N: usize> AnalyticModel<F, N> {
    /// Creates a new model.
    ///
    /// Parameters:
    /// - `minimum`: The lower joint bounds.
    /// - `maximum`: The upper joint bounds.
    /// - `obstacles`: The obstacles in configuration space.
    pub fn new(
        minimum: Configuration<F, N>,
        maximum: Configuration<F, N>,
        obstacles: Vec<Box<dyn AnalyticObstacle<F, N>>>,
    ) -> Result<Self, PlannerError> {
        for i in 0..N {
            if minimum[i] > maximum[i] {
                return Err(PlannerError::InvertedBounds(i));
            }
        }
        Ok(Self {
            minimum,
            maximum,
            obstacles,
            weights: None,
            current: minimum,
            colliding: false,
            total_queries: 0,
            free_queries: 0,
        })
    }

    /// Applies per-joint weights to the distance metric. A joint with a
    /// larger weight contributes more to the distance, which biases nearest
    /// neighbor selection and step sizing towards sparing that joint.
    pub fn with_weights(mut self, weights: Configuration<F, N>) -> Self {
        self.weights = Some(weights);
        self
    }

    /// The number of collision queries answered since construction.
    pub fn total_queries(&self) -> usize {
        self.total_queries
    }

    /// The number of collision queries that reported a free configuration.
    pub fn free_queries(&self) -> usize {
        self.free_queries
    }
}

impl<F: Float, const N: usize> Model<F, N> for AnalyticModel<F, N> {
    fn minimum(&self) -> &Configuration<F, N> {
        &self.minimum
    }

    fn maximum(&self) -> &Configuration<F, N> {
        &self.maximum
    }

    fn distance(&self, a: &Configuration<F, N>, b: &Configuration<F, N>) -> F {
        self.transformed_distance(a, b).sqrt()
    }

    fn transformed_distance(&self, a: &Configuration<F, N>, b: &Configuration<F, N>) -> F {
        let mut sum = F::zero();
        for i in 0..N {
            let diff = a[i] - b[i];
            let weight = match &self.weights {
                Some(weights) => weights[i],
                None => F::one(),
            };
            sum = sum + weight * diff * diff;
        }
        sum
    }

    fn commit(&mut self, q: &Configuration<F, N>) {
        self.current = *q;
        self.colliding = self
            .obstacles
            .iter()
            .any(|obstacle| obstacle.contains(&self.current));
        self.total_queries += 1;
        if !self.colliding {
            self.free_queries += 1;
        }
    }

    fn is_colliding(&self) -> bool {
        self.colliding
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StaticRectangularObstacle;
    use approx::assert_relative_eq;

    fn square_world() -> AnalyticModel<f64, 2> {
        let obstacle =
            StaticRectangularObstacle::from_center(Configuration::new([5.0, 5.0]), 1.0);
        AnalyticModel::new(
            Configuration::new([0.0, 0.0]),
            Configuration::new([10.0, 10.0]),
            vec![Box::new(obstacle)],
        )
        .unwrap()
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let result: Result<AnalyticModel<f64, 2>, _> = AnalyticModel::new(
            Configuration::new([0.0, 1.0]),
            Configuration::new([1.0, 0.0]),
            Vec::new(),
        );
        assert_eq!(result.err(), Some(PlannerError::InvertedBounds(1)));
    }

    #[test]
    fn collision_state_follows_last_commit() {
        let mut model = square_world();
        model.commit(&Configuration::new([5.0, 5.0]));
        assert!(model.is_colliding());
        model.commit(&Configuration::new([1.0, 1.0]));
        assert!(!model.is_colliding());
        assert_eq!(model.total_queries(), 2);
        assert_eq!(model.free_queries(), 1);
    }

    #[test]
    fn transformed_distance_is_monotonic_with_exact_inverse() {
        let model = square_world();
        let a = Configuration::new([1.0, 1.0]);
        let b = Configuration::new([4.0, 5.0]);
        let transformed = model.transformed_distance(&a, &b);
        assert_relative_eq!(model.inverse_of_transformed_distance(transformed), 5.0);
        assert_relative_eq!(model.distance(&a, &b), 5.0);
    }

    #[test]
    fn weighted_metric_keeps_inverse_exact() {
        let model = square_world().with_weights(Configuration::new([4.0, 1.0]));
        let a = Configuration::new([0.0, 0.0]);
        let b = Configuration::new([1.0, 2.0]);
        let transformed = model.transformed_distance(&a, &b);
        assert_relative_eq!(transformed, 8.0);
        assert_relative_eq!(
            model.distance(&a, &b),
            model.inverse_of_transformed_distance(transformed)
        );
    }

    #[test]
    fn interpolate_and_clip() {
        let model = square_world();
        let a = Configuration::new([0.0, 0.0]);
        let b = Configuration::new([10.0, 10.0]);
        let mid = model.interpolate(&a, &b, 0.5);
        assert_relative_eq!(mid[0], 5.0);
        let mut outside = Configuration::new([-1.0, 12.0]);
        model.clip(&mut outside);
        assert_eq!(outside, Configuration::new([0.0, 10.0]));
    }
}

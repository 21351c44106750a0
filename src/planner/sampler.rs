use crate::error::PlannerError;
use crate::model::Model;
use crate::state::Configuration;
use num_traits::Float;
use rand::distributions::uniform::SampleUniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};

/// The sampling strategy used to produce candidate configurations.
/// Exactly one strategy is active per solve attempt.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum SamplingStrategy<F> {
    /// Independent uniform draw per dimension within the joint bounds.
    Uniform,
    /// With probability `bias`, short-circuits to the opposing tree's
    /// target; otherwise falls through to the uniform draw.
    GoalBiased { bias: F },
    /// Rejection sampling that accepts an unperturbed uniform candidate only
    /// when its Gaussian perturbation is found colliding, concentrating
    /// samples near obstacle boundaries.
    Gaussian,
    /// Rejection sampling that accepts a collision-free uniform candidate
    /// only when its negative sigma offset is free and its positive sigma
    /// offset collides, so the candidate straddles a free/occupied boundary.
    Bridge,
    /// A uniform offset along the start-to-goal axis with Gaussian
    /// perturbation along the remaining basis directions.
    DirectionBiased,
    /// A Gaussian offset centered at a randomly chosen tree's frontier
    /// estimate along the start-to-goal axis, with Gaussian perturbation
    /// along the remaining basis directions.
    FrontierBiased,
}

impl<F> SamplingStrategy<F> {
    /// Whether the strategy samples relative to the start-to-goal axis and
    /// therefore needs a direction frame.
    pub fn requires_direction_frame(&self) -> bool {
        matches!(
            self,
            SamplingStrategy::DirectionBiased | SamplingStrategy::FrontierBiased
        )
    }
}

/// The start-to-goal axis together with an orthonormal basis whose first
/// column is the normalized start-to-goal direction. The remaining columns
/// are canonical placeholders orthonormalized against it, so their signs and
/// order depend on the orthonormalization convention.
pub struct DirectionFrame<F: Float, const N: usize> {
    start: Configuration<F, N>,
    goal: Configuration<F, N>,
    direction: Configuration<F, N>,
    length: F,
    columns: [Configuration<F, N>; N],
}

impl<F: Float, const N: usize> DirectionFrame<F, N> {
    /// Builds the frame for a start/goal pair.
    ///
    /// Fails with `PlannerError::DegenerateDirection` when start and goal
    /// coincide; sampling against a zero-length axis would silently corrupt
    /// the search.
    pub fn new(
        start: Configuration<F, N>,
        goal: Configuration<F, N>,
    ) -> Result<Self, PlannerError> {
        let difference = &goal - &start;
        let length = difference.norm();
        if !(length > F::zero()) {
            return Err(PlannerError::DegenerateDirection);
        }
        let direction = &difference / length;

        // Gram-Schmidt over canonical placeholder vectors. A placeholder
        // nearly parallel to the columns collected so far leaves a residual
        // too short to normalize and is skipped; at most one of the N
        // canonical vectors can be rejected this way.
        let mut columns = [Configuration::zeros(); N];
        columns[0] = direction;
        let mut filled = 1;
        let tolerance = F::from(1e-6).unwrap();
        for canonical in 0..N {
            if filled == N {
                break;
            }
            let mut residual = Configuration::zeros();
            residual[canonical] = F::one();
            for j in 0..filled {
                let projection = residual.dot(&columns[j]);
                residual = &residual - &(&columns[j] * projection);
            }
            let norm = residual.norm();
            if norm > tolerance {
                columns[filled] = &residual / norm;
                filled += 1;
            }
        }
        debug_assert_eq!(filled, N, "orthonormal basis construction failed");

        Ok(Self {
            start,
            goal,
            direction,
            length,
            columns,
        })
    }

    /// The distance between start and goal.
    pub fn length(&self) -> F {
        self.length
    }

    /// The orthonormal basis columns; the first is the normalized
    /// start-to-goal direction.
    pub fn columns(&self) -> &[Configuration<F, N>; N] {
        &self.columns
    }

    /// The projection of `q` onto the axis, measured from the start.
    pub fn projection_from_start(&self, q: &Configuration<F, N>) -> F {
        (q - &self.start).dot(&self.direction)
    }

    /// The projection of `q` onto the axis, measured from the goal back
    /// towards the start.
    pub fn projection_from_goal(&self, q: &Configuration<F, N>) -> F {
        (&self.goal - q).dot(&self.direction)
    }

    /// The absolute configuration at axis offset `offset`, measured from the
    /// anchor of the given tree: from the start for tree 0 and from the goal
    /// for tree 1.
    fn position_on_axis(&self, tree_index: usize, offset: F) -> Configuration<F, N> {
        if tree_index == 0 {
            &self.start + &(&self.direction * offset)
        } else {
            &self.goal - &(&self.direction * offset)
        }
    }
}

/// Per-draw inputs supplied by the planner.
pub struct SampleContext<'a, F: Float, const N: usize> {
    /// The opposing tree's target, used by the goal-biased short-circuit.
    pub bias_target: &'a Configuration<F, N>,
    /// The direction frame, present when a direction-biased strategy runs.
    pub frame: Option<&'a DirectionFrame<F, N>>,
    /// Each tree's current frontier estimate along the axis.
    pub frontiers: [F; 2],
}

/// Produces candidate configurations for tree growth.
///
/// Owns its random engine; seeding is explicit so runs are reproducible.
/// Not meant to be shared across concurrently running planners.
pub struct Sampler<F: Float, const N: usize> {
    strategy: SamplingStrategy<F>,
    /// Per-dimension standard deviation of the Gaussian perturbations.
    sigma: Configuration<F, N>,
    rng: StdRng,
}

impl<F, const N: usize> Sampler<F, N>
where
    F: Float + SampleUniform,
    StandardNormal: Distribution<F>,
{
    /// Creates a sampler with the given strategy and per-dimension sigma.
    pub fn new(
        strategy: SamplingStrategy<F>,
        sigma: Configuration<F, N>,
    ) -> Result<Self, PlannerError> {
        if let SamplingStrategy::GoalBiased { bias } = strategy {
            if bias < F::zero() || bias > F::one() {
                return Err(PlannerError::InvalidGoalBias(
                    bias.to_f64().unwrap_or(f64::NAN),
                ));
            }
        }
        Ok(Self {
            strategy,
            sigma,
            rng: StdRng::from_entropy(),
        })
    }

    /// Creates a plain uniform sampler.
    pub fn uniform() -> Self {
        Self {
            strategy: SamplingStrategy::Uniform,
            sigma: Configuration::zeros(),
            rng: StdRng::from_entropy(),
        }
    }

    pub fn strategy(&self) -> &SamplingStrategy<F> {
        &self.strategy
    }

    /// Re-seeds the random engine deterministically.
    pub fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Draws one candidate configuration within the model bounds.
    ///
    /// The model is taken mutably because the Gaussian and bridge strategies
    /// commit probe configurations to query their collision state.
    pub fn draw<M: Model<F, N>>(
        &mut self,
        model: &mut M,
        context: &SampleContext<'_, F, N>,
    ) -> Configuration<F, N> {
        match self.strategy {
            SamplingStrategy::Uniform => self.draw_uniform(model),
            SamplingStrategy::GoalBiased { bias } => {
                if self.rand() < bias {
                    *context.bias_target
                } else {
                    self.draw_uniform(model)
                }
            }
            SamplingStrategy::Gaussian => self.draw_gaussian(model),
            SamplingStrategy::Bridge => self.draw_bridge(model),
            SamplingStrategy::DirectionBiased => {
                let frame = context
                    .frame
                    .expect("direction-biased sampling requires a direction frame");
                self.draw_direction_biased(model, frame)
            }
            SamplingStrategy::FrontierBiased => {
                let frame = context
                    .frame
                    .expect("frontier-biased sampling requires a direction frame");
                self.draw_frontier_biased(model, frame, context.frontiers)
            }
        }
    }

    fn draw_uniform<M: Model<F, N>>(&mut self, model: &M) -> Configuration<F, N> {
        let minimum = *model.minimum();
        let maximum = *model.maximum();
        let mut q = Configuration::zeros();
        for i in 0..N {
            q[i] = minimum[i] + self.rand() * (maximum[i] - minimum[i]);
        }
        q
    }

    /// Accepts the unperturbed candidate only when the perturbed probe
    /// collides. The returned point is the one that was *not* committed
    /// last, which biases sampling density towards obstacle boundaries
    /// without returning the obstacle-adjacent probe itself.
    fn draw_gaussian<M: Model<F, N>>(&mut self, model: &mut M) -> Configuration<F, N> {
        loop {
            let candidate = self.draw_uniform(model);
            let mut perturbed = candidate;
            for i in 0..N {
                perturbed[i] = candidate[i] + self.sigma[i] * self.gauss();
            }
            model.commit(&perturbed);
            if model.is_colliding() {
                return candidate;
            }
        }
    }

    fn draw_bridge<M: Model<F, N>>(&mut self, model: &mut M) -> Configuration<F, N> {
        loop {
            let candidate = self.draw_uniform(model);
            model.commit(&candidate);
            if model.is_colliding() {
                continue;
            }

            let mut offset = Configuration::zeros();
            for i in 0..N {
                offset[i] = self.sigma[i] * self.gauss();
            }

            let below = &candidate - &offset;
            model.commit(&below);
            if model.is_colliding() {
                continue;
            }

            let above = &candidate + &offset;
            model.commit(&above);
            if model.is_colliding() {
                return candidate;
            }
        }
    }

    fn draw_direction_biased<M: Model<F, N>>(
        &mut self,
        model: &M,
        frame: &DirectionFrame<F, N>,
    ) -> Configuration<F, N> {
        let offset = self.rand() * frame.length();
        let mut q = frame.position_on_axis(0, offset);
        for k in 1..N {
            let lateral = self.sigma[k] * self.gauss();
            q = &q + &(&frame.columns()[k] * lateral);
        }
        model.clip(&mut q);
        q
    }

    fn draw_frontier_biased<M: Model<F, N>>(
        &mut self,
        model: &M,
        frame: &DirectionFrame<F, N>,
        frontiers: [F; 2],
    ) -> Configuration<F, N> {
        let tree_index = usize::from(self.rand() < F::from(0.5).unwrap());
        let offset = (frontiers[tree_index] + self.sigma[0] * self.gauss()).max(F::zero());
        let mut q = frame.position_on_axis(tree_index, offset);
        for k in 1..N {
            let lateral = self.sigma[k] * self.gauss();
            q = &q + &(&frame.columns()[k] * lateral);
        }
        model.clip(&mut q);
        q
    }

    fn rand(&mut self) -> F {
        self.rng.gen_range(F::zero()..F::one())
    }

    fn gauss(&mut self) -> F {
        self.rng.sample(StandardNormal)
    }
}

use crate::error::PlannerError;
use crate::model::Model;
use crate::planner::neighbors::{nearest, Neighbor};
use crate::planner::sampler::{SampleContext, Sampler};
use crate::planner::tree::Tree;
use crate::planner::viewer::Viewer;
use crate::planner::DirectionFrame;
use crate::state::Configuration;
use num_traits::Float;
use rand::distributions::uniform::SampleUniform;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

/// Parameters of a plan attempt.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct RrtConnectConfig<F> {
    /// Maximum travel per step in configuration space.
    pub delta: F,
    /// Distance below which two configurations are deemed identical for the
    /// bidirectional merge test.
    pub epsilon: F,
    /// Wall-clock budget for a solve call.
    pub duration: Duration,
    /// When set, a vertex whose connect attempts have collided on their
    /// first step more than this many times is retired from nearest
    /// neighbor selection. When None, vertices are never retired.
    pub exhaustion_limit: Option<u32>,
    /// When true, every successful intermediate connect step becomes its
    /// own vertex and edge instead of only the furthest point reached,
    /// trading tree size for finer connectivity granularity.
    pub intermediate_vertices: bool,
}

impl<F: Float> Default for RrtConnectConfig<F> {
    fn default() -> Self {
        Self {
            delta: F::one(),
            epsilon: F::from(1e-3).unwrap(),
            duration: Duration::from_secs(30),
            exhaustion_limit: None,
            intermediate_vertices: false,
        }
    }
}

/// A bidirectional RRT-Connect planner.
///
/// Two trees grow towards each other, one rooted at the start and one at the
/// goal. Each iteration samples a configuration, connects the currently
/// extending tree towards it with delta-bounded collision-checked hops, then
/// connects the other tree towards whatever was reached; the attempt
/// succeeds when both trees reach configurations within epsilon of each
/// other. Roles swap after every half-iteration.
///
/// Single-threaded: a solve call blocks for up to the configured duration,
/// and the only interruption is the time check at the top of each outer
/// iteration.
pub struct RrtConnect<F: Float, const N: usize, M: Model<F, N>> {
    model: M,
    sampler: Sampler<F, N>,
    config: RrtConnectConfig<F>,
    start: Configuration<F, N>,
    goal: Configuration<F, N>,
    /// Tree 0 is rooted at the start, tree 1 at the goal. Roles alternate by
    /// index, never by moving the trees.
    trees: [Tree<F, N>; 2],
    /// The meeting vertices recorded on success, as (tree 0, tree 1) handles.
    junction: Option<[usize; 2]>,
    frame: Option<DirectionFrame<F, N>>,
    viewer: Option<Box<dyn Viewer<F, N>>>,
    name: String,
}

impl<F, const N: usize, M> RrtConnect<F, N, M>
where
    F: Float + SampleUniform,
    StandardNormal: Distribution<F>,
    M: Model<F, N>,
{
    /// Creates a planner for a validated problem.
    ///
    /// The start and goal are assumed to be within bounds and collision
    /// free; checking them is the caller's concern. Construction fails for
    /// non-positive delta, negative epsilon, or a direction-biased sampler
    /// with coinciding start and goal.
    pub fn new(
        model: M,
        sampler: Sampler<F, N>,
        start: Configuration<F, N>,
        goal: Configuration<F, N>,
        config: RrtConnectConfig<F>,
    ) -> Result<Self, PlannerError> {
        if !(config.delta > F::zero()) {
            return Err(PlannerError::InvalidDelta(
                config.delta.to_f64().unwrap_or(f64::NAN),
            ));
        }
        if config.epsilon < F::zero() {
            return Err(PlannerError::InvalidEpsilon(
                config.epsilon.to_f64().unwrap_or(f64::NAN),
            ));
        }

        let frame = if sampler.strategy().requires_direction_frame() {
            Some(DirectionFrame::new(start, goal)?)
        } else {
            None
        };

        Ok(Self {
            model,
            sampler,
            config,
            start,
            goal,
            trees: [Tree::new(), Tree::new()],
            junction: None,
            frame,
            viewer: None,
            name: String::from("rrt-connect"),
        })
    }

    /// Attaches a visualization hook notified on every insertion.
    pub fn with_viewer(mut self, viewer: Box<dyn Viewer<F, N>>) -> Self {
        self.viewer = Some(viewer);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    /// Re-seeds the sampler's random engine for reproducible runs.
    pub fn seed(&mut self, seed: u64) {
        self.sampler.seed(seed);
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn get_tree(&self, index: usize) -> &Tree<F, N> {
        &self.trees[index]
    }

    /// The number of vertices over both trees.
    pub fn get_num_vertices(&self) -> usize {
        self.trees.iter().map(Tree::num_vertices).sum()
    }

    /// The number of edges over both trees.
    pub fn get_num_edges(&self) -> usize {
        self.trees.iter().map(Tree::num_edges).sum()
    }

    /// Whether two configurations are identical under the model's metric
    /// and the configured epsilon.
    pub fn are_equal(&self, lhs: &Configuration<F, N>, rhs: &Configuration<F, N>) -> bool {
        self.model.distance(lhs, rhs) <= self.config.epsilon
    }

    /// Clears both trees and the recorded junction for reuse.
    pub fn reset(&mut self) {
        for tree in self.trees.iter_mut() {
            tree.clear();
        }
        self.junction = None;
    }

    /// Attempts to find a path from start to goal within the time budget.
    ///
    /// Returns true on success. On failure the partial trees are retained
    /// for diagnostics but no path can be extracted.
    pub fn solve(&mut self) -> bool {
        self.reset();
        let clock = Instant::now();

        self.insert_vertex(0, self.start);
        self.insert_vertex(1, self.goal);
        if let Some(frame) = &self.frame {
            // Seed each frontier at a small fraction of the axis length so
            // frontier-biased samples start out ahead of the roots.
            let seed = frame.length() * F::from(0.1).unwrap();
            for tree in self.trees.iter_mut() {
                tree.seed_frontier(seed);
            }
        }

        // Role indices: tree `a` extends towards the sample, tree `b` tries
        // to connect to whatever `a` reached.
        let mut a = 0;
        let mut b = 1;

        while clock.elapsed() < self.config.duration {
            for _ in 0..2 {
                let chosen = self.choose(a);

                if let Some(a_nearest) = nearest(&self.trees[a], &chosen, &self.model) {
                    if let Some(a_connected) = self.connect(a, &a_nearest, &chosen) {
                        let reached = *self.trees[a].vertex(a_connected).config();

                        if let Some(b_nearest) = nearest(&self.trees[b], &reached, &self.model) {
                            if let Some(b_connected) = self.connect(b, &b_nearest, &reached) {
                                let b_reached = *self.trees[b].vertex(b_connected).config();

                                if self.are_equal(&reached, &b_reached) {
                                    self.junction = Some(if a == 0 {
                                        [a_connected, b_connected]
                                    } else {
                                        [b_connected, a_connected]
                                    });
                                    debug!(
                                        name = %self.name,
                                        vertices = self.get_num_vertices(),
                                        elapsed_ms = clock.elapsed().as_millis() as u64,
                                        "trees connected"
                                    );
                                    return true;
                                }
                            }
                        }
                    }
                }

                std::mem::swap(&mut a, &mut b);
            }
        }

        debug!(
            name = %self.name,
            vertices = self.get_num_vertices(),
            "time budget exhausted without connecting the trees"
        );
        false
    }

    /// The configurations from start to goal, available after a successful
    /// solve. The walk prepends tree 0's junction-to-root chain and appends
    /// tree 1's, so both junction vertices appear adjacently in the middle.
    ///
    /// An edge recorded by `connect` can span several delta-sized steps of
    /// its traversal. Such edges are subdivided here so that consecutive
    /// path configurations are never further apart than delta.
    pub fn get_path(&self) -> Option<Vec<Configuration<F, N>>> {
        let [junction_0, junction_1] = self.junction?;

        let mut vertices: Vec<Configuration<F, N>> = self.trees[0]
            .walk_to_root(junction_0)
            .into_iter()
            .map(|index| *self.trees[0].vertex(index).config())
            .collect();
        vertices.reverse();

        vertices.extend(
            self.trees[1]
                .walk_to_root(junction_1)
                .into_iter()
                .map(|index| *self.trees[1].vertex(index).config()),
        );

        let mut path = Vec::with_capacity(vertices.len());
        if let Some(first) = vertices.first() {
            path.push(*first);
        }
        for pair in vertices.windows(2) {
            let distance = self.model.distance(&pair[0], &pair[1]);
            if distance > self.config.delta {
                let pieces = (distance / self.config.delta).ceil();
                let count = pieces.to_usize().unwrap_or(1);
                for i in 1..count {
                    let t = F::from(i).unwrap() / pieces;
                    path.push(self.model.interpolate(&pair[0], &pair[1], t));
                }
            }
            path.push(pair[1]);
        }

        Some(path)
    }

    /// Advances `tree_index` one step of size `min(distance, delta)` from
    /// the nearest vertex towards `chosen`. Appends and returns the new
    /// vertex when the step is collision free; otherwise the tree is left
    /// unchanged.
    pub fn extend(
        &mut self,
        tree_index: usize,
        nearest: &Neighbor<F>,
        chosen: &Configuration<F, N>,
    ) -> Option<usize> {
        let distance = nearest.distance;
        if !(distance > F::zero()) {
            return Some(nearest.vertex);
        }
        let step = if distance < self.config.delta {
            distance
        } else {
            self.config.delta
        };

        let from = *self.trees[tree_index].vertex(nearest.vertex).config();
        let next = self.model.interpolate(&from, chosen, step / distance);

        self.model.commit(&next);
        if self.model.is_colliding() {
            return None;
        }

        let vertex = self.insert_vertex(tree_index, next);
        self.insert_edge(tree_index, nearest.vertex, vertex);
        Some(vertex)
    }

    /// Repeats delta-bounded steps from the nearest vertex towards `chosen`
    /// until the remaining distance is at most delta or a step collides.
    ///
    /// The originating vertex's success or failure counter is bumped exactly
    /// once per call, from the outcome of the very first step. The returned
    /// vertex holds the furthest collision-free configuration reached; in
    /// intermediate-vertices mode every successful step along the way is
    /// recorded as well.
    pub fn connect(
        &mut self,
        tree_index: usize,
        nearest: &Neighbor<F>,
        chosen: &Configuration<F, N>,
    ) -> Option<usize> {
        let mut distance = nearest.distance;
        if !(distance > F::zero()) {
            // The nearest vertex already coincides with the target.
            self.trees[tree_index].record_success(nearest.vertex);
            return Some(nearest.vertex);
        }

        let mut reached = distance <= self.config.delta;
        let step = if reached { distance } else { self.config.delta };

        let from = *self.trees[tree_index].vertex(nearest.vertex).config();
        let mut last = self.model.interpolate(&from, chosen, step / distance);

        self.model.commit(&last);
        if self.model.is_colliding() {
            let fails = self.trees[tree_index].record_failure(nearest.vertex);
            if let Some(limit) = self.config.exhaustion_limit {
                if fails > limit {
                    self.trees[tree_index].mark_exhausted(nearest.vertex);
                }
            }
            return None;
        }
        self.trees[tree_index].record_success(nearest.vertex);

        let mut anchor = nearest.vertex;
        if self.config.intermediate_vertices {
            let vertex = self.insert_vertex(tree_index, last);
            self.insert_edge(tree_index, anchor, vertex);
            anchor = vertex;
        }

        while !reached {
            distance = self.model.distance(&last, chosen);
            if !(distance > F::zero()) {
                break;
            }
            reached = distance <= self.config.delta;
            let step = if reached { distance } else { self.config.delta };

            let next = self.model.interpolate(&last, chosen, step / distance);
            self.model.commit(&next);
            if self.model.is_colliding() {
                break;
            }

            last = next;
            if self.config.intermediate_vertices {
                let vertex = self.insert_vertex(tree_index, last);
                self.insert_edge(tree_index, anchor, vertex);
                anchor = vertex;
            }
        }

        if self.config.intermediate_vertices {
            Some(anchor)
        } else {
            let vertex = self.insert_vertex(tree_index, last);
            self.insert_edge(tree_index, nearest.vertex, vertex);
            Some(vertex)
        }
    }

    /// Samples a configuration biased towards the other tree's target.
    fn choose(&mut self, extending_tree: usize) -> Configuration<F, N> {
        let bias_target = if extending_tree == 0 {
            &self.goal
        } else {
            &self.start
        };
        let context = SampleContext {
            bias_target,
            frame: self.frame.as_ref(),
            frontiers: [self.trees[0].frontier(), self.trees[1].frontier()],
        };
        self.sampler.draw(&mut self.model, &context)
    }

    fn insert_vertex(&mut self, tree_index: usize, q: Configuration<F, N>) -> usize {
        let index = self.trees[tree_index].add_vertex(q);
        if let Some(frame) = &self.frame {
            let projection = if tree_index == 0 {
                frame.projection_from_start(&q)
            } else {
                frame.projection_from_goal(&q)
            };
            self.trees[tree_index].observe_projection(projection);
        }
        if let Some(viewer) = &mut self.viewer {
            viewer.configuration_vertex(&q);
        }
        index
    }

    fn insert_edge(&mut self, tree_index: usize, parent: usize, child: usize) {
        self.trees[tree_index].add_edge(parent, child);
        if let Some(viewer) = &mut self.viewer {
            let tree = &self.trees[tree_index];
            viewer.configuration_edge(tree.vertex(parent).config(), tree.vertex(child).config());
        }
    }
}

//! End-to-end planning scenarios in a 2-D configuration space.

use rrt_connect::model::StaticRectangularObstacle;
use rrt_connect::planner::Viewer;
use rrt_connect::{
    AnalyticModel, Configuration, RrtConnect, RrtConnectConfig, Sampler, SamplingStrategy,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

const START: [f64; 2] = [1.0, 1.0];
const GOAL: [f64; 2] = [9.0, 9.0];
const DELTA: f64 = 0.5;
const EPSILON: f64 = 1e-6;

/// Bounds [0, 10] x [0, 10] with one square obstacle centered at (5, 5)
/// with half-width 1.
fn square_obstacle_model() -> AnalyticModel<f64, 2> {
    let obstacle = StaticRectangularObstacle::from_center(Configuration::new([5.0, 5.0]), 1.0);
    AnalyticModel::new(
        Configuration::new([0.0, 0.0]),
        Configuration::new([10.0, 10.0]),
        vec![Box::new(obstacle)],
    )
    .unwrap()
}

fn scenario_config() -> RrtConnectConfig<f64> {
    RrtConnectConfig {
        delta: DELTA,
        epsilon: EPSILON,
        duration: Duration::from_secs(30),
        exhaustion_limit: None,
        intermediate_vertices: false,
    }
}

fn scenario_planner(sampler: Sampler<f64, 2>) -> RrtConnect<f64, 2, AnalyticModel<f64, 2>> {
    RrtConnect::new(
        square_obstacle_model(),
        sampler,
        Configuration::new(START),
        Configuration::new(GOAL),
        scenario_config(),
    )
    .unwrap()
}

fn assert_path_properties(path: &[Configuration<f64, 2>]) {
    assert_eq!(path[0], Configuration::new(START));
    assert_eq!(*path.last().unwrap(), Configuration::new(GOAL));

    // Every consecutive pair is within delta; the junction pair is within
    // epsilon, which delta covers as well.
    let mut junction_pairs = 0;
    for pair in path.windows(2) {
        let step = pair[0].euclidean_distance(&pair[1]);
        assert!(step <= DELTA + 1e-9, "step of {step} exceeds delta");
        if step <= EPSILON {
            junction_pairs += 1;
        }
    }
    assert!(junction_pairs >= 1, "no junction pair within epsilon");

    // No configuration on the path enters the obstacle square.
    for q in path {
        let inside =
            q[0] >= 4.0 && q[0] <= 6.0 && q[1] >= 4.0 && q[1] <= 6.0;
        assert!(!inside, "path enters the obstacle at {:?}", q.values());
    }
}

#[test]
fn uniform_sampling_solves_the_square_obstacle_scenario() {
    let mut planner = scenario_planner(Sampler::uniform());
    planner.seed(42);

    assert!(planner.solve());
    let path = planner.get_path().unwrap();
    assert_path_properties(&path);

    // Two roots, one edge per non-root vertex.
    assert_eq!(planner.get_num_vertices(), planner.get_num_edges() + 2);
}

#[test]
fn path_steps_stay_within_delta_across_seeds() {
    // Without subdivision, a single connect traversal can put one long
    // edge on the path; seed 0 used to produce a step of nearly 4.
    for seed in 0..8 {
        let mut planner = scenario_planner(Sampler::uniform());
        planner.seed(seed);
        assert!(planner.solve());
        let path = planner.get_path().unwrap();
        for pair in path.windows(2) {
            let step = pair[0].euclidean_distance(&pair[1]);
            assert!(
                step <= DELTA + 1e-9,
                "seed {seed}: step of {step} exceeds delta {DELTA}"
            );
        }
    }
}

#[test]
fn solve_is_deterministic_for_a_fixed_seed() {
    let mut first = scenario_planner(
        Sampler::new(SamplingStrategy::GoalBiased { bias: 0.05 }, Configuration::zeros())
            .unwrap(),
    );
    let mut second = scenario_planner(
        Sampler::new(SamplingStrategy::GoalBiased { bias: 0.05 }, Configuration::zeros())
            .unwrap(),
    );
    first.seed(7);
    second.seed(7);

    assert!(first.solve());
    assert!(second.solve());
    assert_eq!(first.get_path().unwrap(), second.get_path().unwrap());
    assert_eq!(first.get_num_vertices(), second.get_num_vertices());
}

#[test]
fn goal_biased_sampling_solves_the_scenario() {
    let mut planner = scenario_planner(
        Sampler::new(SamplingStrategy::GoalBiased { bias: 0.05 }, Configuration::zeros())
            .unwrap(),
    );
    planner.seed(1);
    assert!(planner.solve());
    assert_path_properties(&planner.get_path().unwrap());
}

#[test]
fn gaussian_sampling_solves_the_scenario() {
    let mut planner = scenario_planner(
        Sampler::new(SamplingStrategy::Gaussian, Configuration::new([1.0, 1.0])).unwrap(),
    );
    planner.seed(2);
    assert!(planner.solve());
    assert_path_properties(&planner.get_path().unwrap());
}

#[test]
fn bridge_sampling_solves_the_scenario() {
    let mut planner = scenario_planner(
        Sampler::new(SamplingStrategy::Bridge, Configuration::new([1.5, 1.5])).unwrap(),
    );
    planner.seed(3);
    assert!(planner.solve());
    assert_path_properties(&planner.get_path().unwrap());
}

#[test]
fn direction_biased_sampling_solves_the_scenario() {
    let mut planner = scenario_planner(
        Sampler::new(SamplingStrategy::DirectionBiased, Configuration::new([2.0, 2.0]))
            .unwrap(),
    );
    planner.seed(4);
    assert!(planner.solve());
    assert_path_properties(&planner.get_path().unwrap());
}

#[test]
fn frontier_biased_sampling_solves_the_scenario() {
    let mut planner = scenario_planner(
        Sampler::new(SamplingStrategy::FrontierBiased, Configuration::new([2.0, 2.0]))
            .unwrap(),
    );
    planner.seed(5);
    assert!(planner.solve());
    assert_path_properties(&planner.get_path().unwrap());
}

#[test]
fn intermediate_vertices_mode_solves_with_finer_tree_granularity() {
    let mut config = scenario_config();
    config.intermediate_vertices = true;
    let mut planner = RrtConnect::new(
        square_obstacle_model(),
        Sampler::uniform(),
        Configuration::new(START),
        Configuration::new(GOAL),
        config,
    )
    .unwrap();
    planner.seed(6);
    assert!(planner.solve());
    assert_path_properties(&planner.get_path().unwrap());
}

#[test]
fn an_unreachable_goal_fails_when_the_budget_expires() {
    // A wall spanning the full height separates start from goal.
    let wall = StaticRectangularObstacle::new(
        Configuration::new([4.0, 0.0]),
        Configuration::new([6.0, 10.0]),
    );
    let model = AnalyticModel::new(
        Configuration::new([0.0, 0.0]),
        Configuration::new([10.0, 10.0]),
        vec![Box::new(wall)],
    )
    .unwrap();
    let mut config = scenario_config();
    config.duration = Duration::from_millis(50);
    let mut planner = RrtConnect::new(
        model,
        Sampler::uniform(),
        Configuration::new(START),
        Configuration::new(GOAL),
        config,
    )
    .unwrap();
    planner.seed(8);

    assert!(!planner.solve());
    assert!(planner.get_path().is_none());
    // Partial tree state is retained for diagnostics.
    assert!(planner.get_num_vertices() >= 2);
}

#[test]
fn reset_clears_all_tree_state_for_reuse() {
    let mut planner = scenario_planner(Sampler::uniform());
    planner.seed(9);
    assert!(planner.solve());
    assert!(planner.get_num_vertices() > 0);

    planner.reset();
    assert_eq!(planner.get_num_vertices(), 0);
    assert_eq!(planner.get_num_edges(), 0);
    assert!(planner.get_path().is_none());

    // A fresh attempt re-roots both trees and succeeds again.
    assert!(planner.solve());
    assert_path_properties(&planner.get_path().unwrap());
}

struct CountingViewer {
    counts: Rc<RefCell<(usize, usize)>>,
}

impl Viewer<f64, 2> for CountingViewer {
    fn configuration_vertex(&mut self, _q: &Configuration<f64, 2>) {
        self.counts.borrow_mut().0 += 1;
    }

    fn configuration_edge(
        &mut self,
        _parent: &Configuration<f64, 2>,
        _child: &Configuration<f64, 2>,
    ) {
        self.counts.borrow_mut().1 += 1;
    }
}

#[test]
fn the_viewer_sees_every_insertion() {
    let counts = Rc::new(RefCell::new((0usize, 0usize)));
    let viewer = CountingViewer {
        counts: Rc::clone(&counts),
    };
    let mut with_viewer = scenario_planner(Sampler::uniform()).with_viewer(Box::new(viewer));
    with_viewer.seed(10);
    let mut without_viewer = scenario_planner(Sampler::uniform());
    without_viewer.seed(10);

    assert!(with_viewer.solve());
    let (vertex_notifications, edge_notifications) = *counts.borrow();
    assert_eq!(vertex_notifications, with_viewer.get_num_vertices());
    assert_eq!(edge_notifications, with_viewer.get_num_edges());

    // The hook is observational only: it must not change the search.
    assert!(without_viewer.solve());
    assert_eq!(
        with_viewer.get_path().unwrap(),
        without_viewer.get_path().unwrap()
    );
}

//! Bidirectional RRT-Connect motion planning in bounded configuration
//! spaces.
//!
//! Two search trees grow towards each other, one rooted at the start and one
//! at the goal, fed by a pluggable sampling strategy and advanced by a
//! delta-bounded extend/connect stepper until they meet within epsilon or
//! the wall-clock budget runs out. The collision/kinematics model is an
//! external collaborator behind the [`model::Model`] trait; an analytic
//! obstacle model is bundled for scenarios and tests.

pub mod error;
pub mod model;
pub mod planner;
pub mod state;

pub use error::PlannerError;
pub use model::{AnalyticModel, Model};
pub use planner::{RrtConnect, RrtConnectConfig, Sampler, SamplingStrategy, Viewer};
pub use state::Configuration;

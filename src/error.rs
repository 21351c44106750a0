use thiserror::Error;

/// Errors raised while constructing a planner or its collaborators.
///
/// Per-step collisions during extend/connect are not errors: they are the
/// normal mechanism by which the algorithm rejects branches, and are only
/// counted on the originating vertex.
#[derive(Debug, Error, PartialEq)]
pub enum PlannerError {
    /// The start and goal configurations coincide, so no direction frame
    /// can be built from them.
    #[error("start and goal coincide; the start-to-goal direction is degenerate")]
    DegenerateDirection,

    /// The goal bias probability must lie in [0, 1].
    #[error("goal bias {0} is outside [0, 1]")]
    InvalidGoalBias(f64),

    /// The connect step size must be strictly positive.
    #[error("step size delta {0} must be strictly positive")]
    InvalidDelta(f64),

    /// The merge tolerance must be non-negative.
    #[error("merge tolerance epsilon {0} must be non-negative")]
    InvalidEpsilon(f64),

    /// A bounds vector was inverted (minimum above maximum) in some dimension.
    #[error("minimum bound exceeds maximum bound in dimension {0}")]
    InvertedBounds(usize),
}

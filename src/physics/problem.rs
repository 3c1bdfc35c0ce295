use glam::DVec2;

use super::DifferentialOperator;
use super::functions::{IntoSpaceFn, IntoSpaceTimeFn, SpaceFn, SpaceTimeFn};

/// `L u = f` in the interior, `u = phi` on tagged boundary nodes. `phi` is
/// also the closed-form solution used as reference.
#[derive(Clone)]
pub struct StationaryProblem {
    pub boundary: SpaceFn,
    pub source: SpaceFn,
    pub operator: DifferentialOperator,
}

impl StationaryProblem {
    pub fn new(
        boundary: impl IntoSpaceFn,
        source: impl IntoSpaceFn,
        operator: DifferentialOperator,
    ) -> Self {
        Self {
            boundary: boundary.into_space_fn(),
            source: source.into_space_fn(),
            operator,
        }
    }
}

/// `∂u/∂t = L u` or `∂²u/∂t² = L u` on `t ∈ [0, 1]`.
///
/// `solution` supplies the initial condition, the boundary values at every
/// level and the reference field. `velocity` is the initial time derivative,
/// required only by second-order-in-time problems. `coefficients` is passed
/// through to both functions untouched.
#[derive(Clone)]
pub struct TransientProblem {
    pub solution: SpaceTimeFn,
    pub velocity: Option<SpaceTimeFn>,
    pub coefficients: Vec<f64>,
    pub operator: DifferentialOperator,
}

impl TransientProblem {
    pub fn new(
        solution: impl IntoSpaceTimeFn,
        coefficients: Vec<f64>,
        operator: DifferentialOperator,
    ) -> Self {
        Self {
            solution: solution.into_space_time_fn(),
            velocity: None,
            coefficients,
            operator,
        }
    }

    pub fn with_velocity(mut self, velocity: impl IntoSpaceTimeFn) -> Self {
        self.velocity = Some(velocity.into_space_time_fn());
        self
    }

    pub fn solution_at(&self, p: DVec2, t: f64) -> f64 {
        (self.solution)(p, t, &self.coefficients)
    }

    pub fn velocity_at(&self, p: DVec2, t: f64) -> Option<f64> {
        self.velocity
            .as_ref()
            .map(|g| g(p, t, &self.coefficients))
    }
}

use std::sync::Arc;

use glam::DVec2;

/// Function of position only: boundary values and sources of stationary
/// problems.
pub type SpaceFn = Arc<dyn Fn(DVec2) -> f64 + Send + Sync>;

/// Function of position, time and the problem coefficients: exact solutions
/// and initial velocities of transient problems.
pub type SpaceTimeFn = Arc<dyn Fn(DVec2, f64, &[f64]) -> f64 + Send + Sync>;

pub trait IntoSpaceFn {
    fn into_space_fn(self) -> SpaceFn;
}

pub trait IntoSpaceTimeFn {
    fn into_space_time_fn(self) -> SpaceTimeFn;
}

impl IntoSpaceFn for f64 {
    fn into_space_fn(self) -> SpaceFn {
        Arc::new(move |_: DVec2| self)
    }
}

impl<F> IntoSpaceFn for F
where
    F: Fn(DVec2) -> f64 + Send + Sync + 'static,
{
    fn into_space_fn(self) -> SpaceFn {
        Arc::new(self)
    }
}

impl IntoSpaceTimeFn for f64 {
    fn into_space_time_fn(self) -> SpaceTimeFn {
        Arc::new(move |_: DVec2, _: f64, _: &[f64]| self)
    }
}

impl<F> IntoSpaceTimeFn for F
where
    F: Fn(DVec2, f64, &[f64]) -> f64 + Send + Sync + 'static,
{
    fn into_space_time_fn(self) -> SpaceTimeFn {
        Arc::new(self)
    }
}

use std::f64::consts::PI;

use glam::DVec2;

use crate::physics::DifferentialOperator;
use crate::physics::problem::TransientProblem;

/// Heat equation `u_t = ν Δu` with `u = e^(-2π²νt) cos(πx) cos(πy)`.
/// Coefficients: `[ν]`.
pub fn heat(nu: f64) -> TransientProblem {
    TransientProblem::new(
        |p: DVec2, t: f64, coef: &[f64]| {
            (-2.0 * PI * PI * coef[0] * t).exp() * (PI * p.x).cos() * (PI * p.y).cos()
        },
        vec![nu],
        DifferentialOperator::new(0.0, 0.0, 2.0 * nu, 0.0, 2.0 * nu, 0.0),
    )
}

/// Advection-diffusion `u_t = ν Δu - a u_x - b u_y` with a spreading
/// Gaussian pulse starting at `(0.5, 0.5)`. Coefficients: `[ν, a, b]`.
pub fn advection_diffusion(nu: f64, a: f64, b: f64) -> TransientProblem {
    TransientProblem::new(
        |p: DVec2, t: f64, coef: &[f64]| {
            let (nu, a, b) = (coef[0], coef[1], coef[2]);
            let spread = 4.0 * t + 1.0;
            let x = p.x - a * t - 0.5;
            let y = p.y - b * t - 0.5;
            (-(x * x) / (nu * spread) - (y * y) / (nu * spread)).exp() / spread
        },
        vec![nu, a, b],
        DifferentialOperator::new(-a, -b, 2.0 * nu, 0.0, 2.0 * nu, 0.0),
    )
}

/// Wave equation `u_tt = c² Δu` with `u = cos(πt) sin(π(x + y))`, valid for
/// `c² = 1/2`. Coefficients: `[c]`.
pub fn wave(c: f64) -> TransientProblem {
    TransientProblem::new(
        |p: DVec2, t: f64, _: &[f64]| (PI * t).cos() * (PI * (p.x + p.y)).sin(),
        vec![c],
        DifferentialOperator::new(0.0, 0.0, 2.0 * c * c, 0.0, 2.0 * c * c, 0.0),
    )
    .with_velocity(|p: DVec2, t: f64, _: &[f64]| -PI * (PI * t).sin() * (PI * (p.x + p.y)).sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_states() {
        let heat = heat(0.2);
        assert_eq!(heat.solution_at(DVec2::ZERO, 0.0), 1.0);

        let pulse = advection_diffusion(0.1, 0.3, 0.2);
        assert_eq!(pulse.solution_at(DVec2::new(0.5, 0.5), 0.0), 1.0);

        let wave = wave(0.5_f64.sqrt());
        assert_eq!(wave.velocity_at(DVec2::new(0.25, 0.25), 0.0), Some(0.0));
        assert!(heat.velocity_at(DVec2::ZERO, 0.0).is_none());
    }
}

use glam::DVec2;

use crate::physics::DifferentialOperator;
use crate::physics::problem::StationaryProblem;

/// `Δu = 10 e^(2x + y)` with exact solution `u = 2 e^(2x + y)`.
pub fn poisson_exponential() -> StationaryProblem {
    StationaryProblem::new(
        |p: DVec2| 2.0 * (2.0 * p.x + p.y).exp(),
        |p: DVec2| 10.0 * (2.0 * p.x + p.y).exp(),
        DifferentialOperator::laplacian(),
    )
}

/// `Δu = 4` with exact solution `u = x² + y²`. Quadratic, so the five-term
/// local basis represents it exactly.
pub fn poisson_quadratic() -> StationaryProblem {
    StationaryProblem::new(
        |p: DVec2| p.x * p.x + p.y * p.y,
        4.0,
        DifferentialOperator::laplacian(),
    )
}

/// Every first- and second-order moment at once: exact solution
/// `u = x² + x y + 2 y²` under moments `(1, 2, 2, 1, 2)`, i.e.
/// `u_x + 2 u_y + u_xx + u_xy + u_yy`.
pub fn mixed_quadratic() -> StationaryProblem {
    StationaryProblem::new(
        |p: DVec2| p.x * p.x + p.x * p.y + 2.0 * p.y * p.y,
        |p: DVec2| (2.0 * p.x + p.y) + 2.0 * (p.x + 4.0 * p.y) + 2.0 + 1.0 + 4.0,
        DifferentialOperator::new(1.0, 2.0, 2.0, 1.0, 2.0, 0.0),
    )
}

use std::time::Instant;

use log::info;
use nalgebra::DVector;

use super::linalg::least_squares_solve;
use super::stencil::{assemble, rhs};
use super::timing::{finalize_and_log, record_neighbors, reset_timing};
use crate::discretization::cloud::PointCloud;
use crate::discretization::neighbors::{NeighborConfig, NeighborTable};
use crate::error::Result;
use crate::physics::problem::StationaryProblem;

/// Single linear solve `K u = R` for problems without time derivative.
#[derive(Clone, Debug, Default)]
pub struct StationarySolver {
    pub neighbors: NeighborConfig,
}

pub struct StationaryResult {
    /// Interior values from the solve, boundary values from `phi`.
    pub computed: DVector<f64>,
    /// `phi` at every node.
    pub reference: DVector<f64>,
    pub neighbors: NeighborTable,
}

impl StationarySolver {
    pub fn new(neighbors: NeighborConfig) -> Self {
        Self { neighbors }
    }

    /// Assemble `K` for the problem operator, build `R` (`phi` on the
    /// boundary, `f` inside) and take `u = pinv(K) · R`. A singular `K`
    /// yields the minimum-norm least-squares field.
    pub fn solve(
        &self,
        cloud: &PointCloud,
        problem: &StationaryProblem,
    ) -> Result<StationaryResult> {
        reset_timing();
        let solve_start = Instant::now();

        let table = record_neighbors(|| self.neighbors.build(cloud))?;
        let interior = cloud.interior_indices();
        let boundary = cloud.boundary_indices();
        info!(
            "Stationary solve: {} interior and {} boundary nodes",
            interior.len(),
            boundary.len()
        );

        let k = assemble(cloud, &table, &problem.operator)?;
        let r = rhs(cloud, &interior, &boundary, &problem.boundary, &problem.source);
        let solved = least_squares_solve(k, &r)?;

        let reference = DVector::from_iterator(
            cloud.len(),
            cloud.nodes().iter().map(|node| (problem.boundary)(node.position)),
        );

        let mut computed = DVector::zeros(cloud.len());
        for &i in &boundary {
            computed[i] = reference[i];
        }
        for &i in &interior {
            computed[i] = solved[i];
        }

        finalize_and_log(solve_start.elapsed());
        Ok(StationaryResult {
            computed,
            reference,
            neighbors: table,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discretization::generator::unit_square_cloud;
    use crate::physics::DifferentialOperator;
    use glam::DVec2;

    #[test]
    fn linear_field_is_reproduced() {
        let cloud = unit_square_cloud(6);
        let problem = StationaryProblem::new(
            |p: DVec2| 3.0 * p.x - 2.0 * p.y + 1.0,
            0.0,
            DifferentialOperator::laplacian(),
        );
        let result = StationarySolver::default()
            .solve(&cloud, &problem)
            .expect("solve");

        let max_err = (&result.computed - &result.reference).amax();
        assert!(max_err < 1e-10, "max error {max_err:.3e}");
        assert_eq!(result.neighbors.len(), cloud.len());
    }
}

//! Time integration on the uniform grid `t_k = k / (t - 1)`, `k = 0..t`.
//!
//! Both first- and second-order-in-time problems are driven by updates of
//! the form `pinv(I - (1 - λ)·s·K) · (d·I + λ·s·K)`, built by
//! [`ThetaUpdate`]. Boundary nodes take the exact solution at every level,
//! before the implicit solve and after it.

use std::time::Instant;

use log::{debug, info, trace};
use nalgebra::{DMatrix, DVector};

use super::linalg::pseudo_inverse;
use super::stencil::assemble;
use super::timing::{finalize_and_log, record_neighbors, record_step, reset_timing};
use crate::discretization::cloud::PointCloud;
use crate::discretization::neighbors::{NeighborConfig, NeighborTable};
use crate::error::{GfdError, Result};
use crate::physics::problem::TransientProblem;

/// Time discretization. In `Theta(λ)` the parameter weights the old-level
/// (explicit) contribution: `Theta(1.0)` is the explicit scheme, `Theta(0.0)`
/// fully implicit, `Theta(0.5)` Crank–Nicolson.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum TimeScheme {
    #[default]
    Explicit,
    Theta(f64),
}

impl TimeScheme {
    fn lambda(self) -> Result<f64> {
        match self {
            TimeScheme::Explicit => Ok(1.0),
            TimeScheme::Theta(lambda) if (0.0..=1.0).contains(&lambda) => Ok(lambda),
            TimeScheme::Theta(lambda) => Err(GfdError::InvalidTheta(lambda)),
        }
    }
}

/// The pair `(pinv(lhs), d·I + λ·s·K)` with `lhs = I - (1 - λ)·s·K` on
/// interior rows and the identity on boundary rows, so the boundary entries
/// of the vector handed to [`ThetaUpdate::apply_lhs_inverse`] pass through
/// unchanged. The inverse is skipped when the left-hand side is the identity
/// (λ = 1).
pub struct ThetaUpdate {
    lhs_inverse: Option<DMatrix<f64>>,
    rhs: DMatrix<f64>,
}

impl ThetaUpdate {
    pub fn build(
        k: &DMatrix<f64>,
        scale: f64,
        diagonal: f64,
        scheme: TimeScheme,
        boundary: &[usize],
    ) -> Result<Self> {
        let lambda = scheme.lambda()?;
        let n = k.nrows();
        let identity = DMatrix::<f64>::identity(n, n);

        let rhs = &identity * diagonal + k * (lambda * scale);
        let implicit_scale = (1.0 - lambda) * scale;
        let lhs_inverse = if implicit_scale == 0.0 {
            None
        } else {
            let mut lhs = &identity - k * implicit_scale;
            for &i in boundary {
                lhs.row_mut(i).fill(0.0);
                lhs[(i, i)] = 1.0;
            }
            Some(pseudo_inverse(lhs)?)
        };
        Ok(Self { lhs_inverse, rhs })
    }

    pub fn rhs(&self) -> &DMatrix<f64> {
        &self.rhs
    }

    pub fn lhs_inverse(&self) -> Option<&DMatrix<f64>> {
        self.lhs_inverse.as_ref()
    }

    pub fn apply_rhs(&self, v: &DVector<f64>) -> DVector<f64> {
        &self.rhs * v
    }

    pub fn apply_lhs_inverse(&self, w: DVector<f64>) -> DVector<f64> {
        match &self.lhs_inverse {
            Some(inverse) => inverse * w,
            None => w,
        }
    }
}

#[derive(Clone, Debug)]
pub struct TransientSolver {
    /// Number of time levels `t`, including `t = 0` and `t = 1`.
    pub levels: usize,
    pub scheme: TimeScheme,
    pub neighbors: NeighborConfig,
}

impl Default for TransientSolver {
    fn default() -> Self {
        Self {
            levels: 2000,
            scheme: TimeScheme::Explicit,
            neighbors: NeighborConfig::default(),
        }
    }
}

pub struct TransientResult {
    /// N×t, column `k` is level `k`.
    pub computed: DMatrix<f64>,
    /// Exact solution at every node and level.
    pub reference: DMatrix<f64>,
    pub neighbors: NeighborTable,
    pub times: Vec<f64>,
}

impl TransientResult {
    pub fn levels(&self) -> usize {
        self.times.len()
    }

    pub fn computed_level(&self, k: usize) -> DVector<f64> {
        self.computed.column(k).into_owned()
    }

    pub fn reference_level(&self, k: usize) -> DVector<f64> {
        self.reference.column(k).into_owned()
    }

    /// Largest absolute deviation from the reference at level `k`.
    pub fn max_deviation(&self, k: usize) -> f64 {
        (self.computed.column(k) - self.reference.column(k)).amax()
    }
}

impl TransientSolver {
    pub fn new(levels: usize, scheme: TimeScheme, neighbors: NeighborConfig) -> Self {
        Self {
            levels,
            scheme,
            neighbors,
        }
    }

    fn time_grid(&self) -> Result<(Vec<f64>, f64)> {
        if self.levels < 2 {
            return Err(GfdError::TooFewLevels(self.levels));
        }
        let dt = 1.0 / (self.levels - 1) as f64;
        let times = (0..self.levels).map(|k| k as f64 * dt).collect();
        Ok((times, dt))
    }

    /// `∂u/∂t = L u`. Each level is `pinv(I - (1 - λ)K) · (I + λK) · previous`
    /// with `K` assembled from `dt · L`.
    pub fn solve_first_order(
        &self,
        cloud: &PointCloud,
        problem: &TransientProblem,
    ) -> Result<TransientResult> {
        reset_timing();
        let solve_start = Instant::now();

        let (times, dt) = self.time_grid()?;
        info!(
            "First-order transient solve: {} levels, dt = {:.4e}, {:?}",
            self.levels, dt, self.scheme
        );

        let table = record_neighbors(|| self.neighbors.build(cloud))?;
        let k = assemble(cloud, &table, &problem.operator.scaled(dt))?;
        let boundary = cloud.boundary_indices();
        let update = ThetaUpdate::build(&k, 1.0, 1.0, self.scheme, &boundary)?;

        let mut levels = Vec::with_capacity(self.levels);
        levels.push(exact_level(cloud, problem, times[0]));

        for (step, &t) in times.iter().enumerate().skip(1) {
            let next = record_step(|| {
                let mut w = update.apply_rhs(&levels[step - 1]);
                impose_boundary(cloud, &boundary, problem, t, &mut w);
                let mut next = update.apply_lhs_inverse(w);
                impose_boundary(cloud, &boundary, problem, t, &mut next);
                next
            });
            log_progress(step, self.levels, t, &next);
            levels.push(next);
        }

        let result = finish(cloud, problem, levels, times, table);
        finalize_and_log(solve_start.elapsed());
        Ok(result)
    }

    /// `∂²u/∂t² = L u` with a three-level recurrence on `K` assembled from
    /// `dt² · L`:
    ///
    /// * level 1: `K1 · (K2 · u0 + dt · g(t1))`,
    /// * level k ≥ 2: `K3 · (K4 · u_{k-1} - u_{k-2})`,
    ///
    /// where `(K1, K2)` is the theta pair for `(½K, I)` and `(K3, K4)` the
    /// one for `(K, 2I)`.
    pub fn solve_second_order(
        &self,
        cloud: &PointCloud,
        problem: &TransientProblem,
    ) -> Result<TransientResult> {
        reset_timing();
        let solve_start = Instant::now();

        let velocity = problem.velocity.as_ref().ok_or(GfdError::MissingVelocity)?;
        let (times, dt) = self.time_grid()?;
        info!(
            "Second-order transient solve: {} levels, dt = {:.4e}, {:?}",
            self.levels, dt, self.scheme
        );

        let table = record_neighbors(|| self.neighbors.build(cloud))?;
        let k = assemble(cloud, &table, &problem.operator.scaled(dt * dt))?;
        let boundary = cloud.boundary_indices();
        let first = ThetaUpdate::build(&k, 0.5, 1.0, self.scheme, &boundary)?;
        let recurrence = ThetaUpdate::build(&k, 1.0, 2.0, self.scheme, &boundary)?;

        let mut levels: Vec<DVector<f64>> = Vec::with_capacity(self.levels);
        levels.push(exact_level(cloud, problem, times[0]));

        for (step, &t) in times.iter().enumerate().skip(1) {
            let next = record_step(|| {
                let mut w = if step == 1 {
                    let push = DVector::from_iterator(
                        cloud.len(),
                        cloud
                            .nodes()
                            .iter()
                            .map(|node| dt * velocity(node.position, t, &problem.coefficients)),
                    );
                    first.apply_rhs(&levels[0]) + push
                } else {
                    recurrence.apply_rhs(&levels[step - 1]) - &levels[step - 2]
                };
                impose_boundary(cloud, &boundary, problem, t, &mut w);
                let mut next = if step == 1 {
                    first.apply_lhs_inverse(w)
                } else {
                    recurrence.apply_lhs_inverse(w)
                };
                impose_boundary(cloud, &boundary, problem, t, &mut next);
                next
            });
            log_progress(step, self.levels, t, &next);
            levels.push(next);
        }

        let result = finish(cloud, problem, levels, times, table);
        finalize_and_log(solve_start.elapsed());
        Ok(result)
    }
}

fn exact_level(cloud: &PointCloud, problem: &TransientProblem, t: f64) -> DVector<f64> {
    DVector::from_iterator(
        cloud.len(),
        cloud
            .nodes()
            .iter()
            .map(|node| problem.solution_at(node.position, t)),
    )
}

fn impose_boundary(
    cloud: &PointCloud,
    boundary: &[usize],
    problem: &TransientProblem,
    t: f64,
    field: &mut DVector<f64>,
) {
    for &i in boundary {
        field[i] = problem.solution_at(cloud.position(i), t);
    }
}

fn log_progress(step: usize, levels: usize, t: f64, field: &DVector<f64>) {
    trace!("Level {step:>5}/{} | t = {t:.4e} | max |u| = {:.4e}", levels - 1, field.amax());
    let decile = ((levels - 1) / 10).max(1);
    if step % decile == 0 {
        debug!("Level {step}/{} reached, t = {t:.4}", levels - 1);
    }
}

fn finish(
    cloud: &PointCloud,
    problem: &TransientProblem,
    levels: Vec<DVector<f64>>,
    times: Vec<f64>,
    neighbors: NeighborTable,
) -> TransientResult {
    let reference: Vec<DVector<f64>> = times
        .iter()
        .map(|&t| exact_level(cloud, problem, t))
        .collect();
    TransientResult {
        computed: DMatrix::from_columns(&levels),
        reference: DMatrix::from_columns(&reference),
        neighbors,
        times,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_k() -> DMatrix<f64> {
        DMatrix::from_row_slice(3, 3, &[1.0, 0.0, 0.0, 0.5, -1.0, 0.5, 0.0, 0.0, 1.0])
    }

    #[test]
    fn explicit_update_is_identity_plus_k() {
        let k = sample_k();
        let update =
            ThetaUpdate::build(&k, 1.0, 1.0, TimeScheme::Explicit, &[0, 2]).expect("update");
        assert!(update.lhs_inverse().is_none());
        assert_relative_eq!(*update.rhs(), DMatrix::identity(3, 3) + &k, epsilon = 1e-15);
    }

    #[test]
    fn theta_one_matches_explicit() {
        let k = sample_k();
        let explicit =
            ThetaUpdate::build(&k, 0.5, 2.0, TimeScheme::Explicit, &[]).expect("explicit");
        let theta =
            ThetaUpdate::build(&k, 0.5, 2.0, TimeScheme::Theta(1.0), &[]).expect("theta");
        assert!(theta.lhs_inverse().is_none());
        assert_eq!(explicit.rhs(), theta.rhs());
    }

    #[test]
    fn fully_implicit_update_inverts_lhs() {
        let k = sample_k() * 0.1;
        let update =
            ThetaUpdate::build(&k, 1.0, 1.0, TimeScheme::Theta(0.0), &[]).expect("implicit");
        let lhs = DMatrix::identity(3, 3) - &k;
        let product = lhs * update.lhs_inverse().expect("inverse");
        assert_relative_eq!(product, DMatrix::identity(3, 3), epsilon = 1e-12);
        assert_eq!(update.rhs(), &DMatrix::identity(3, 3));
    }

    #[test]
    fn implicit_solve_keeps_boundary_values() {
        // Boundary rows of I - K vanish here; the solve must still see them.
        let k = sample_k();
        let update =
            ThetaUpdate::build(&k, 1.0, 1.0, TimeScheme::Theta(0.0), &[0, 2]).expect("implicit");
        let next = update.apply_lhs_inverse(DVector::from_vec(vec![3.0, 1.0, 5.0]));
        // Row 1: 2·u1 - 0.5·(u0 + u2) = 1.
        assert_relative_eq!(next, DVector::from_vec(vec![3.0, 2.5, 5.0]), epsilon = 1e-12);
    }

    #[test]
    fn theta_outside_unit_interval_is_rejected() {
        let err = ThetaUpdate::build(&sample_k(), 1.0, 1.0, TimeScheme::Theta(1.5), &[]).err();
        assert!(matches!(err, Some(GfdError::InvalidTheta(_))));
    }

    #[test]
    fn one_level_is_not_enough() {
        let solver = TransientSolver {
            levels: 1,
            ..TransientSolver::default()
        };
        assert!(matches!(solver.time_grid(), Err(GfdError::TooFewLevels(1))));

        let (times, dt) = TransientSolver {
            levels: 5,
            ..TransientSolver::default()
        }
        .time_grid()
        .expect("grid");
        assert_eq!(times, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(dt, 0.25);
    }
}

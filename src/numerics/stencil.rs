//! Local GFD weights and assembly of the global operator matrix.

use log::{debug, warn};
use nalgebra::{DMatrix, DVector};

use super::linalg::local_pseudo_inverse;
use super::timing::record_assembly;
use crate::discretization::cloud::PointCloud;
use crate::discretization::neighbors::NeighborTable;
use crate::error::Result;
use crate::physics::DifferentialOperator;
use crate::physics::functions::SpaceFn;

/// Stencil weights of node `center` for the given neighbor ids, one per
/// neighbor. The central weight is minus their sum.
///
/// The offsets `(dx, dy, dx², dx·dy, dy²)` of the neighbors form the 5×n
/// moment matrix `M`; the weights are `pinv(M) · (D, E, A, B, C)`, the
/// minimum-norm fit when there are more neighbors than basis terms and the
/// least-squares fit otherwise.
pub fn local_weights(
    cloud: &PointCloud,
    center: usize,
    neighbors: &[usize],
    operator: &DifferentialOperator,
) -> Result<DVector<f64>> {
    let origin = cloud.position(center);
    let mut moments = DMatrix::zeros(5, neighbors.len());
    for (j, &id) in neighbors.iter().enumerate() {
        let offset = cloud.position(id) - origin;
        let (dx, dy) = (offset.x, offset.y);
        moments[(0, j)] = dx;
        moments[(1, j)] = dy;
        moments[(2, j)] = dx * dx;
        moments[(3, j)] = dx * dy;
        moments[(4, j)] = dy * dy;
    }

    let target = operator.moments();
    let pinv = local_pseudo_inverse(moments)?;
    Ok(pinv * DVector::from_column_slice(target.as_slice()))
}

/// Global N×N operator matrix.
///
/// Interior rows hold the central weight on the diagonal and the neighbor
/// weights in the neighbor columns, so each interior row sums to zero.
/// Boundary rows (Dirichlet or alternate) are the identity row. A node with
/// no neighbors keeps an all-zero row.
pub fn assemble(
    cloud: &PointCloud,
    table: &NeighborTable,
    operator: &DifferentialOperator,
) -> Result<DMatrix<f64>> {
    if operator.has_zeroth_order() {
        warn!(
            "Zeroth-order coefficient F = {} is not part of the stencil fit and is ignored",
            operator.f
        );
    }

    record_assembly(|| -> Result<DMatrix<f64>> {
        let n = cloud.len();
        let mut k = DMatrix::zeros(n, n);
        let mut empty = 0usize;

        for i in 0..n {
            if cloud.is_boundary(i) {
                k[(i, i)] = 1.0;
                continue;
            }

            let neighbors: Vec<usize> = table.neighbors(i).collect();
            if neighbors.is_empty() {
                empty += 1;
                continue;
            }

            let weights = local_weights(cloud, i, &neighbors, operator)?;
            k[(i, i)] = -weights.sum();
            for (&id, &w) in neighbors.iter().zip(weights.iter()) {
                k[(i, id)] = w;
            }
        }

        debug!("Assembled {n}x{n} operator, {empty} interior rows without neighbors");
        Ok(k)
    })
}

/// Right-hand side of a stationary problem: `phi` on the boundary indices,
/// `f` on the interior ones.
pub fn rhs(
    cloud: &PointCloud,
    interior: &[usize],
    boundary: &[usize],
    phi: &SpaceFn,
    f: &SpaceFn,
) -> DVector<f64> {
    let mut r = DVector::zeros(cloud.len());
    for &i in interior {
        r[i] = f(cloud.position(i));
    }
    for &i in boundary {
        r[i] = phi(cloud.position(i));
    }
    r
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discretization::cloud::{BoundaryTag, Node};
    use crate::discretization::generator::unit_square_cloud;
    use crate::discretization::neighbors::NeighborConfig;
    use crate::physics::functions::IntoSpaceFn;
    use approx::assert_relative_eq;

    #[test]
    fn regular_ring_gets_minimum_norm_laplacian() {
        let cloud = unit_square_cloud(5);
        let table = NeighborConfig::default().build(&cloud).expect("neighbors");
        let neighbors: Vec<usize> = table.neighbors(12).collect();
        let weights = local_weights(&cloud, 12, &neighbors, &DifferentialOperator::laplacian())
            .expect("weights");

        // Axis neighbors 0.2/h², diagonals 0.4/h², h = 0.25.
        let h2 = 0.0625;
        for (&id, &w) in neighbors.iter().zip(weights.iter()) {
            let expected = if [7, 11, 13, 17].contains(&id) { 0.2 } else { 0.4 };
            assert_relative_eq!(w * h2, expected, epsilon = 1e-10);
        }
        assert_relative_eq!(-weights.sum() * h2, -2.4, epsilon = 1e-10);
    }

    #[test]
    fn boundary_rows_are_identity_and_interior_rows_sum_to_zero() {
        let cloud = unit_square_cloud(6);
        let table = NeighborConfig::default().build(&cloud).expect("neighbors");
        let op = DifferentialOperator::new(-0.3, 0.1, 0.4, 0.05, 0.4, 0.0);
        let k = assemble(&cloud, &table, &op).expect("assemble");

        for i in 0..cloud.len() {
            let row = k.row(i);
            if cloud.is_boundary(i) {
                assert_eq!(row[i], 1.0);
                assert_eq!(row.iter().filter(|v| **v != 0.0).count(), 1);
            } else {
                assert!(row.sum().abs() < 1e-9 * row.amax());
            }
        }
    }

    #[cfg(feature = "timing")]
    #[test]
    fn local_fits_count_as_assembly_only() {
        use crate::numerics::timing::{finalize_timing, reset_timing};

        let cloud = unit_square_cloud(5);
        let table = NeighborConfig::default().build(&cloud).expect("neighbors");
        reset_timing();
        assemble(&cloud, &table, &DifferentialOperator::laplacian()).expect("assemble");
        let stats = finalize_timing(std::time::Duration::ZERO);
        assert_eq!(stats.assembly_times.len(), 1);
        assert!(stats.pseudo_inverse_times.is_empty());
    }

    #[test]
    fn node_without_neighbors_gives_zero_row() {
        let cloud = PointCloud::new(vec![
            Node::new(0.0, 0.0, BoundaryTag::Interior),
            Node::new(1.0, 0.0, BoundaryTag::Dirichlet),
        ]);
        let table = NeighborTable::empty(2, 4);
        let k = assemble(&cloud, &table, &DifferentialOperator::laplacian()).expect("assemble");
        assert_eq!(k.row(0).iter().filter(|v| **v != 0.0).count(), 0);
        assert_eq!(k[(1, 1)], 1.0);
    }

    #[test]
    fn rhs_splits_boundary_and_interior() {
        let cloud = unit_square_cloud(3);
        let phi = (|p: glam::DVec2| p.x + 10.0).into_space_fn();
        let f = (-1.0_f64).into_space_fn();
        let r = rhs(
            &cloud,
            &cloud.interior_indices(),
            &cloud.boundary_indices(),
            &phi,
            &f,
        );
        assert_eq!(r[4], -1.0);
        assert_eq!(r[2], 11.0);
        assert_eq!(r[0], 10.0);
    }
}

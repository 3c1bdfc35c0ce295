use nalgebra::DMatrix;

use super::{NeighborTable, radius_from_nearest, rank_candidates};
use crate::discretization::cloud::PointCloud;

/// Same selection as the exhaustive search, driven by a single N×N matrix of
/// squared distances. The diagonal is set to infinity so a node never sees
/// itself.
pub(super) fn search(cloud: &PointCloud, k: usize) -> NeighborTable {
    let n = cloud.len();
    let mut distances = DMatrix::from_fn(n, n, |i, j| cloud.distance_squared(i, j));
    distances.fill_diagonal(f64::INFINITY);

    let radius = radius_from_nearest(distances.row_iter().map(|row| row.min()));
    log::debug!("Vectorized search cutoff radius {radius:.6e}");

    let mut table = NeighborTable::empty(n, k);
    for (i, row) in distances.row_iter().enumerate() {
        let candidates = row
            .iter()
            .enumerate()
            .filter(|(_, d2)| d2.is_finite())
            .map(|(j, &d2)| (d2, j))
            .collect();
        table.set_row(i, rank_candidates(candidates, radius, k));
    }
    table
}

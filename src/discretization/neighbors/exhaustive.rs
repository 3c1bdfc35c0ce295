use super::{NeighborTable, cutoff_radius, rank_candidates};
use crate::discretization::cloud::PointCloud;

/// Reference search: every node against every other node.
pub(super) fn search(cloud: &PointCloud, k: usize) -> NeighborTable {
    let n = cloud.len();
    let radius = cutoff_radius(cloud);
    log::debug!("Exhaustive search cutoff radius {radius:.6e}");

    let mut table = NeighborTable::empty(n, k);
    for i in 0..n {
        let mut candidates = Vec::new();
        for j in 0..n {
            if i != j {
                candidates.push((cloud.distance_squared(i, j), j));
            }
        }
        table.set_row(i, rank_candidates(candidates, radius, k));
    }
    table
}

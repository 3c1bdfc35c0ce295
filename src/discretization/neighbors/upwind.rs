use glam::DVec2;
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;

use super::{NeighborTable, cutoff_radius, fill_row, rank_candidates};
use crate::discretization::cloud::PointCloud;
use crate::error::Result;

/// Advection-aware search. A candidate `j` qualifies for node `i` only if
/// `(p_j - p_i) · direction < 0`, i.e. it lies strictly upstream. The radius
/// is the one of the whole cloud.
///
/// Each row is an independent task on a pool of `workers` threads writing
/// into its own slice of the table.
pub(super) fn search(
    cloud: &PointCloud,
    direction: DVec2,
    k: usize,
    workers: usize,
) -> Result<NeighborTable> {
    let radius = cutoff_radius(cloud);
    log::debug!(
        "Upwind search cutoff radius {radius:.6e}, direction ({:.3e}, {:.3e}), {} workers",
        direction.x,
        direction.y,
        workers.max(1)
    );

    let pool = ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build()?;

    let mut table = NeighborTable::empty(cloud.len(), k);
    pool.install(|| {
        table
            .slots
            .par_chunks_mut(k)
            .enumerate()
            .for_each(|(i, row)| fill_row(row, upstream_of(cloud, i, direction, radius, k)));
    });
    Ok(table)
}

fn upstream_of(
    cloud: &PointCloud,
    i: usize,
    direction: DVec2,
    radius: f64,
    k: usize,
) -> impl Iterator<Item = usize> {
    let center = cloud.position(i);
    let candidates = (0..cloud.len())
        .filter(|&j| j != i && (cloud.position(j) - center).dot(direction) < 0.0)
        .map(|j| (cloud.distance_squared(i, j), j))
        .collect();
    rank_candidates(candidates, radius, k)
}

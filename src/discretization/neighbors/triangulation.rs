use std::collections::BTreeSet;

use super::NeighborTable;
use crate::discretization::cloud::{PointCloud, Triangulation};
use crate::error::Result;

/// Neighbors are the nodes sharing at least one triangle with the central
/// node, in ascending id order, cut to `k`. No distance filter.
pub(super) fn search(
    cloud: &PointCloud,
    triangulation: &Triangulation,
    k: usize,
) -> Result<NeighborTable> {
    let n = cloud.len();
    triangulation.check_nodes(n)?;
    let mut adjacency: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); n];
    for tri in triangulation.triangles() {
        for &a in tri {
            for &b in tri {
                if a != b {
                    adjacency[a].insert(b);
                }
            }
        }
    }

    let mut table = NeighborTable::empty(n, k);
    for (i, adjacent) in adjacency.into_iter().enumerate() {
        table.set_row(i, adjacent);
    }
    Ok(table)
}

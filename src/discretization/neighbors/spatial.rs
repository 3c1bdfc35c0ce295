use rstar::{AABB, PointDistance, RTree, RTreeObject};

use super::{NeighborTable, radius_from_nearest, rank_candidates};
use crate::discretization::cloud::PointCloud;

/// R-tree entry: a node position and its id in the cloud.
#[derive(Clone, Copy, Debug)]
struct NodeEntry {
    position: [f64; 2],
    index: usize,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.position[0] - point[0];
        let dy = self.position[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Radius queries against an R-tree. Candidate distances are re-read from
/// the cloud so ranking matches the exhaustive search bit for bit.
pub(super) fn search(cloud: &PointCloud, k: usize) -> NeighborTable {
    let n = cloud.len();
    let entries: Vec<NodeEntry> = cloud
        .nodes()
        .iter()
        .enumerate()
        .map(|(index, node)| NodeEntry {
            position: node.position.to_array(),
            index,
        })
        .collect();
    let tree = RTree::bulk_load(entries);

    let radius = radius_from_nearest((0..n).map(|i| {
        let query = cloud.position(i).to_array();
        tree.nearest_neighbor_iter(&query)
            .find(|entry| entry.index != i)
            .map_or(f64::INFINITY, |entry| cloud.distance_squared(i, entry.index))
    }));
    log::debug!("Spatial index search cutoff radius {radius:.6e}");

    // Slightly widened query; the strict cutoff is applied in `rank_candidates`.
    let query_radius_2 = radius * radius * (1.0 + 1e-9);

    let mut table = NeighborTable::empty(n, k);
    for i in 0..n {
        let query = cloud.position(i).to_array();
        let candidates = tree
            .locate_within_distance(query, query_radius_2)
            .filter(|entry| entry.index != i)
            .map(|entry| (cloud.distance_squared(i, entry.index), entry.index))
            .collect();
        table.set_row(i, rank_candidates(candidates, radius, k));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discretization::generator::unit_square_cloud;
    use crate::discretization::neighbors::exhaustive;

    #[test]
    fn matches_exhaustive_on_a_grid() {
        let cloud = unit_square_cloud(7);
        assert_eq!(search(&cloud, 8), exhaustive::search(&cloud, 8));
        assert_eq!(search(&cloud, 3), exhaustive::search(&cloud, 3));
    }
}

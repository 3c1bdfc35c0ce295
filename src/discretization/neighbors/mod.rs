//! Per-node neighbor discovery.
//!
//! Every strategy produces a [`NeighborTable`]: one fixed-width row per node,
//! live neighbor ids packed at the front, `None` marking absent slots. The
//! radius-based strategies (exhaustive, vectorized, spatial index, upwind)
//! share the same cutoff rule and the same ordering (squared distance, then
//! node index), so they agree exactly on a given cloud.

mod exhaustive;
mod spatial;
mod triangulation;
mod upwind;
mod vectorized;

use glam::DVec2;
use log::{debug, info};

use super::cloud::{PointCloud, Triangulation};
use crate::error::{GfdError, Result};
use crate::physics::DifferentialOperator;

/// The cutoff radius is this factor times the largest nearest-neighbor
/// distance found in the cloud.
pub const CUTOFF_FACTOR: f64 = 1.5;

/// Default number of neighbor slots per node.
pub const DEFAULT_MAX_NEIGHBORS: usize = 8;

/// Fixed-width neighbor rows for every node of a cloud.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NeighborTable {
    n_nodes: usize,
    width: usize,
    slots: Vec<Option<usize>>,
}

impl NeighborTable {
    pub(crate) fn empty(n_nodes: usize, width: usize) -> Self {
        Self {
            n_nodes,
            width,
            slots: vec![None; n_nodes * width],
        }
    }

    /// Number of rows (nodes).
    pub fn len(&self) -> usize {
        self.n_nodes
    }

    pub fn is_empty(&self) -> bool {
        self.n_nodes == 0
    }

    /// Number of slots per row.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn row(&self, i: usize) -> &[Option<usize>] {
        &self.slots[i * self.width..(i + 1) * self.width]
    }

    /// Live neighbor ids of node `i`, in stored order.
    pub fn neighbors(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        self.row(i).iter().map_while(|slot| *slot)
    }

    pub fn count(&self, i: usize) -> usize {
        self.neighbors(i).count()
    }

    /// Rows without a single live neighbor.
    pub fn empty_rows(&self) -> usize {
        (0..self.n_nodes).filter(|&i| self.count(i) == 0).count()
    }

    pub(crate) fn set_row(&mut self, i: usize, ids: impl IntoIterator<Item = usize>) {
        let width = self.width;
        fill_row(&mut self.slots[i * width..(i + 1) * width], ids);
    }
}

pub(crate) fn fill_row(row: &mut [Option<usize>], ids: impl IntoIterator<Item = usize>) {
    row.fill(None);
    for (slot, id) in row.iter_mut().zip(ids) {
        *slot = Some(id);
    }
}

/// Execution strategy for plain point-cloud search. All three return the
/// same table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CloudSearch {
    /// Pairwise loops over every node. O(N²) reference implementation.
    Exhaustive,
    /// One batched N×N distance matrix.
    #[default]
    Vectorized,
    /// R-tree radius queries.
    SpatialIndex,
}

/// How neighbors are chosen. Exactly one family per problem.
#[derive(Clone, Debug)]
pub enum NeighborSearch {
    Cloud(CloudSearch),
    /// Only nodes lying strictly upstream of `direction` qualify. Rows are
    /// computed on a pool of `workers` threads.
    Upwind { direction: DVec2, workers: usize },
    /// Nodes sharing a triangle with the central node.
    Triangulation(Triangulation),
}

impl Default for NeighborSearch {
    fn default() -> Self {
        NeighborSearch::Cloud(CloudSearch::default())
    }
}

impl NeighborSearch {
    /// Upwind search for the operator's transport. In `u_t = L u` the flow
    /// velocity is `(-D, -E)`.
    pub fn upwind_for(operator: &DifferentialOperator, workers: usize) -> Self {
        NeighborSearch::Upwind {
            direction: DVec2::new(-operator.d, -operator.e),
            workers,
        }
    }

    /// Resolve a flag-style request. Triangulation and advection are mutually
    /// exclusive; asking for both is an error.
    pub fn from_request(
        triangulation: Option<Triangulation>,
        advection: Option<(DVec2, usize)>,
        cloud: CloudSearch,
    ) -> Result<Self> {
        match (triangulation, advection) {
            (Some(_), Some(_)) => Err(GfdError::ConflictingSearch),
            (Some(tri), None) => Ok(NeighborSearch::Triangulation(tri)),
            (None, Some((direction, workers))) => {
                Ok(NeighborSearch::Upwind { direction, workers })
            }
            (None, None) => Ok(NeighborSearch::Cloud(cloud)),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            NeighborSearch::Cloud(CloudSearch::Exhaustive) => "exhaustive",
            NeighborSearch::Cloud(CloudSearch::Vectorized) => "vectorized",
            NeighborSearch::Cloud(CloudSearch::SpatialIndex) => "spatial index",
            NeighborSearch::Upwind { .. } => "upwind",
            NeighborSearch::Triangulation(_) => "triangulation",
        }
    }
}

#[derive(Clone, Debug)]
pub struct NeighborConfig {
    pub max_neighbors: usize,
    pub search: NeighborSearch,
}

impl Default for NeighborConfig {
    fn default() -> Self {
        Self {
            max_neighbors: DEFAULT_MAX_NEIGHBORS,
            search: NeighborSearch::default(),
        }
    }
}

impl NeighborConfig {
    pub fn new(max_neighbors: usize, search: NeighborSearch) -> Self {
        Self {
            max_neighbors,
            search,
        }
    }

    /// Run the configured search over `cloud`.
    pub fn build(&self, cloud: &PointCloud) -> Result<NeighborTable> {
        let k = self.max_neighbors;
        info!(
            "Neighbor search: {} strategy, {} nodes, up to {} neighbors",
            self.search.label(),
            cloud.len(),
            k
        );
        if k == 0 || cloud.is_empty() {
            return Ok(NeighborTable::empty(cloud.len(), k));
        }

        let table = match &self.search {
            NeighborSearch::Cloud(CloudSearch::Exhaustive) => exhaustive::search(cloud, k),
            NeighborSearch::Cloud(CloudSearch::Vectorized) => vectorized::search(cloud, k),
            NeighborSearch::Cloud(CloudSearch::SpatialIndex) => spatial::search(cloud, k),
            NeighborSearch::Upwind { direction, workers } => {
                upwind::search(cloud, *direction, k, *workers)?
            }
            NeighborSearch::Triangulation(tri) => triangulation::search(cloud, tri, k)?,
        };

        debug!("{} nodes ended with an empty stencil", table.empty_rows());
        Ok(table)
    }
}

/// Cutoff radius of the cloud, brute force.
pub fn cutoff_radius(cloud: &PointCloud) -> f64 {
    let n = cloud.len();
    radius_from_nearest((0..n).map(|i| {
        (0..n)
            .filter(|&j| j != i)
            .map(|j| cloud.distance_squared(i, j))
            .fold(f64::INFINITY, f64::min)
    }))
}

/// `CUTOFF_FACTOR` times the largest nearest-neighbor distance, given each
/// node's squared nearest distance. Nodes with nobody else around (a
/// one-node cloud) are ignored.
pub(crate) fn radius_from_nearest(nearest_squared: impl Iterator<Item = f64>) -> f64 {
    let max_squared = nearest_squared
        .filter(|d2| d2.is_finite())
        .fold(0.0, f64::max);
    CUTOFF_FACTOR * max_squared.sqrt()
}

/// Keep candidates strictly inside `radius`, order them by squared distance
/// then index, and return the first `k` ids.
pub(crate) fn rank_candidates(
    mut candidates: Vec<(f64, usize)>,
    radius: f64,
    k: usize,
) -> impl Iterator<Item = usize> {
    candidates.retain(|(d2, _)| d2.sqrt() < radius);
    candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    candidates.into_iter().take(k).map(|(_, j)| j)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discretization::cloud::{BoundaryTag, Node};
    use crate::discretization::generator::{square_grid_triangulation, unit_square_cloud};

    #[test]
    fn rows_are_packed_and_padded() {
        let mut table = NeighborTable::empty(2, 4);
        table.set_row(0, [3, 1]);
        assert_eq!(table.row(0), &[Some(3), Some(1), None, None]);
        assert_eq!(table.neighbors(0).collect::<Vec<_>>(), vec![3, 1]);
        assert_eq!(table.count(1), 0);
        assert_eq!(table.empty_rows(), 1);

        table.set_row(1, 0..10);
        assert_eq!(table.count(1), 4);
    }

    #[test]
    fn cutoff_is_one_and_a_half_spacings_on_a_grid() {
        let cloud = unit_square_cloud(5);
        let radius = cutoff_radius(&cloud);
        assert!((radius - 1.5 * 0.25).abs() < 1e-12);
    }

    #[test]
    fn single_node_has_no_neighbors() {
        let cloud = PointCloud::new(vec![Node::new(0.3, 0.3, BoundaryTag::Interior)]);
        let table = NeighborConfig::default().build(&cloud).expect("search");
        assert_eq!(table.empty_rows(), 1);
    }

    #[test]
    fn triangulation_and_advection_conflict() {
        let tri = square_grid_triangulation(3).expect("triangulation");
        let err = NeighborSearch::from_request(
            Some(tri.clone()),
            Some((DVec2::X, 2)),
            CloudSearch::Vectorized,
        )
        .unwrap_err();
        assert!(matches!(err, GfdError::ConflictingSearch));

        let search = NeighborSearch::from_request(Some(tri), None, CloudSearch::Vectorized)
            .expect("triangulation only");
        assert!(matches!(search, NeighborSearch::Triangulation(_)));

        let search = NeighborSearch::from_request(None, None, CloudSearch::SpatialIndex)
            .expect("plain cloud");
        assert!(matches!(
            search,
            NeighborSearch::Cloud(CloudSearch::SpatialIndex)
        ));
    }

    #[test]
    fn upwind_direction_is_the_flow_velocity() {
        // u_t = ν Δu - 0.3 u_x - 0.2 u_y transports along (0.3, 0.2).
        let op = DifferentialOperator::new(-0.3, -0.2, 0.2, 0.0, 0.2, 0.0);
        match NeighborSearch::upwind_for(&op, 3) {
            NeighborSearch::Upwind { direction, workers } => {
                assert_eq!(direction, DVec2::new(0.3, 0.2));
                assert_eq!(workers, 3);
            }
            other => panic!("unexpected strategy {other:?}"),
        }
    }

    #[test]
    fn interior_grid_node_sees_its_eight_ring() {
        let cloud = unit_square_cloud(5);
        let table = NeighborConfig::default().build(&cloud).expect("search");
        let mut ring: Vec<usize> = table.neighbors(12).collect();
        ring.sort_unstable();
        assert_eq!(ring, vec![6, 7, 8, 11, 13, 16, 17, 18]);
        // Axis neighbors come before diagonals.
        let first_four: Vec<usize> = table.neighbors(12).take(4).collect();
        assert_eq!(first_four, vec![7, 11, 13, 17]);
    }
}

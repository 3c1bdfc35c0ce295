use glam::DVec2;

use crate::error::{GfdError, Result};

/// Classification of a node, controlling whether its row in the global
/// operator encodes the PDE or a prescribed value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoundaryTag {
    Interior,
    Dirichlet,
    /// Second boundary family. Treated exactly like `Dirichlet` by the solvers.
    Alternate,
}

impl BoundaryTag {
    pub fn is_boundary(self) -> bool {
        !matches!(self, BoundaryTag::Interior)
    }

    pub fn code(self) -> u8 {
        match self {
            BoundaryTag::Interior => 0,
            BoundaryTag::Dirichlet => 1,
            BoundaryTag::Alternate => 2,
        }
    }
}

impl TryFrom<u8> for BoundaryTag {
    type Error = u8;

    fn try_from(code: u8) -> std::result::Result<Self, Self::Error> {
        match code {
            0 => Ok(BoundaryTag::Interior),
            1 => Ok(BoundaryTag::Dirichlet),
            2 => Ok(BoundaryTag::Alternate),
            other => Err(other),
        }
    }
}

/// A single node of the cloud.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
    pub position: DVec2,
    pub tag: BoundaryTag,
}

impl Node {
    pub fn new(x: f64, y: f64, tag: BoundaryTag) -> Self {
        Self {
            position: DVec2::new(x, y),
            tag,
        }
    }
}

/// Ordered set of nodes. The index of a node is its identity everywhere
/// downstream (neighbor tables, matrix rows, solution entries).
#[derive(Clone, Debug)]
pub struct PointCloud {
    nodes: Vec<Node>,
}

impl PointCloud {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Build a cloud from `(x, y, tag)` rows, the layout used by point files.
    pub fn from_rows(rows: &[[f64; 3]]) -> Result<Self> {
        let nodes = rows
            .iter()
            .enumerate()
            .map(|(node, &[x, y, tag])| {
                let code = tag as u8;
                if f64::from(code) != tag {
                    return Err(GfdError::InvalidBoundaryTag { node, tag });
                }
                let tag = BoundaryTag::try_from(code)
                    .map_err(|_| GfdError::InvalidBoundaryTag { node, tag })?;
                Ok(Node::new(x, y, tag))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { nodes })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, i: usize) -> &Node {
        &self.nodes[i]
    }

    pub fn position(&self, i: usize) -> DVec2 {
        self.nodes[i].position
    }

    pub fn is_boundary(&self, i: usize) -> bool {
        self.nodes[i].tag.is_boundary()
    }

    pub fn interior_indices(&self) -> Vec<usize> {
        (0..self.len()).filter(|&i| !self.is_boundary(i)).collect()
    }

    pub fn boundary_indices(&self) -> Vec<usize> {
        (0..self.len()).filter(|&i| self.is_boundary(i)).collect()
    }

    /// Squared distance between two nodes. Every search strategy goes through
    /// this so that they all see bit-identical values.
    #[inline]
    pub fn distance_squared(&self, i: usize, j: usize) -> f64 {
        squared_distance(self.nodes[i].position, self.nodes[j].position)
    }
}

#[inline]
pub(crate) fn squared_distance(a: DVec2, b: DVec2) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dx * dx + dy * dy
}

/// Triangles over the nodes of a [`PointCloud`].
#[derive(Clone, Debug)]
pub struct Triangulation {
    triangles: Vec<[usize; 3]>,
}

impl Triangulation {
    pub fn new(triangles: Vec<[usize; 3]>, n_nodes: usize) -> Result<Self> {
        let triangulation = Self { triangles };
        triangulation.check_nodes(n_nodes)?;
        Ok(triangulation)
    }

    /// Fails on the first triangle vertex that is not a node of an
    /// `n_nodes`-node cloud.
    pub fn check_nodes(&self, n_nodes: usize) -> Result<()> {
        for (triangle, tri) in self.triangles.iter().enumerate() {
            if let Some(&node) = tri.iter().find(|&&v| v >= n_nodes) {
                return Err(GfdError::TriangleIndexOutOfRange {
                    triangle,
                    node,
                    n_nodes,
                });
            }
        }
        Ok(())
    }

    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_with_valid_tags_parse() {
        let cloud = PointCloud::from_rows(&[[0.0, 0.0, 1.0], [0.5, 0.5, 0.0], [1.0, 0.0, 2.0]])
            .expect("valid rows");
        assert_eq!(cloud.len(), 3);
        assert_eq!(cloud.node(2).tag, BoundaryTag::Alternate);
        assert_eq!(cloud.interior_indices(), vec![1]);
        assert_eq!(cloud.boundary_indices(), vec![0, 2]);
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let err = PointCloud::from_rows(&[[0.0, 0.0, 0.0], [1.0, 1.0, 3.0]]).unwrap_err();
        assert!(matches!(err, GfdError::InvalidBoundaryTag { node: 1, .. }));

        let err = PointCloud::from_rows(&[[0.0, 0.0, 0.5]]).unwrap_err();
        assert!(matches!(err, GfdError::InvalidBoundaryTag { node: 0, .. }));
    }

    #[test]
    fn triangle_indices_are_checked() {
        assert!(Triangulation::new(vec![[0, 1, 2]], 3).is_ok());
        let err = Triangulation::new(vec![[0, 1, 2], [1, 2, 3]], 3).unwrap_err();
        assert!(matches!(
            err,
            GfdError::TriangleIndexOutOfRange {
                triangle: 1,
                node: 3,
                n_nodes: 3
            }
        ));
    }
}

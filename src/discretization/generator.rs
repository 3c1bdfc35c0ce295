//! Simple clouds and triangulations over the unit square, used by the demo
//! binary, tests and benchmarks. Real problems bring their own point sets.

use glam::DVec2;

use super::cloud::{BoundaryTag, Node, PointCloud, Triangulation};
use crate::error::Result;

/// Regular `n × n` nodes on `[0, 1]²`, row-major with `x` varying fastest.
/// Nodes on the hull are tagged `Dirichlet`.
pub fn unit_square_cloud(n: usize) -> PointCloud {
    jittered_square_cloud(n, |_| DVec2::ZERO)
}

/// Same layout as [`unit_square_cloud`] with every interior node shifted by
/// `jitter(index)`. The hull stays on the square.
pub fn jittered_square_cloud(n: usize, mut jitter: impl FnMut(usize) -> DVec2) -> PointCloud {
    let h = 1.0 / (n.max(2) - 1) as f64;
    let mut nodes = Vec::with_capacity(n * n);

    for j in 0..n {
        for i in 0..n {
            let index = j * n + i;
            let on_hull = i == 0 || j == 0 || i + 1 == n || j + 1 == n;
            let base = DVec2::new(i as f64 * h, j as f64 * h);
            let node = if on_hull {
                Node {
                    position: base,
                    tag: BoundaryTag::Dirichlet,
                }
            } else {
                Node {
                    position: base + jitter(index) * h,
                    tag: BoundaryTag::Interior,
                }
            };
            nodes.push(node);
        }
    }

    PointCloud::new(nodes)
}

/// Two triangles per grid square, matching the node order of
/// [`unit_square_cloud`].
pub fn square_grid_triangulation(n: usize) -> Result<Triangulation> {
    let mut triangles = Vec::with_capacity(2 * n.saturating_sub(1).pow(2));
    for j in 0..n.saturating_sub(1) {
        for i in 0..n - 1 {
            let a = j * n + i;
            let b = a + 1;
            let c = a + n;
            let d = c + 1;
            triangles.push([a, b, d]);
            triangles.push([a, d, c]);
        }
    }
    Triangulation::new(triangles, n * n)
}

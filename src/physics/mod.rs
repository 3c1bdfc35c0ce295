pub mod functions;
pub mod problem;

use nalgebra::Vector5;

/// Linear second-order operator
/// `Lu = A u_xx + B u_xy + C u_yy + D u_x + E u_y + F u`.
///
/// The coefficients are the moment targets of the local stencil fit: the
/// weights `γ_j` of a node satisfy `Σγ dx = D`, `Σγ dy = E`, `Σγ dx² = A`,
/// `Σγ dx dy = B` and `Σγ dy² = C`, so the discrete operator reproduces
/// `D u_x + E u_y + (A/2) u_xx + B u_xy + (C/2) u_yy` on quadratics and
/// `(0, 0, 2, 0, 2, 0)` is the Laplacian.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DifferentialOperator {
    pub d: f64,
    pub e: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    /// Zeroth-order coefficient. Not part of the five-term local basis and
    /// currently ignored by the stencil fit.
    pub f: f64,
}

impl Default for DifferentialOperator {
    fn default() -> Self {
        Self::laplacian()
    }
}

impl DifferentialOperator {
    pub fn new(d: f64, e: f64, a: f64, b: f64, c: f64, f: f64) -> Self {
        Self { d, e, a, b, c, f }
    }

    /// From `[D, E, A, B, C, F]`.
    pub fn from_array([d, e, a, b, c, f]: [f64; 6]) -> Self {
        Self { d, e, a, b, c, f }
    }

    pub fn to_array(&self) -> [f64; 6] {
        [self.d, self.e, self.a, self.b, self.c, self.f]
    }

    pub fn laplacian() -> Self {
        Self::new(0.0, 0.0, 2.0, 0.0, 2.0, 0.0)
    }

    /// Every coefficient multiplied by `factor` (time-step scaling).
    pub fn scaled(&self, factor: f64) -> Self {
        let [d, e, a, b, c, f] = self.to_array().map(|v| v * factor);
        Self { d, e, a, b, c, f }
    }

    /// `(D, E, A, B, C)`, the right-hand side of the local fit.
    pub fn moments(&self) -> Vector5<f64> {
        Vector5::new(self.d, self.e, self.a, self.b, self.c)
    }

    pub fn has_zeroth_order(&self) -> bool {
        self.f != 0.0
    }
}

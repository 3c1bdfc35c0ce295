pub mod linalg;
pub mod solver;
pub mod stencil;
pub mod timing;
pub mod transient;

pub use solver::{StationaryResult, StationarySolver};
pub use transient::{ThetaUpdate, TimeScheme, TransientResult, TransientSolver};

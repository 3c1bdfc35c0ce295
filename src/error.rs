use thiserror::Error;

#[derive(Debug, Error)]
pub enum GfdError {
    #[error("node {node} has boundary tag {tag}, expected 0, 1 or 2")]
    InvalidBoundaryTag { node: usize, tag: f64 },
    #[error("triangle {triangle} references node {node}, but the cloud has {n_nodes} nodes")]
    TriangleIndexOutOfRange {
        triangle: usize,
        node: usize,
        n_nodes: usize,
    },
    #[error("triangulation and advection-directional neighbor search cannot be combined")]
    ConflictingSearch,
    #[error("at least 2 time levels are required, got {0}")]
    TooFewLevels(usize),
    #[error("theta parameter must lie in [0, 1], got {0}")]
    InvalidTheta(f64),
    #[error("second-order-in-time problems need an initial velocity function")]
    MissingVelocity,
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("pseudoinverse failed: {0}")]
    Pseudoinverse(&'static str),
}

pub type Result<T> = std::result::Result<T, GfdError>;

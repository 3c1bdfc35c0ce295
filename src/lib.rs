//! Meshless Generalized Finite Differences (GFD) for linear second-order
//! PDEs on scattered 2D point clouds.
//!
//! The pipeline is: [`discretization::neighbors`] builds a neighbor table,
//! [`numerics::stencil`] fits local least-squares weights and assembles the
//! global operator, then [`numerics::solver`] (stationary) or
//! [`numerics::transient`] (first- and second-order in time) produce the
//! solution fields.

pub mod discretization;
pub mod error;
pub mod models;
pub mod numerics;
pub mod physics;
pub mod processing;

pub use error::{GfdError, Result};

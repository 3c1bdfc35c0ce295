//! Manufactured problems with closed-form solutions, used by the demo
//! binary, the benchmarks and the verification tests.

pub mod stationary;
pub mod transient;

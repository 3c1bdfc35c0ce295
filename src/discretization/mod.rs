pub mod cloud;
pub mod generator;
pub mod neighbors;

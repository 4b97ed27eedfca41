//! Particle-based fluid simulation (SPH).

mod config;
mod grid;
pub mod kernel;
mod particle;
mod solver;

pub use config::SphConfig;
pub use grid::SpatialHashGrid;
pub use particle::ParticleData;
pub use solver::SphSolver;

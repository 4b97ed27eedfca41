use crate::math::Vec3;

/// Per-particle fluid state, refreshed by every SPH pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleData {
    pub density: f32,
    pub near_density: f32,
    /// Pressure derived from `density` on the last density pass
    pub pressure: f32,
    pub smoothing_length: f32,
    pub viscosity: f32,
    /// Body position captured when the grid was rebuilt
    pub position: Vec3,
}

impl Default for ParticleData {
    fn default() -> Self {
        Self {
            density: 1.0,
            near_density: 1.0,
            pressure: 1.0,
            smoothing_length: 1.0,
            viscosity: 0.1,
            position: Vec3::ZERO,
        }
    }
}

mod vec3;

pub use vec3::{GridCell, Vec3};

/// Common math constants
pub mod consts {
    /// A small epsilon value for floating point comparisons
    pub const EPSILON: f32 = 1e-6;

    pub const PI: f32 = std::f32::consts::PI;
}

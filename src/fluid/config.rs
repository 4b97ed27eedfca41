use crate::error::{PhysicsError, Result};

/// Tuning of the SPH fluid solver.
///
/// Owned by the world and read at the start of every fluid pass, so a new
/// configuration takes effect on the next step.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SphConfig {
    /// Kernel support radius, also the neighbour grid cell size
    pub smoothing_radius: f32,
    /// Rest density; denser regions push outwards
    pub target_density: f32,
    pub pressure_multiplier: f32,
    /// Scale of the short-range repulsion term; zero turns it off
    pub near_pressure_multiplier: f32,
    pub viscosity_strength: f32,
}

impl Default for SphConfig {
    fn default() -> Self {
        Self {
            smoothing_radius: 15.0,
            target_density: 50.0,
            pressure_multiplier: 25.0,
            near_pressure_multiplier: 0.0,
            viscosity_strength: 5000.0,
        }
    }
}

impl SphConfig {
    pub fn with_smoothing_radius(mut self, radius: f32) -> Self {
        self.smoothing_radius = radius;
        self
    }

    pub fn with_target_density(mut self, density: f32) -> Self {
        self.target_density = density;
        self
    }

    pub fn with_pressure_multiplier(mut self, multiplier: f32) -> Self {
        self.pressure_multiplier = multiplier;
        self
    }

    pub fn with_near_pressure_multiplier(mut self, multiplier: f32) -> Self {
        self.near_pressure_multiplier = multiplier;
        self
    }

    pub fn with_viscosity_strength(mut self, strength: f32) -> Self {
        self.viscosity_strength = strength;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.smoothing_radius.is_finite() && self.smoothing_radius > 0.0) {
            return Err(PhysicsError::InvalidConfig(
                "smoothing_radius must be positive and finite",
            ));
        }
        let finite = [
            self.target_density,
            self.pressure_multiplier,
            self.near_pressure_multiplier,
            self.viscosity_strength,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err(PhysicsError::InvalidConfig("SPH coefficients must be finite"));
        }
        Ok(())
    }

    /// Pressure produced by a deviation from the target density
    #[inline]
    pub fn density_to_pressure(&self, density: f32) -> f32 {
        (density - self.target_density) * self.pressure_multiplier
    }

    #[inline]
    pub fn near_density_to_pressure(&self, near_density: f32) -> f32 {
        near_density * self.near_pressure_multiplier
    }

    /// Pressure shared by two particles, from their densities
    #[inline]
    pub fn shared_pressure(&self, density_a: f32, density_b: f32) -> f32 {
        (self.density_to_pressure(density_a) + self.density_to_pressure(density_b)) * 0.5
    }

    #[inline]
    pub fn shared_near_pressure(&self, near_a: f32, near_b: f32) -> f32 {
        (self.near_density_to_pressure(near_a) + self.near_density_to_pressure(near_b)) * 0.5
    }
}

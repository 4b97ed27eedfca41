use crate::collision::OctreeConfig;
use crate::error::{PhysicsError, Result};
use crate::fluid::SphConfig;
use crate::math::Vec3;

/// Configuration for the physics world
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorldConfig {
    /// Force added to every moving body each step
    pub gravity: Vec3,
    /// Slots reserved up front for bodies and for colliders
    pub initial_capacity: usize,
    pub octree: OctreeConfig,
    pub sph: SphConfig,
    /// Resolve and report a pair once per step even if it shares several
    /// octree leaves
    pub deduplicate_pairs: bool,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -500.0, 0.0),
            initial_capacity: 100,
            octree: OctreeConfig::default(),
            sph: SphConfig::default(),
            deduplicate_pairs: true,
        }
    }
}

impl WorldConfig {
    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn with_octree(mut self, octree: OctreeConfig) -> Self {
        self.octree = octree;
        self
    }

    pub fn with_sph(mut self, sph: SphConfig) -> Self {
        self.sph = sph;
        self
    }

    pub fn with_deduplicate_pairs(mut self, deduplicate: bool) -> Self {
        self.deduplicate_pairs = deduplicate;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.gravity.is_finite() {
            return Err(PhysicsError::InvalidConfig("gravity must be finite"));
        }
        self.octree.validate()?;
        self.sph.validate()
    }
}

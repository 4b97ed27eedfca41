use crate::error::PhysicsError;
use crate::math::Vec3;
use crate::store::{Handle, Slot};

/// Handle to a body stored in a [`World`](crate::World)
pub type BodyRef = Handle<Body>;

/// How a body takes part in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BodyType {
    /// Moved by forces and contact impulses
    #[default]
    Dynamic,
    /// Never moves; acts as infinite mass in contacts
    Static,
    /// An SPH particle: integrated like a dynamic body and driven by the
    /// fluid solver. Fluid-fluid contacts are not generated.
    Fluid,
}

/// A point mass in the simulation.
///
/// A body is disabled when its mass is negative. Disabled bodies are free
/// slots of the world's storage and are skipped by every phase.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Where the body will be after one more step at its current velocity
    pub predicted_position: Vec3,
    pub mass: f32,
    pub body_type: BodyType,
    force: Vec3,
}

impl Default for Body {
    fn default() -> Self {
        Self::new(BodyType::Dynamic)
    }
}

impl Body {
    /// Creates an enabled body of unit mass at the origin
    pub fn new(body_type: BodyType) -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            predicted_position: Vec3::ZERO,
            mass: 1.0,
            body_type,
            force: Vec3::ZERO,
        }
    }

    /// Adds `force` to the accumulator consumed by the next integration
    #[inline]
    pub fn apply_force(&mut self, force: Vec3) {
        self.force += force;
    }

    /// Force accumulated since the last integration
    #[inline]
    pub fn force(&self) -> Vec3 {
        self.force
    }

    #[inline]
    pub fn reset_force(&mut self) {
        self.force = Vec3::ZERO;
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.mass >= 0.0
    }

    #[inline]
    pub fn enable(&mut self) {
        self.mass = 1.0;
    }

    #[inline]
    pub fn disable(&mut self) {
        self.mass = -1.0;
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.body_type == BodyType::Static
    }

    #[inline]
    pub fn is_fluid(&self) -> bool {
        self.body_type == BodyType::Fluid
    }

    /// Returns true if integration and contact impulses can move this body
    #[inline]
    pub fn is_movable(&self) -> bool {
        self.is_enabled() && !self.is_static()
    }

    /// Inverse mass seen by contacts; zero for static or massless bodies
    #[inline]
    pub fn inverse_mass(&self) -> f32 {
        if self.is_static() || self.mass <= 0.0 {
            0.0
        } else {
            1.0 / self.mass
        }
    }
}

impl Slot for Body {
    fn vacant() -> Self {
        let mut body = Self::default();
        body.disable();
        body
    }

    #[inline]
    fn is_vacant(&self) -> bool {
        !self.is_enabled()
    }

    fn vacate(&mut self) {
        *self = Self::vacant();
    }

    fn not_found(handle: Handle<Self>) -> PhysicsError {
        PhysicsError::BodyNotFound(handle)
    }
}

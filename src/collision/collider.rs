use std::fmt;

use crate::dynamics::BodyRef;
use crate::error::PhysicsError;
use crate::geometry::{Aabb, Shape};
use crate::math::Vec3;
use crate::store::{Handle, Slot};

/// Handle to a collider stored in a [`World`](crate::World)
pub type ColliderRef = Handle<Collider>;

/// Collision geometry attached to a body.
///
/// A collider whose `attached` flag is false is a free slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    pub shape: Shape,
    /// Owning body
    pub body: BodyRef,
    /// Owner position captured when the octree was last rebuilt
    pub body_position: Vec3,
    /// Bounciness in `[0, 1]`; combined per contact weighted by mass
    pub restitution: f32,
    /// Triggers report overlaps but are never pushed apart
    pub is_trigger: bool,
    attached: bool,
}

impl Collider {
    /// Creates an attached unit-sphere collider for `body`
    pub fn new(body: BodyRef) -> Self {
        Self {
            shape: Shape::default(),
            body,
            body_position: Vec3::ZERO,
            restitution: 1.0,
            is_trigger: false,
            attached: true,
        }
    }

    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn as_trigger(mut self) -> Self {
        self.is_trigger = true;
        self
    }

    /// False only for the free slots of a world's storage
    #[inline]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// World-space bounds at the cached body position
    #[inline]
    pub fn bounds(&self) -> Aabb {
        self.shape.world_aabb(self.body_position)
    }
}

impl Slot for Collider {
    fn vacant() -> Self {
        Self {
            attached: false,
            ..Self::new(Handle::new(u32::MAX, 0))
        }
    }

    #[inline]
    fn is_vacant(&self) -> bool {
        !self.attached
    }

    fn vacate(&mut self) {
        *self = Self::vacant();
    }

    fn not_found(handle: Handle<Self>) -> PhysicsError {
        PhysicsError::ColliderNotFound(handle)
    }
}

/// An unordered pair of colliders.
///
/// The smaller handle is always stored first so `(a, b)` and `(b, a)`
/// compare and hash the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderPair {
    /// First collider (always has the smaller handle)
    pub a: ColliderRef,
    /// Second collider (always has the larger handle)
    pub b: ColliderRef,
}

impl ColliderPair {
    /// Creates a new collider pair, ensuring consistent ordering
    pub fn new(a: ColliderRef, b: ColliderRef) -> Self {
        if a <= b {
            Self { a, b }
        } else {
            Self { a: b, b: a }
        }
    }

    #[inline]
    pub fn contains(&self, collider: ColliderRef) -> bool {
        self.a == collider || self.b == collider
    }
}

impl fmt::Display for ColliderPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.a, self.b)
    }
}

use thiserror::Error;

use crate::collision::ColliderRef;
use crate::dynamics::BodyRef;

/// Errors surfaced by the physics world.
///
/// Degenerate numeric situations (zero mass, coincident centers) are
/// handled where they occur and never show up here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PhysicsError {
    /// The handle is stale, out of range or names a freed slot
    #[error("no body found for handle {0}")]
    BodyNotFound(BodyRef),

    #[error("no collider found for handle {0}")]
    ColliderNotFound(ColliderRef),

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = std::result::Result<T, PhysicsError>;

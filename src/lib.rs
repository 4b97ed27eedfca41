//! # Octaphy
//!
//! A small real-time 3D physics engine written in Rust.
//!
//! ## Features
//!
//! - **Generational Storage**: bodies and colliders live in slot arenas and are
//!   addressed by handles that stop resolving once their slot is freed
//! - **Collision Shapes**: spheres and axis-aligned boxes
//! - **Broad Phase**: a depth-bounded octree rebuilt every step from a
//!   preallocated node pool
//! - **Contacts**: impulse-based bounce with mass-weighted restitution and
//!   positional correction
//! - **Triggers and Events**: enter/exit notifications through a
//!   [`ContactListener`](collision::ContactListener)
//! - **Fluids**: smoothed-particle hydrodynamics with a uniform hash grid for
//!   neighbour lookup
//!
//! ## Quick Start
//!
//! ```rust
//! use octaphy::prelude::*;
//!
//! let mut world = World::new(WorldConfig::default().with_gravity(Vec3::new(0.0, -9.81, 0.0)))?;
//!
//! // A static floor
//! let floor = world.create_body(BodyType::Static);
//! let floor_collider = world.create_collider(floor)?;
//! world.collider_mut(floor_collider)?.shape =
//!     Shape::cuboid(Vec3::new(-10.0, -1.0, -10.0), Vec3::new(10.0, 0.0, 10.0));
//!
//! // A bouncing ball
//! let ball = world.create_body(BodyType::Dynamic);
//! world.body_mut(ball)?.position = Vec3::new(0.0, 5.0, 0.0);
//! let ball_collider = world.create_collider(ball)?;
//! world.collider_mut(ball_collider)?.shape = Shape::sphere(0.5);
//!
//! let dt = 1.0 / 60.0;
//! for _ in 0..600 {
//!     world.update(dt)?;
//! }
//! println!("Ball position: {:?}", world.body(ball)?.position);
//! # Ok::<(), octaphy::PhysicsError>(())
//! ```

pub mod collision;
pub mod config;
pub mod dynamics;
mod error;
pub mod fluid;
pub mod geometry;
pub mod math;
pub mod store;
mod world;

pub use config::WorldConfig;
pub use error::{PhysicsError, Result};
pub use world::World;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::collision::{Collider, ColliderRef, ContactListener, OctreeConfig};
    pub use crate::config::WorldConfig;
    pub use crate::dynamics::{Body, BodyRef, BodyType};
    pub use crate::error::PhysicsError;
    pub use crate::fluid::{ParticleData, SphConfig};
    pub use crate::geometry::{Aabb, Cuboid, Shape, Sphere};
    pub use crate::math::Vec3;
    pub use crate::World;
}

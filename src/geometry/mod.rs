mod aabb;
mod shape;

pub use aabb::Aabb;
pub use shape::{cuboid_cuboid, cuboid_sphere, sphere_sphere, Cuboid, Shape, ShapeType, Sphere};

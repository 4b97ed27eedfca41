use crate::math::Vec3;

use super::aabb::Aabb;

/// The type of collision shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeType {
    Sphere,
    Cuboid,
}

/// A collision shape attached to a body through a collider.
///
/// Shapes are expressed relative to their body's position; there is no
/// rotation, so a cuboid always stays axis-aligned.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Shape {
    /// A sphere with a local center offset
    Sphere(Sphere),
    /// An axis-aligned box with local bounds
    Cuboid(Cuboid),
}

impl Default for Shape {
    fn default() -> Self {
        Self::Sphere(Sphere::default())
    }
}

impl Shape {
    /// Creates a sphere centered on its body
    #[inline]
    pub fn sphere(radius: f32) -> Self {
        Self::Sphere(Sphere::new(Vec3::ZERO, radius))
    }

    /// Creates a box from local-space bounds
    #[inline]
    pub fn cuboid(min: Vec3, max: Vec3) -> Self {
        Self::Cuboid(Cuboid::new(min, max))
    }

    /// Creates a box centered on its body from half-extents
    #[inline]
    pub fn cuboid_from_half_extents(half_extents: Vec3) -> Self {
        Self::Cuboid(Cuboid::new(-half_extents, half_extents))
    }

    #[inline]
    pub fn shape_type(&self) -> ShapeType {
        match self {
            Shape::Sphere(_) => ShapeType::Sphere,
            Shape::Cuboid(_) => ShapeType::Cuboid,
        }
    }

    /// Computes the AABB of this shape in local space
    #[inline]
    pub fn local_aabb(&self) -> Aabb {
        match self {
            Shape::Sphere(s) => s.aabb(),
            Shape::Cuboid(c) => c.aabb(),
        }
    }

    /// Computes the AABB of this shape for a body at `body_position`
    #[inline]
    pub fn world_aabb(&self, body_position: Vec3) -> Aabb {
        self.local_aabb().translated(body_position)
    }

    /// Returns this shape moved into world space
    #[inline]
    pub fn at(&self, body_position: Vec3) -> Self {
        match self {
            Shape::Sphere(s) => Shape::Sphere(s.at(body_position)),
            Shape::Cuboid(c) => Shape::Cuboid(c.at(body_position)),
        }
    }

    /// Exact overlap test between two shapes placed at their body positions.
    pub fn overlaps(&self, position: Vec3, other: &Shape, other_position: Vec3) -> bool {
        match (self.at(position), other.at(other_position)) {
            (Shape::Sphere(a), Shape::Sphere(b)) => sphere_sphere(a, b),
            (Shape::Cuboid(a), Shape::Cuboid(b)) => cuboid_cuboid(a, b),
            (Shape::Cuboid(a), Shape::Sphere(b)) | (Shape::Sphere(b), Shape::Cuboid(a)) => {
                cuboid_sphere(a, b)
            }
        }
    }
}

/// A sphere collision shape
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sphere {
    /// Center, relative to the owning body unless placed with [`Sphere::at`]
    pub center: Vec3,
    pub radius: f32,
}

impl Default for Sphere {
    fn default() -> Self {
        Self::new(Vec3::ZERO, 1.0)
    }
}

impl Sphere {
    /// Creates a sphere; a negative radius is stored as its absolute value
    #[inline]
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius: radius.abs(),
        }
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_half_extents(self.center, Vec3::splat(self.radius))
    }

    #[inline]
    pub fn at(&self, offset: Vec3) -> Self {
        Self {
            center: self.center + offset,
            radius: self.radius,
        }
    }

    #[inline]
    pub fn volume(&self) -> f32 {
        (4.0 / 3.0) * std::f32::consts::PI * self.radius * self.radius * self.radius
    }
}

/// An axis-aligned box collision shape
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cuboid {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Cuboid {
    fn default() -> Self {
        Self::new(Vec3::splat(-0.5), Vec3::splat(0.5))
    }
}

impl Cuboid {
    /// Creates a box from two opposite corners, in any order
    #[inline]
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.min, self.max)
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    #[inline]
    pub fn at(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Point of the box closest to `point`
    #[inline]
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min, self.max)
    }
}

/// Returns true if the spheres overlap or touch
#[inline]
pub fn sphere_sphere(a: Sphere, b: Sphere) -> bool {
    let reach = a.radius + b.radius;
    (a.center - b.center).length_squared() <= reach * reach
}

/// Returns true if the boxes overlap or touch
#[inline]
pub fn cuboid_cuboid(a: Cuboid, b: Cuboid) -> bool {
    a.aabb().intersects(b.aabb())
}

/// Returns true if the sphere overlaps or touches the box
#[inline]
pub fn cuboid_sphere(cuboid: Cuboid, sphere: Sphere) -> bool {
    let closest = cuboid.closest_point(sphere.center);
    (closest - sphere.center).length_squared() <= sphere.radius * sphere.radius
}

use crate::collision::Collider;
use crate::dynamics::{Body, BodyRef};
use crate::geometry::{Cuboid, Shape, Sphere};
use crate::math::Vec3;

/// One side of a potential contact
#[derive(Debug, Clone, Copy)]
pub struct ContactBody<'a> {
    pub body_ref: BodyRef,
    pub body: &'a Body,
    pub collider: &'a Collider,
}

/// A resolved overlap between two bodies.
///
/// Contacts are plain values: built by [`Contact::between`], applied with
/// [`Contact::resolve`] and dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub body_a: BodyRef,
    pub body_b: BodyRef,
    /// Separating direction, pointing from B towards A
    pub normal: Vec3,
    /// Overlap depth along `normal` (positive when overlapping)
    pub penetration: f32,
    /// Mass-weighted restitution of both colliders
    pub restitution: f32,
}

impl Contact {
    /// Builds the contact between two colliders at their bodies' current
    /// positions, or `None` if the shapes do not touch.
    ///
    /// A box paired with a sphere is handled with the operands swapped, so
    /// the returned contact then names the sphere's body as `body_a`.
    pub fn between(a: ContactBody<'_>, b: ContactBody<'_>) -> Option<Self> {
        let (pos_a, pos_b) = (a.body.position, b.body.position);
        if !a.collider.shape.overlaps(pos_a, &b.collider.shape, pos_b) {
            return None;
        }

        let (normal, penetration) = match (a.collider.shape.at(pos_a), b.collider.shape.at(pos_b)) {
            (Shape::Sphere(sa), Shape::Sphere(sb)) => sphere_sphere(sa, sb),
            (Shape::Sphere(sphere), Shape::Cuboid(cuboid)) => {
                sphere_cuboid(sphere, cuboid, a.body.velocity)
            }
            (Shape::Cuboid(ca), Shape::Cuboid(cb)) => cuboid_cuboid(ca, cb),
            (Shape::Cuboid(_), Shape::Sphere(_)) => return Self::between(b, a),
        };

        Some(Self {
            body_a: a.body_ref,
            body_b: b.body_ref,
            normal,
            penetration,
            restitution: combined_restitution(a, b),
        })
    }

    /// Velocity along the normal; positive when the bodies move apart
    #[inline]
    pub fn separating_velocity(&self, a: &Body, b: &Body) -> f32 {
        (a.velocity - b.velocity).dot(self.normal)
    }

    /// Applies the bounce impulse then pushes the bodies out of each other.
    ///
    /// `a` and `b` must be the bodies named by `body_a` and `body_b`.
    pub fn resolve(&self, a: &mut Body, b: &mut Body) {
        self.resolve_velocity(a, b);
        self.resolve_interpenetration(a, b);
    }

    fn resolve_velocity(&self, a: &mut Body, b: &mut Body) {
        let separating = self.separating_velocity(a, b);
        if separating > 0.0 {
            return;
        }

        let target = -separating * self.restitution;
        let delta_velocity = target - separating;

        let (inv_a, inv_b) = (a.inverse_mass(), b.inverse_mass());
        let total_inverse_mass = inv_a + inv_b;
        if total_inverse_mass <= 0.0 {
            return;
        }

        let impulse = self.normal * (delta_velocity / total_inverse_mass);
        a.velocity += impulse * inv_a;
        b.velocity -= impulse * inv_b;
    }

    fn resolve_interpenetration(&self, a: &mut Body, b: &mut Body) {
        if self.penetration <= 0.0 {
            return;
        }

        let (inv_a, inv_b) = (a.inverse_mass(), b.inverse_mass());
        let total_inverse_mass = inv_a + inv_b;
        if total_inverse_mass <= 0.0 {
            return;
        }

        let move_per_inverse_mass = self.normal * (self.penetration / total_inverse_mass);
        a.position += move_per_inverse_mass * inv_a;
        b.position -= move_per_inverse_mass * inv_b;
    }
}

fn combined_restitution(a: ContactBody<'_>, b: ContactBody<'_>) -> f32 {
    let (m1, m2) = (a.body.mass, b.body.mass);
    let (r1, r2) = (a.collider.restitution, b.collider.restitution);
    let total = m1 + m2;
    if total > 0.0 {
        (m1 * r1 + m2 * r2) / total
    } else {
        (r1 + r2) * 0.5
    }
}

fn sphere_sphere(a: Sphere, b: Sphere) -> (Vec3, f32) {
    let delta = a.center - b.center;
    let length = delta.length();
    let normal = if length > 0.0 { delta / length } else { Vec3::Y };
    (normal, a.radius + b.radius - length)
}

/// Falls back to the reverse of the sphere's velocity when its center lies
/// inside the box; that is zero for a sphere at rest.
fn sphere_cuboid(sphere: Sphere, cuboid: Cuboid, sphere_velocity: Vec3) -> (Vec3, f32) {
    let delta = sphere.center - cuboid.closest_point(sphere.center);
    let distance = delta.length();
    let normal = if distance > 0.0 {
        delta / distance
    } else {
        -sphere_velocity.normalize()
    };
    (normal, sphere.radius - distance)
}

/// Minimum-overlap axis; X wins only when strictly smallest, then Y over Z.
fn cuboid_cuboid(a: Cuboid, b: Cuboid) -> (Vec3, f32) {
    let delta = a.center() - b.center();
    let overlap = a.half_extents() + b.half_extents() - delta.abs();

    let axis = if overlap.x < overlap.y && overlap.x < overlap.z {
        0
    } else if overlap.y < overlap.z {
        1
    } else {
        2
    };

    let sign = if delta.axis(axis) > 0.0 { 1.0 } else { -1.0 };
    (Vec3::unit(axis) * sign, overlap.axis(axis))
}

use crate::math::Vec3;

use super::body::Body;

/// Advances one body by `dt` with semi-implicit Euler.
///
/// Gravity is added to the force accumulator like any other force, so the
/// resulting acceleration is `gravity / mass`. Disabled and static bodies
/// are left untouched. The accumulator is cleared afterwards.
pub fn integrate(body: &mut Body, gravity: Vec3, dt: f32) {
    if !body.is_movable() {
        return;
    }

    body.apply_force(gravity);
    let acceleration = body.force() * body.inverse_mass();

    body.velocity += acceleration * dt;
    body.position += body.velocity * dt;
    body.predicted_position = body.position + body.velocity * dt;

    body.reset_force();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::BodyType;
    use crate::store::Slot;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_gravity_acts_as_force() {
        let mut body = Body::new(BodyType::Dynamic);
        body.mass = 2.0;

        integrate(&mut body, Vec3::new(0.0, -10.0, 0.0), 0.5);

        // a = -10 / 2, v = a * dt, x = v * dt
        assert!(approx_eq(body.velocity.y, -2.5));
        assert!(approx_eq(body.position.y, -1.25));
        assert!(approx_eq(body.predicted_position.y, -2.5));
        assert_eq!(body.force(), Vec3::ZERO);
    }

    #[test]
    fn test_applied_force_is_consumed() {
        let mut body = Body::new(BodyType::Fluid);
        body.apply_force(Vec3::new(4.0, 0.0, 0.0));

        integrate(&mut body, Vec3::ZERO, 1.0);
        assert!(approx_eq(body.velocity.x, 4.0));

        integrate(&mut body, Vec3::ZERO, 1.0);
        assert!(approx_eq(body.velocity.x, 4.0));
        assert!(approx_eq(body.position.x, 8.0));
    }

    #[test]
    fn test_static_and_disabled_are_skipped() {
        let mut wall = Body::new(BodyType::Static);
        wall.apply_force(Vec3::X);
        integrate(&mut wall, Vec3::NEG_Y, 1.0);
        assert_eq!(wall.position, Vec3::ZERO);
        assert_eq!(wall.velocity, Vec3::ZERO);

        let mut free = Body::vacant();
        integrate(&mut free, Vec3::NEG_Y, 1.0);
        assert_eq!(free.position, Vec3::ZERO);
    }
}

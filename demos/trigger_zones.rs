//! Trigger zone example
//!
//! A ball rolls through two sensor spheres and a listener prints every
//! enter and exit notification.

use octaphy::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

struct Announcer;

impl ContactListener for Announcer {
    fn on_collision_enter(&mut self, a: ColliderRef, b: ColliderRef) {
        info!(%a, %b, "collision started");
    }

    fn on_collision_exit(&mut self, a: ColliderRef, b: ColliderRef) {
        info!(%a, %b, "collision ended");
    }

    fn on_trigger_enter(&mut self, a: ColliderRef, b: ColliderRef) {
        info!(%a, %b, "entered zone");
    }

    fn on_trigger_exit(&mut self, a: ColliderRef, b: ColliderRef) {
        info!(%a, %b, "left zone");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let mut world = World::new(WorldConfig::default().with_gravity(Vec3::ZERO))?;
    world.set_contact_listener(Box::new(Announcer));

    for x in [-3.0, 3.0] {
        let zone = world.create_body(BodyType::Static);
        world.body_mut(zone)?.position = Vec3::new(x, 0.0, 0.0);
        let sensor = world.create_collider(zone)?;
        let sensor = world.collider_mut(sensor)?;
        sensor.shape = Shape::sphere(1.5);
        sensor.is_trigger = true;
    }

    // A wall at the far end so the run also shows a collision pair
    let wall = world.create_body(BodyType::Static);
    let wall_collider = world.create_collider(wall)?;
    world.collider_mut(wall_collider)?.shape =
        Shape::cuboid(Vec3::new(8.0, -2.0, -2.0), Vec3::new(9.0, 2.0, 2.0));

    let ball = world.create_body(BodyType::Dynamic);
    {
        let ball = world.body_mut(ball)?;
        ball.position = Vec3::new(-8.0, 0.0, 0.0);
        ball.velocity = Vec3::new(4.0, 0.0, 0.0);
    }
    let ball_collider = world.create_collider(ball)?;
    world.collider_mut(ball_collider)?.shape = Shape::sphere(0.5);

    let dt = 1.0 / 60.0;
    for _ in 0..(8.0 / dt) as usize {
        world.update(dt)?;
    }

    let ball = world.body(ball)?;
    println!(
        "Ball finished at x={:.2} moving at {:.2}",
        ball.position.x, ball.velocity.x
    );
    Ok(())
}

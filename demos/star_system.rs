//! Orbit example
//!
//! There is no built-in gravitational attraction; this example applies
//! inverse-square forces itself before each update and lets the world
//! integrate them.

use octaphy::prelude::*;
use tracing_subscriber::EnvFilter;

const G: f32 = 1.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let mut world = World::new(WorldConfig::default().with_gravity(Vec3::ZERO))?;

    let sun = world.create_body(BodyType::Dynamic);
    world.body_mut(sun)?.mass = 1000.0;
    let sun_collider = world.create_collider(sun)?;
    world.collider_mut(sun_collider)?.shape = Shape::sphere(2.0);

    let mut planets = Vec::new();
    for (i, distance) in [10.0f32, 18.0, 30.0].into_iter().enumerate() {
        let planet = world.create_body(BodyType::Dynamic);
        let speed = (G * 1000.0 / distance).sqrt();
        {
            let body = world.body_mut(planet)?;
            body.position = Vec3::new(distance, 0.0, 0.0);
            body.velocity = Vec3::new(0.0, 0.0, speed);
            body.mass = 1.0 + i as f32;
        }
        let collider = world.create_collider(planet)?;
        world.collider_mut(collider)?.shape = Shape::sphere(0.5);
        planets.push(planet);
    }

    let dt = 1.0 / 200.0;
    for step in 0..4000 {
        let snapshot: Vec<(BodyRef, Vec3, f32)> = world
            .bodies()
            .map(|(handle, body)| (handle, body.position, body.mass))
            .collect();

        for &(handle, position, mass) in &snapshot {
            let mut pull = Vec3::ZERO;
            for &(other, other_position, other_mass) in &snapshot {
                if other == handle {
                    continue;
                }
                let offset = other_position - position;
                let distance_sq = offset.length_squared().max(1.0);
                pull += offset.normalize() * (G * mass * other_mass / distance_sq);
            }
            world.body_mut(handle)?.apply_force(pull);
        }

        world.update(dt)?;

        if step % 500 == 0 {
            print!("t={:6.2}s:", world.time());
            for &planet in &planets {
                let sun_position = world.body(sun)?.position;
                let radius = world.body(planet)?.position.distance(sun_position);
                print!(" r={radius:6.2}");
            }
            println!();
        }
    }
    Ok(())
}

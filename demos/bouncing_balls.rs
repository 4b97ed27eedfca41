//! Bouncing balls example
//!
//! Drops a handful of balls of random size into a walled box and prints
//! their heights as they settle. Run with `RUST_LOG=octaphy=trace` to see
//! the per-phase spans.

use octaphy::prelude::*;
use rand::Rng;
use tracing_subscriber::EnvFilter;

fn wall(world: &mut World, min: Vec3, max: Vec3) -> Result<(), PhysicsError> {
    let body = world.create_body(BodyType::Static);
    let collider = world.create_collider(body)?;
    world.collider_mut(collider)?.shape = Shape::cuboid(min, max);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    println!("Octaphy - Bouncing Balls Example");
    println!("================================\n");

    let mut world = World::new(WorldConfig::default().with_gravity(Vec3::new(0.0, -9.81, 0.0)))?;

    // Floor and four walls around a 10x10 pen
    wall(&mut world, Vec3::new(-6.0, -1.0, -6.0), Vec3::new(6.0, 0.0, 6.0))?;
    wall(&mut world, Vec3::new(-6.0, 0.0, -6.0), Vec3::new(-5.0, 10.0, 6.0))?;
    wall(&mut world, Vec3::new(5.0, 0.0, -6.0), Vec3::new(6.0, 10.0, 6.0))?;
    wall(&mut world, Vec3::new(-5.0, 0.0, -6.0), Vec3::new(5.0, 10.0, -5.0))?;
    wall(&mut world, Vec3::new(-5.0, 0.0, 5.0), Vec3::new(5.0, 10.0, 6.0))?;

    let mut rng = rand::thread_rng();
    let mut balls = Vec::new();
    for _ in 0..12 {
        let body = world.create_body(BodyType::Dynamic);
        let radius = rng.gen_range(0.2..0.6);
        {
            let ball = world.body_mut(body)?;
            ball.position = Vec3::new(
                rng.gen_range(-4.0..4.0),
                rng.gen_range(2.0..8.0),
                rng.gen_range(-4.0..4.0),
            );
            ball.mass = radius * radius * radius * 10.0;
        }
        let collider = world.create_collider(body)?;
        let collider = world.collider_mut(collider)?;
        collider.shape = Shape::sphere(radius);
        collider.restitution = 0.6;
        balls.push(body);
    }
    println!("Created {} balls in a walled pen\n", balls.len());

    let dt = 1.0 / 120.0;
    let steps = (4.0 / dt) as usize;
    for i in 0..steps {
        world.update(dt)?;

        if i % 120 == 0 {
            let heights: Vec<String> = balls
                .iter()
                .map(|&b| world.body(b).map(|body| format!("{:.2}", body.position.y)))
                .collect::<Result<_, _>>()?;
            println!("t={:.2}s: heights [{}]", world.time(), heights.join(", "));
        }
    }

    println!(
        "\nOctree used {} of {} nodes on the last step",
        world.octree().node_count(),
        world.octree().capacity()
    );
    Ok(())
}

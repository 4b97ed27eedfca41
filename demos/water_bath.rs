//! SPH fluid example
//!
//! Fills a box with a block of fluid particles and reports the density
//! spread while the block slumps under gravity.

use octaphy::prelude::*;
use rand::Rng;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = WorldConfig::default()
        .with_gravity(Vec3::new(0.0, -500.0, 0.0))
        .with_sph(
            SphConfig::default()
                .with_smoothing_radius(15.0)
                .with_target_density(0.01)
                .with_pressure_multiplier(5000.0)
                .with_viscosity_strength(0.05),
        );
    let mut world = World::new(config)?;

    let tank = world.create_body(BodyType::Static);
    let floor = world.create_collider(tank)?;
    world.collider_mut(floor)?.shape =
        Shape::cuboid(Vec3::new(-100.0, -10.0, -100.0), Vec3::new(100.0, 0.0, 100.0));

    let mut rng = rand::thread_rng();
    let mut drops = Vec::new();
    for ix in 0..8 {
        for iy in 0..8 {
            for iz in 0..8 {
                let drop = world.create_body(BodyType::Fluid);
                let jitter = Vec3::new(
                    rng.gen_range(-0.5..0.5),
                    rng.gen_range(-0.5..0.5),
                    rng.gen_range(-0.5..0.5),
                );
                world.body_mut(drop)?.position =
                    Vec3::new(ix as f32 * 6.0, 20.0 + iy as f32 * 6.0, iz as f32 * 6.0) + jitter;
                let collider = world.create_collider(drop)?;
                world.collider_mut(collider)?.shape = Shape::sphere(2.0);
                drops.push(drop);
            }
        }
    }
    println!("Created {} fluid particles\n", drops.len());

    let dt = 1.0 / 240.0;
    for step in 0..480 {
        world.update(dt)?;

        if step % 60 == 0 {
            let (mut low, mut high, mut sum) = (f32::MAX, f32::MIN, 0.0);
            for &drop in &drops {
                let density = world.particle(drop)?.density;
                low = low.min(density);
                high = high.max(density);
                sum += density;
            }
            println!(
                "t={:.3}s: density min={:.5} mean={:.5} max={:.5}",
                world.time(),
                low,
                sum / drops.len() as f32,
                high
            );
        }
    }
    Ok(())
}

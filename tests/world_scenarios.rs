use std::cell::RefCell;
use std::rc::Rc;

use octaphy::collision::ColliderPair;
use octaphy::fluid::kernel;
use octaphy::prelude::*;
use proptest::prelude::*;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

fn weightless() -> World {
    World::new(WorldConfig::default().with_gravity(Vec3::ZERO)).unwrap()
}

fn add_ball(
    world: &mut World,
    body_type: BodyType,
    position: Vec3,
    radius: f32,
) -> (BodyRef, ColliderRef) {
    let body = world.create_body(body_type);
    world.body_mut(body).unwrap().position = position;
    let collider = world.create_collider(body).unwrap();
    world.collider_mut(collider).unwrap().shape = Shape::sphere(radius);
    (body, collider)
}

#[derive(Default, Clone)]
struct Log(Rc<RefCell<Vec<&'static str>>>);

impl ContactListener for Log {
    fn on_collision_enter(&mut self, _a: ColliderRef, _b: ColliderRef) {
        self.0.borrow_mut().push("collision_enter");
    }

    fn on_collision_exit(&mut self, _a: ColliderRef, _b: ColliderRef) {
        self.0.borrow_mut().push("collision_exit");
    }

    fn on_trigger_enter(&mut self, _a: ColliderRef, _b: ColliderRef) {
        self.0.borrow_mut().push("trigger_enter");
    }

    fn on_trigger_exit(&mut self, _a: ColliderRef, _b: ColliderRef) {
        self.0.borrow_mut().push("trigger_exit");
    }
}

#[test]
fn test_handle_stops_resolving_after_destroy() {
    let mut world = World::default();
    let body = world.create_body(BodyType::Dynamic);
    let collider = world.create_collider(body).unwrap();

    world.destroy_collider(collider).unwrap();
    world.destroy_body(body).unwrap();

    assert_eq!(world.body(body), Err(PhysicsError::BodyNotFound(body)));
    assert_eq!(
        world.collider(collider).map(|_| ()),
        Err(PhysicsError::ColliderNotFound(collider))
    );

    let fresh = world.create_body(BodyType::Dynamic);
    assert_ne!(fresh, body);
    assert!(world.body(fresh).is_ok());
}

#[test]
fn test_storage_doubles_once_and_keeps_handles() {
    let mut world = World::with_capacity(2);
    let first = world.create_body(BodyType::Dynamic);
    let second = world.create_body(BodyType::Dynamic);
    world.body_mut(first).unwrap().position = Vec3::new(1.0, 0.0, 0.0);
    assert_eq!(world.body_capacity(), 2);

    let third = world.create_body(BodyType::Dynamic);
    assert_eq!(world.body_capacity(), 4);
    assert_eq!(world.body_count(), 3);

    assert_eq!(world.body(first).unwrap().position, Vec3::new(1.0, 0.0, 0.0));
    assert!(world.body(second).is_ok());
    assert!(world.body(third).is_ok());
}

#[test]
fn test_overlapping_spheres_are_pushed_apart() {
    let mut world = weightless();
    let (left, _) = add_ball(&mut world, BodyType::Dynamic, Vec3::ZERO, 1.0);
    let (right, _) = add_ball(&mut world, BodyType::Dynamic, Vec3::new(1.5, 0.0, 0.0), 1.0);

    world.update(0.0).unwrap();

    let gap = world.body(right).unwrap().position.x - world.body(left).unwrap().position.x;
    assert!(approx_eq(gap, 2.0), "gap was {gap}");
    assert!(approx_eq(world.body(left).unwrap().position.x, -0.25));
}

#[test]
fn test_box_resting_on_box_separates_along_y() {
    let mut world = weightless();
    let floor = world.create_body(BodyType::Static);
    let floor_collider = world.create_collider(floor).unwrap();
    world.collider_mut(floor_collider).unwrap().shape =
        Shape::cuboid(Vec3::new(-5.0, -1.0, -5.0), Vec3::new(5.0, 0.0, 5.0));

    let block = world.create_body(BodyType::Dynamic);
    world.body_mut(block).unwrap().position = Vec3::new(0.0, 0.4, 0.0);
    world.body_mut(block).unwrap().velocity = Vec3::new(0.0, -1.0, 0.0);
    let block_collider = world.create_collider(block).unwrap();
    world.collider_mut(block_collider).unwrap().shape =
        Shape::cuboid_from_half_extents(Vec3::splat(0.5));

    world.update(0.0).unwrap();

    let block = world.body(block).unwrap();
    assert!(approx_eq(block.position.y, 0.5));
    assert!(approx_eq(block.position.x, 0.0));
    assert!(block.velocity.y > 0.0);
}

#[test]
fn test_static_bodies_never_move() {
    let gravity = Vec3::new(0.0, -9.81, 0.0);
    let mut world = World::new(WorldConfig::default().with_gravity(gravity)).unwrap();
    let (anchor, _) = add_ball(&mut world, BodyType::Static, Vec3::ZERO, 2.0);
    let (ball, _) = add_ball(&mut world, BodyType::Dynamic, Vec3::new(0.3, 3.5, 0.0), 1.0);
    world.body_mut(ball).unwrap().velocity = Vec3::new(0.0, -20.0, 0.0);

    for _ in 0..120 {
        world.update(1.0 / 60.0).unwrap();
        let anchor = world.body(anchor).unwrap();
        assert_eq!(anchor.position, Vec3::ZERO);
        assert_eq!(anchor.velocity, Vec3::ZERO);
    }
}

#[test]
fn test_isolated_particle_density_is_self_term() {
    let mut world = weightless();
    let drop = world.create_body(BodyType::Fluid);
    world.body_mut(drop).unwrap().position = Vec3::new(3.0, -7.0, 11.0);

    world.update(0.0).unwrap();

    let h = world.sph_config().smoothing_radius;
    let particle = world.particle(drop).unwrap();
    assert!(approx_eq(particle.density, kernel::smoothing(h, 0.0)));
    assert_eq!(world.body(drop).unwrap().velocity, Vec3::ZERO);
}

#[test]
fn test_trigger_enter_and_exit_fire_once() {
    let mut world = weightless();
    let log = Log::default();
    world.set_contact_listener(Box::new(log.clone()));

    let (_, zone) = add_ball(&mut world, BodyType::Static, Vec3::ZERO, 2.0);
    world.collider_mut(zone).unwrap().is_trigger = true;
    let (visitor, _) = add_ball(&mut world, BodyType::Dynamic, Vec3::new(-4.0, 0.0, 0.0), 0.5);
    world.body_mut(visitor).unwrap().velocity = Vec3::new(1.0, 0.0, 0.0);

    for _ in 0..80 {
        world.update(0.1).unwrap();
    }

    assert_eq!(*log.0.borrow(), vec!["trigger_enter", "trigger_exit"]);
    assert!(world.body(visitor).unwrap().position.x > 2.5);
}

#[test]
fn test_octree_root_encloses_every_collider() {
    let mut world = weightless();
    let positions = [
        Vec3::new(-30.0, 2.0, 0.0),
        Vec3::new(12.0, -8.0, 5.0),
        Vec3::new(0.0, 40.0, -22.0),
    ];
    for position in positions {
        add_ball(&mut world, BodyType::Dynamic, position, 1.5);
    }

    world.update(0.0).unwrap();

    let root = world.octree().root_bounds();
    for (_, collider) in world.colliders() {
        assert!(root.contains_aabb(collider.bounds()));
    }
}

#[test]
fn test_far_away_fluid_still_updates() {
    let mut world = weightless();
    let stray = world.create_body(BodyType::Fluid);
    world.body_mut(stray).unwrap().position = Vec3::new(1.0e12, 0.0, 0.0);
    let other = world.create_body(BodyType::Fluid);
    world.body_mut(other).unwrap().position = Vec3::new(0.0, -1.0e12, 0.0);

    world.update(0.01).unwrap();
    world.update(0.01).unwrap();

    let h = world.sph_config().smoothing_radius;
    assert!(approx_eq(world.particle(stray).unwrap().density, kernel::smoothing(h, 0.0)));
    assert!(approx_eq(world.particle(other).unwrap().density, kernel::smoothing(h, 0.0)));
}

#[test]
fn test_disabling_a_body_retires_its_handle() {
    let mut world = World::with_capacity(1);
    let old = world.create_body(BodyType::Dynamic);
    world.body_mut(old).unwrap().disable();

    let fresh = world.create_body(BodyType::Dynamic);
    assert_ne!(fresh, old);
    assert_eq!(world.body(old), Err(PhysicsError::BodyNotFound(old)));
    assert_eq!(world.body_count(), 1);
    assert_eq!(world.body_capacity(), 1);
}

proptest! {
    #[test]
    fn prop_root_encloses_colliders(
        points in prop::collection::vec(
            (-500.0f32..500.0, -500.0f32..500.0, -500.0f32..500.0),
            1..40,
        ),
        radius in 0.1f32..10.0,
    ) {
        let mut world = weightless();
        for (x, y, z) in points {
            add_ball(&mut world, BodyType::Static, Vec3::new(x, y, z), radius);
        }
        world.update(0.0).unwrap();

        let root = world.octree().root_bounds();
        let mut stored = 0;
        for leaf in world.octree().leaves() {
            stored += leaf.len();
        }
        prop_assert!(stored >= world.collider_count());
        for (_, collider) in world.colliders() {
            prop_assert!(root.contains_aabb(collider.bounds()));
        }
    }

    #[test]
    fn prop_handles_survive_growth(initial in 1usize..8, extra in 0usize..40) {
        let mut world = World::with_capacity(initial);
        let mut handles = Vec::new();
        for i in 0..initial + extra {
            let body = world.create_body(BodyType::Dynamic);
            world.body_mut(body).unwrap().mass = i as f32 + 1.0;
            handles.push(body);
        }

        prop_assert!(world.body_capacity() >= initial + extra);
        for (i, body) in handles.into_iter().enumerate() {
            prop_assert_eq!(world.body(body).unwrap().mass, i as f32 + 1.0);
        }
    }

    #[test]
    fn prop_pair_ignores_order(a in 0u32..64, b in 0u32..64, ga in 0u32..4, gb in 0u32..4) {
        let first = ColliderRef::new(a, ga);
        let second = ColliderRef::new(b, gb);
        prop_assert_eq!(ColliderPair::new(first, second), ColliderPair::new(second, first));
    }
}

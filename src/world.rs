use rustc_hash::FxHashSet;
use tracing::{debug, instrument, trace_span};

use crate::collision::{
    Collider, ColliderPair, ColliderRef, Contact, ContactBody, ContactKind, ContactListener,
    ContactTracker, OctTree,
};
use crate::config::WorldConfig;
use crate::dynamics::{integrate, Body, BodyRef, BodyType};
use crate::error::{PhysicsError, Result};
use crate::fluid::{ParticleData, SphConfig, SphSolver};
use crate::geometry::Aabb;
use crate::math::Vec3;
use crate::store::Arena;

/// The physics world: owns every body and collider and advances them.
///
/// Each call to [`World::update`] runs the same fixed sequence: integrate
/// the bodies, run the SPH passes over fluid bodies, rebuild the octree from
/// the colliders' bounds and finally resolve overlaps leaf by leaf, telling
/// the contact listener about pairs that started or stopped touching.
pub struct World {
    config: WorldConfig,
    bodies: Arena<Body>,
    colliders: Arena<Collider>,
    sph: SphSolver,
    octree: OctTree,
    tracker: ContactTracker,
    /// Pairs already handled during the current step
    visited: FxHashSet<ColliderPair>,
    listener: Option<Box<dyn ContactListener>>,
    /// Contact resolutions performed by the last update
    resolved: usize,
    time: f32,
}

impl Default for World {
    fn default() -> Self {
        Self::build(WorldConfig::default())
    }
}

impl World {
    /// Creates a world after validating `config`
    pub fn new(config: WorldConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Creates a default world with room for `capacity` bodies and colliders
    pub fn with_capacity(capacity: usize) -> Self {
        Self::build(WorldConfig::default().with_initial_capacity(capacity))
    }

    fn build(config: WorldConfig) -> Self {
        Self {
            bodies: Arena::with_capacity(config.initial_capacity),
            colliders: Arena::with_capacity(config.initial_capacity),
            sph: SphSolver::new(config.sph),
            octree: OctTree::new(config.octree),
            tracker: ContactTracker::new(),
            visited: FxHashSet::default(),
            listener: None,
            resolved: 0,
            time: 0.0,
            config,
        }
    }

    /// Creates an enabled body of unit mass at the origin.
    ///
    /// Fluid bodies also get an SPH particle entry.
    pub fn create_body(&mut self, body_type: BodyType) -> BodyRef {
        let handle = self.bodies.insert(Body::new(body_type));
        if body_type == BodyType::Fluid {
            self.sph.add_particle(handle);
        }
        handle
    }

    /// Frees a body slot and drops its particle data.
    ///
    /// Colliders still pointing at the body make the next update fail with
    /// [`PhysicsError::BodyNotFound`]; destroy them first.
    pub fn destroy_body(&mut self, body: BodyRef) -> Result<()> {
        self.bodies.remove(body)?;
        self.sph.remove_particle(body);
        Ok(())
    }

    pub fn body(&self, body: BodyRef) -> Result<&Body> {
        self.bodies.get(body)
    }

    pub fn body_mut(&mut self, body: BodyRef) -> Result<&mut Body> {
        self.bodies.get_mut(body)
    }

    /// Attaches a new unit-sphere collider to `body`
    pub fn create_collider(&mut self, body: BodyRef) -> Result<ColliderRef> {
        let position = self.bodies.get(body)?.position;
        let mut collider = Collider::new(body);
        collider.body_position = position;
        Ok(self.colliders.insert(collider))
    }

    pub fn collider(&self, collider: ColliderRef) -> Result<&Collider> {
        self.colliders.get(collider)
    }

    pub fn collider_mut(&mut self, collider: ColliderRef) -> Result<&mut Collider> {
        self.colliders.get_mut(collider)
    }

    /// Detaches a collider; overlaps it was part of end on the next update
    pub fn destroy_collider(&mut self, collider: ColliderRef) -> Result<()> {
        self.colliders.remove(collider)
    }

    /// Registers the observer notified of enter and exit transitions
    pub fn set_contact_listener(&mut self, listener: Box<dyn ContactListener>) {
        self.listener = Some(listener);
    }

    pub fn take_contact_listener(&mut self) -> Option<Box<dyn ContactListener>> {
        self.listener.take()
    }

    #[inline]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    #[inline]
    pub fn sph_config(&self) -> &SphConfig {
        self.sph.config()
    }

    /// Replaces the fluid tuning; it is read from the next update on
    pub fn set_sph_config(&mut self, sph: SphConfig) -> Result<()> {
        sph.validate()?;
        self.config.sph = sph;
        self.sph.set_config(sph);
        Ok(())
    }

    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.config.gravity = gravity;
    }

    #[inline]
    pub fn gravity(&self) -> Vec3 {
        self.config.gravity
    }

    /// SPH state of a fluid body
    pub fn particle(&self, body: BodyRef) -> Result<&ParticleData> {
        self.sph.particle(body).ok_or(PhysicsError::BodyNotFound(body))
    }

    /// Broad-phase tree as built by the last update
    #[inline]
    pub fn octree(&self) -> &OctTree {
        &self.octree
    }

    /// Returns true if the two colliders overlapped during the last update
    pub fn is_touching(&self, a: ColliderRef, b: ColliderRef) -> bool {
        let pair = ColliderPair::new(a, b);
        self.tracker.is_active(ContactKind::Collision, pair)
            || self.tracker.is_active(ContactKind::Trigger, pair)
    }

    #[inline]
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    #[inline]
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    #[inline]
    pub fn body_capacity(&self) -> usize {
        self.bodies.capacity()
    }

    #[inline]
    pub fn collider_capacity(&self) -> usize {
        self.colliders.capacity()
    }

    pub fn bodies(&self) -> impl Iterator<Item = (BodyRef, &Body)> + '_ {
        self.bodies.iter()
    }

    pub fn colliders(&self) -> impl Iterator<Item = (ColliderRef, &Collider)> + '_ {
        self.colliders.iter()
    }

    /// Number of contacts resolved by the last update.
    ///
    /// With [`WorldConfig::deduplicate_pairs`] off, a pair sharing several
    /// octree leaves counts once per shared leaf.
    #[inline]
    pub fn contacts_resolved(&self) -> usize {
        self.resolved
    }

    /// Simulated time accumulated by [`World::update`]
    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Advances the simulation by `dt`.
    ///
    /// Fails with [`PhysicsError::BodyNotFound`] if an attached collider
    /// points at a destroyed body.
    #[instrument(level = "trace", skip(self))]
    pub fn update(&mut self, dt: f32) -> Result<()> {
        self.integrate_bodies(dt);
        self.sph.step(&mut self.bodies)?;
        self.rebuild_octree()?;
        self.resolve_overlaps()?;
        self.time += dt;
        Ok(())
    }

    fn integrate_bodies(&mut self, dt: f32) {
        let _span = trace_span!("integrate").entered();
        let gravity = self.config.gravity;
        for (_, body) in self.bodies.iter_mut() {
            integrate(body, gravity, dt);
        }
    }

    /// Refreshes cached body positions, fits the root around every collider
    /// and reinserts them all.
    fn rebuild_octree(&mut self) -> Result<()> {
        let _span = trace_span!("broad_phase", colliders = self.colliders.len()).entered();

        let mut bounds = Aabb::EMPTY;
        for (_, collider) in self.colliders.iter_mut() {
            collider.body_position = self.bodies.get(collider.body)?.position;
            bounds = bounds.union(collider.bounds());
        }

        self.octree.set_up_root(bounds);
        for (handle, collider) in self.colliders.iter() {
            self.octree.insert(handle, collider.bounds());
        }
        Ok(())
    }

    fn resolve_overlaps(&mut self) -> Result<()> {
        let _span = trace_span!("narrow_phase").entered();

        let Self {
            config,
            bodies,
            colliders,
            octree,
            tracker,
            visited,
            listener,
            resolved,
            ..
        } = self;
        visited.clear();
        *resolved = 0;

        let mut narrow = NarrowPhase {
            bodies,
            colliders,
            tracker,
            listener: listener.as_deref_mut(),
            resolved,
        };

        for leaf in octree.leaves() {
            for (i, first) in leaf.iter().enumerate() {
                for second in &leaf[i + 1..] {
                    let pair = ColliderPair::new(first.collider, second.collider);
                    if config.deduplicate_pairs && !visited.insert(pair) {
                        continue;
                    }
                    narrow.check(first.collider, second.collider)?;
                }
            }
        }

        narrow.finish();
        Ok(())
    }

    /// Frees every body and collider and forgets all fluid and contact state.
    ///
    /// Handles obtained before the call no longer resolve.
    pub fn clear(&mut self) {
        debug!(
            bodies = self.bodies.len(),
            colliders = self.colliders.len(),
            "world cleared"
        );
        self.bodies.clear();
        self.colliders.clear();
        self.sph.clear();
        self.octree.set_up_root(Aabb::EMPTY);
        self.tracker.clear();
        self.visited.clear();
        self.resolved = 0;
        self.time = 0.0;
    }
}

/// Borrowed state for the pairwise walk over octree leaves
struct NarrowPhase<'w> {
    bodies: &'w mut Arena<Body>,
    colliders: &'w Arena<Collider>,
    tracker: &'w mut ContactTracker,
    listener: Option<&'w mut (dyn ContactListener + 'static)>,
    resolved: &'w mut usize,
}

impl NarrowPhase<'_> {
    fn check(&mut self, first: ColliderRef, second: ColliderRef) -> Result<()> {
        let (collider_a, collider_b) = (self.colliders.get(first)?, self.colliders.get(second)?);
        if collider_a.body == collider_b.body {
            return Ok(());
        }

        let (body_a, body_b) = (
            self.bodies.get(collider_a.body)?,
            self.bodies.get(collider_b.body)?,
        );
        if body_a.is_fluid() && body_b.is_fluid() {
            return Ok(());
        }

        let pair = ColliderPair::new(first, second);

        if collider_a.is_trigger || collider_b.is_trigger {
            let overlapping =
                collider_a
                    .shape
                    .overlaps(body_a.position, &collider_b.shape, body_b.position);
            if overlapping && self.tracker.record(ContactKind::Trigger, pair) {
                if let Some(listener) = self.listener.as_deref_mut() {
                    listener.on_trigger_enter(pair.a, pair.b);
                }
            }
            return Ok(());
        }

        let contact = Contact::between(
            ContactBody {
                body_ref: collider_a.body,
                body: body_a,
                collider: collider_a,
            },
            ContactBody {
                body_ref: collider_b.body,
                body: body_b,
                collider: collider_b,
            },
        );
        let Some(contact) = contact else {
            return Ok(());
        };

        if let Some((a, b)) = self.bodies.get2_mut(contact.body_a, contact.body_b)? {
            contact.resolve(a, b);
            *self.resolved += 1;
        }
        if self.tracker.record(ContactKind::Collision, pair) {
            if let Some(listener) = self.listener.as_deref_mut() {
                listener.on_collision_enter(pair.a, pair.b);
            }
        }
        Ok(())
    }

    fn finish(&mut self) {
        let listener = &mut self.listener;
        self.tracker.finish(|kind, pair| {
            let Some(listener) = listener.as_deref_mut() else {
                return;
            };
            match kind {
                ContactKind::Collision => listener.on_collision_exit(pair.a, pair.b),
                ContactKind::Trigger => listener.on_trigger_exit(pair.a, pair.b),
            }
        });
    }
}

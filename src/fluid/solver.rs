use rustc_hash::FxHashMap;
use tracing::trace_span;

use super::grid::SpatialHashGrid;
use super::kernel;
use super::{ParticleData, SphConfig};
use crate::dynamics::{Body, BodyRef};
use crate::error::Result;
use crate::math::Vec3;
use crate::store::Arena;

/// Smoothed-particle hydrodynamics over the fluid bodies of a world.
///
/// A step runs four complete passes in a fixed order: grid rebuild,
/// density, pressure and viscosity. Pressure reads the densities of the
/// same step, so no pass may start before the previous one finished.
/// Forces are added to the bodies' accumulators and take effect on the
/// next integration.
#[derive(Debug, Clone)]
pub struct SphSolver {
    config: SphConfig,
    grid: SpatialHashGrid,
    particles: FxHashMap<BodyRef, ParticleData>,
    neighbors: Vec<BodyRef>,
}

impl Default for SphSolver {
    fn default() -> Self {
        Self::new(SphConfig::default())
    }
}

impl SphSolver {
    pub fn new(config: SphConfig) -> Self {
        Self {
            grid: SpatialHashGrid::new(config.smoothing_radius),
            config,
            particles: FxHashMap::default(),
            neighbors: Vec::with_capacity(64),
        }
    }

    #[inline]
    pub fn config(&self) -> &SphConfig {
        &self.config
    }

    /// Replaces the tuning; the grid picks up a new radius on its next rebuild
    pub fn set_config(&mut self, config: SphConfig) {
        self.config = config;
    }

    pub fn add_particle(&mut self, body: BodyRef) {
        self.particles.insert(body, ParticleData::default());
    }

    pub fn remove_particle(&mut self, body: BodyRef) -> Option<ParticleData> {
        self.particles.remove(&body)
    }

    pub fn particle(&self, body: BodyRef) -> Option<&ParticleData> {
        self.particles.get(&body)
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn grid(&self) -> &SpatialHashGrid {
        &self.grid
    }

    /// Runs every pass for one step
    pub fn step(&mut self, bodies: &mut Arena<Body>) -> Result<()> {
        if self.particles.is_empty() {
            return Ok(());
        }

        {
            let _span = trace_span!("sph_grid", particles = self.particles.len()).entered();
            self.rebuild_grid(bodies)?;
        }
        {
            let _span = trace_span!("sph_density").entered();
            self.compute_density(bodies)?;
        }
        {
            let _span = trace_span!("sph_pressure").entered();
            self.apply_pressure(bodies)?;
        }
        let _span = trace_span!("sph_viscosity").entered();
        self.apply_viscosity(bodies)
    }

    /// Refills the neighbour grid from the bodies' current positions.
    ///
    /// Particles whose body no longer resolves, e.g. one disabled in place,
    /// are dropped first.
    pub fn rebuild_grid(&mut self, bodies: &Arena<Body>) -> Result<()> {
        self.particles.retain(|&body_ref, _| bodies.contains(body_ref));
        self.grid.rebuild(self.config.smoothing_radius);
        for (&body_ref, data) in &mut self.particles {
            data.position = bodies.get(body_ref)?.position;
            self.grid.insert(body_ref, data.position);
        }
        Ok(())
    }

    /// Sums kernel contributions of every neighbour, the particle included
    pub fn compute_density(&mut self, bodies: &Arena<Body>) -> Result<()> {
        let config = self.config;
        let h = config.smoothing_radius;

        for data in self.particles.values_mut() {
            self.grid.neighbors_into(data.position, &mut self.neighbors);

            let mut density = 0.0;
            let mut near_density = 0.0;
            for &other in &self.neighbors {
                let distance = data.position.distance(bodies.get(other)?.position);
                density += kernel::smoothing(h, distance);
                near_density += kernel::spiky_pow3(h, distance);
            }

            data.density = density;
            data.near_density = near_density;
            data.pressure = config.density_to_pressure(density);
            data.smoothing_length = h;
            data.viscosity = config.viscosity_strength;
        }
        Ok(())
    }

    /// Applies the symmetric pressure force, scaled by the particle's density
    pub fn apply_pressure(&mut self, bodies: &mut Arena<Body>) -> Result<()> {
        let config = self.config;
        let h = config.smoothing_radius;
        let near_enabled = config.near_pressure_multiplier > 0.0;

        for (&body_ref, data) in &self.particles {
            if data.density <= 0.0 {
                continue;
            }
            self.grid.neighbors_into(data.position, &mut self.neighbors);
            let position = bodies.get(body_ref)?.position;

            let mut force = Vec3::ZERO;
            for &other_ref in &self.neighbors {
                if other_ref == body_ref {
                    continue;
                }
                let Some(other_data) = self.particles.get(&other_ref) else {
                    continue;
                };
                if other_data.density <= 0.0 {
                    continue;
                }
                let other = bodies.get(other_ref)?;

                let offset = position - other.position;
                let distance = offset.length();
                let direction = if distance == 0.0 { Vec3::Y } else { offset / distance };

                let slope = kernel::smoothing_derivative(h, distance);
                let shared = config.shared_pressure(other_data.density, data.density);
                force += direction * (shared * slope * other.mass / other_data.density);

                if near_enabled && other_data.near_density > 0.0 {
                    let shared_near =
                        config.shared_near_pressure(data.near_density, other_data.near_density);
                    let near_slope = kernel::spiky_pow3_derivative(h, distance);
                    force -= direction
                        * (shared_near * near_slope * other.mass / other_data.near_density);
                }
            }

            bodies.get_mut(body_ref)?.apply_force(force / data.density);
        }
        Ok(())
    }

    /// Pulls each particle's velocity towards its neighbours' within the radius
    pub fn apply_viscosity(&mut self, bodies: &mut Arena<Body>) -> Result<()> {
        let config = self.config;
        let h = config.smoothing_radius;

        for (&body_ref, data) in &self.particles {
            self.grid.neighbors_into(data.position, &mut self.neighbors);
            let this = bodies.get(body_ref)?;
            let (position, velocity, mass) = (this.position, this.velocity, this.mass);

            let mut force = Vec3::ZERO;
            for &other_ref in &self.neighbors {
                if other_ref == body_ref {
                    continue;
                }
                let other = bodies.get(other_ref)?;
                let distance = position.distance(other.position);
                if distance > h {
                    continue;
                }
                force += (other.velocity - velocity) * (kernel::smoothing(h, distance) * mass);
            }

            bodies
                .get_mut(body_ref)?
                .apply_force(force * config.viscosity_strength);
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.grid.clear();
        self.neighbors.clear();
    }
}

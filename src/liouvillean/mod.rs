//! # Liouvillean
//!
//! The liouvillean is the analytic kernel: given two particles, or a
//! particle and a surface, it predicts either a non-negative `Δt` until the
//! next event or a sentinel "no event", and resolves the post-event state
//! change. Every predictor is pure with respect to global state; only the
//! resolvers mutate, and only the particles named in the event.
//!
//! The capability set `{stream, predict_pair, resolve_pair, predict_wall,
//! resolve_wall, kinetic_energy}` is realised as a closed enum,
//! [`Dynamics`], over four variants — [`Newtonian`], [`NewtonianOrientation`],
//! [`Sllod`], [`Viscous`] — each owning its own state (a shear accumulator
//! for SLLOD, gravity and a restitution coefficient for Viscous). A closed
//! enum rather than a trait object sidesteps dynamic dispatch in the
//! per-event hot path, and the variant set genuinely is closed: nothing in
//! the surrounding engine expects user-defined dynamics.

mod newtonian;
mod orientation;
mod sllod;
mod viscous;

#[cfg(test)]
mod tests;

pub use newtonian::Newtonian;
pub use orientation::NewtonianOrientation;
pub use sllod::Sllod;
pub use viscous::Viscous;

use crate::bc::BoundaryCondition;
use crate::error::EdmdError;
use crate::particle::Particle;
use crate::species::SpeciesTable;
use crate::vector::Vec3;
use rand::RngCore;

/// Numeric slack tolerated before a negative predicted time or a clock
/// mismatch is treated as an invariant violation, in reduced time units.
pub const NUMERIC_SLACK: f64 = 1e-10;

/// Clamps a predicted root to zero if it is negative but within
/// [`NUMERIC_SLACK`], per the predictor failure semantics: "if a numeric
/// solve yields −ε, return 0 and log."
fn clamp_root(t: f64) -> Option<f64> {
    if t >= 0.0 {
        Some(t)
    } else if t >= -NUMERIC_SLACK {
        log::debug!("predictor root {t} clamped to 0 within numeric slack");
        Some(0.0)
    } else {
        None
    }
}

/// Smallest positive real root of `|r(t)|² = σ²` for `r(t) = r0 + v*t`, or
/// `None` if the spheres never approach within `σ` (includes the case of
/// already-overlapping spheres receding, which the caller should never
/// observe under correctly maintained invariants).
fn ballistic_root(r0: Vec3, v: Vec3, sigma: f64) -> Option<f64> {
    let a = v.norm_squared();
    if a <= f64::EPSILON {
        return None;
    }
    let b = r0.dot(&v);
    let c = r0.norm_squared() - sigma * sigma;
    let disc = b * b - a * c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let t = (-b - sqrt_disc) / a;
    clamp_root(t)
}

/// Time until a streamed position leaves the axis-aligned box
/// `[origin, origin + extent)`, and the axis it exits along first (ties
/// broken by the smallest axis index), per `squareCellCollision2/3`.
fn box_exit(position: Vec3, velocity: Vec3, origin: Vec3, extent: Vec3) -> (f64, usize) {
    let mut best_t = f64::INFINITY;
    let mut best_axis = 0;
    for axis in 0..3 {
        let (pos, vel, org, ext) = match axis {
            0 => (position.x, velocity.x, origin.x, extent.x),
            1 => (position.y, velocity.y, origin.y, extent.y),
            _ => (position.z, velocity.z, origin.z, extent.z),
        };
        let t = if vel > 0.0 {
            (org + ext - pos) / vel
        } else if vel < 0.0 {
            (org - pos) / vel
        } else {
            f64::INFINITY
        };
        if t < best_t {
            best_t = t;
            best_axis = axis;
        }
    }
    (best_t.max(0.0), best_axis)
}

/// The analytic predictor/resolver kernel, dispatched over a closed set of
/// dynamics variants.
pub trait Liouvillean {
    /// Human-readable name of the active variant, used in
    /// [`EdmdError::UnsupportedForThisDynamics`] diagnostics.
    fn name(&self) -> &'static str;

    /// Fast-forwards `p`'s stored state to `t`. Idempotent: calling twice
    /// with the same `t` is a no-op the second time.
    fn update(&self, p: &mut Particle, t: f64) {
        p.position = p.streamed_position(t);
        p.local_clock = t;
    }

    /// Fast-forwards every particle to `t`. This is one of the two
    /// operations explicitly permitted to run off the single-threaded event
    /// loop: it has no cross-particle dependency, so it is parallelised
    /// with `rayon` when called from startup/reinitialisation code.
    fn update_all(&self, particles: &mut [Particle], t: f64) {
        use rayon::prelude::*;
        particles.par_iter_mut().for_each(|p| self.update(p, t));
    }

    /// `t - p.local_clock`, letting callers predict in the un-streamed
    /// frame and subtract the delay rather than materialising a streamed
    /// copy of `p`.
    fn particle_delay(&self, p: &Particle, t: f64) -> f64 {
        p.delay(t)
    }

    /// Smallest positive root of `|r_pq(t)|² = σ²` in relative-motion time,
    /// or `None` if no such root exists before the trajectories diverge.
    fn sphere_sphere_in_root(
        &self,
        p: &Particle,
        q: &Particle,
        sigma: f64,
        t: f64,
        bc: &BoundaryCondition,
    ) -> Option<f64>;

    /// Time until `p` leaves the extended cell box `[origin, origin+extent)`.
    fn square_cell_collision_2(&self, p: &Particle, origin: Vec3, extent: Vec3, t: f64) -> f64 {
        let (dt, _axis) = box_exit(p.streamed_position(t), p.velocity, origin, extent);
        dt
    }

    /// Axis index of the face `p` will cross first (ties broken by the
    /// smallest axis index).
    fn square_cell_collision_3(&self, p: &Particle, origin: Vec3, extent: Vec3, t: f64) -> usize {
        let (_dt, axis) = box_exit(p.streamed_position(t), p.velocity, origin, extent);
        axis
    }

    /// Time until the signed distance `(x(t) - x0)·n̂` from the positive
    /// side reaches zero, or `None` if `p` is moving away from the wall.
    fn wall_collision(&self, p: &Particle, x0: Vec3, normal: Vec3, t: f64) -> Option<f64> {
        let rel = p.streamed_position(t) - x0;
        let v_n = p.velocity.dot(&normal);
        if v_n >= 0.0 {
            return None;
        }
        clamp_root(-rel.dot(&normal) / v_n)
    }

    /// Resolves an elastic hard-sphere pair collision: reverses the
    /// relative velocity component along the line of centers, weighted by
    /// reduced mass. Both particles must already be streamed to `t`.
    fn resolve_pair(
        &self,
        p: &mut Particle,
        q: &mut Particle,
        species: &SpeciesTable,
        bc: &BoundaryCondition,
        t: f64,
    ) -> Result<(), EdmdError> {
        let m1 = species.resolve(&p.species)?.mass;
        let m2 = species.resolve(&q.species)?.mass;
        let r = bc.apply_bc(q.position - p.position, t);
        let sigma = r.norm();
        if sigma <= f64::EPSILON {
            return Err(EdmdError::InvariantViolation(
                "colliding particles share a position".to_string(),
            ));
        }
        let n = r / sigma;
        let v_rel = q.velocity - p.velocity;
        let vn = v_rel.dot(&n);
        let impulse = 2.0 * vn / (1.0 / m1 + 1.0 / m2);
        p.velocity = p.velocity + n * (impulse / m1);
        q.velocity = q.velocity - n * (impulse / m2);
        Ok(())
    }

    /// Resolves a particle-wall collision by specular reflection of the
    /// velocity component along the wall normal.
    fn resolve_wall(&self, p: &mut Particle, normal: Vec3) {
        let v_n = p.velocity.dot(&normal);
        p.velocity = p.velocity - normal * (2.0 * v_n);
    }

    /// Resamples the velocity component along `n̂` from a Maxwell-Boltzmann
    /// distribution at temperature `sqrt_t²`, returning the pre-collision
    /// velocity so observers can compute the delta.
    fn run_andersen_wall_collision(
        &self,
        p: &mut Particle,
        normal: Vec3,
        sqrt_t: f64,
        rng: &mut dyn RngCore,
    ) -> Vec3 {
        use rand_distr::{Distribution, Normal};
        let before = p.velocity;
        let tangent_component = p.velocity - normal * p.velocity.dot(&normal);
        // The normal component is drawn from the half-Maxwellian (the
        // folded normal distribution), always directed back into the box.
        let normal_dist = Normal::new(0.0, sqrt_t).expect("sqrt_t must be positive");
        let speed = normal_dist.sample(rng).abs();
        p.velocity = tangent_component + normal * speed;
        before
    }

    /// Line-line (rod) collision resolver. Unimplemented for every closed
    /// variant: none of them track a rod's long axis.
    fn run_line_line_collision(&self, _p: &mut Particle, _q: &mut Particle) -> Result<(), EdmdError> {
        Err(EdmdError::UnsupportedForThisDynamics {
            operation: "run_line_line_collision",
            dynamics: self.name(),
        })
    }

    /// Oscillating-plate resolver. Unimplemented for every closed variant.
    fn run_oscillating_plate(&self, _p: &mut Particle, _t: f64) -> Result<(), EdmdError> {
        Err(EdmdError::UnsupportedForThisDynamics {
            operation: "run_oscillating_plate",
            dynamics: self.name(),
        })
    }

    /// Parallel-cube collision resolver. Unimplemented for every closed
    /// variant.
    fn parallel_cube_coll(&self, _p: &mut Particle, _q: &mut Particle) -> Result<(), EdmdError> {
        Err(EdmdError::UnsupportedForThisDynamics {
            operation: "parallel_cube_coll",
            dynamics: self.name(),
        })
    }

    /// Translational (plus, where tracked, rotational) kinetic energy of a
    /// single particle.
    fn particle_kinetic_energy(&self, p: &Particle, species: &SpeciesTable) -> f64 {
        let mass = species.get(&p.species).map(|s| s.mass).unwrap_or(1.0);
        0.5 * mass * p.velocity.norm_squared()
    }

    /// Total kinetic energy over the population.
    fn system_kinetic_energy(&self, particles: &[Particle], species: &SpeciesTable) -> f64 {
        particles
            .iter()
            .map(|p| self.particle_kinetic_energy(p, species))
            .sum()
    }

    /// Instantaneous temperature `kT = 2*KE / (N*DOF)`.
    fn k_t(&self, particles: &[Particle], species: &SpeciesTable, dof_per_particle: usize) -> f64 {
        if particles.is_empty() || dof_per_particle == 0 {
            return 0.0;
        }
        2.0 * self.system_kinetic_energy(particles, species)
            / (particles.len() * dof_per_particle) as f64
    }

    /// Uniformly rescales every velocity so that `k_t` matches `target_kt`.
    fn rescale_kinetic_energy(
        &self,
        particles: &mut [Particle],
        species: &SpeciesTable,
        target_kt: f64,
        dof_per_particle: usize,
    ) {
        let current = self.k_t(particles, species, dof_per_particle);
        if current <= f64::EPSILON {
            return;
        }
        let scale = (target_kt / current).sqrt();
        for p in particles.iter_mut() {
            p.velocity = p.velocity * scale;
        }
    }
}

/// The closed set of dynamics variants the engine supports.
pub enum Dynamics {
    /// Plain ballistic hard-sphere dynamics.
    Newtonian(Newtonian),
    /// Newtonian dynamics with orientation and angular velocity tracked.
    NewtonianOrientation(NewtonianOrientation),
    /// Thermostatted shear flow under Lees-Edwards boundary conditions.
    Sllod(Sllod),
    /// Dissipative dynamics with constant gravity and a restitution
    /// coefficient on collision.
    Viscous(Viscous),
}

impl Dynamics {
    /// Builds the `Newtonian` variant.
    pub fn newtonian() -> Self {
        Dynamics::Newtonian(Newtonian)
    }
}

impl Liouvillean for Dynamics {
    fn name(&self) -> &'static str {
        match self {
            Dynamics::Newtonian(d) => d.name(),
            Dynamics::NewtonianOrientation(d) => d.name(),
            Dynamics::Sllod(d) => d.name(),
            Dynamics::Viscous(d) => d.name(),
        }
    }

    fn update(&self, p: &mut Particle, t: f64) {
        match self {
            Dynamics::Newtonian(d) => d.update(p, t),
            Dynamics::NewtonianOrientation(d) => d.update(p, t),
            Dynamics::Sllod(d) => d.update(p, t),
            Dynamics::Viscous(d) => d.update(p, t),
        }
    }

    fn sphere_sphere_in_root(
        &self,
        p: &Particle,
        q: &Particle,
        sigma: f64,
        t: f64,
        bc: &BoundaryCondition,
    ) -> Option<f64> {
        match self {
            Dynamics::Newtonian(d) => d.sphere_sphere_in_root(p, q, sigma, t, bc),
            Dynamics::NewtonianOrientation(d) => d.sphere_sphere_in_root(p, q, sigma, t, bc),
            Dynamics::Sllod(d) => d.sphere_sphere_in_root(p, q, sigma, t, bc),
            Dynamics::Viscous(d) => d.sphere_sphere_in_root(p, q, sigma, t, bc),
        }
    }

    fn particle_kinetic_energy(&self, p: &Particle, species: &SpeciesTable) -> f64 {
        match self {
            Dynamics::Newtonian(d) => d.particle_kinetic_energy(p, species),
            Dynamics::NewtonianOrientation(d) => d.particle_kinetic_energy(p, species),
            Dynamics::Sllod(d) => d.particle_kinetic_energy(p, species),
            Dynamics::Viscous(d) => d.particle_kinetic_energy(p, species),
        }
    }

    fn resolve_pair(
        &self,
        p: &mut Particle,
        q: &mut Particle,
        species: &SpeciesTable,
        bc: &BoundaryCondition,
        t: f64,
    ) -> Result<(), EdmdError> {
        match self {
            Dynamics::Newtonian(d) => d.resolve_pair(p, q, species, bc, t),
            Dynamics::NewtonianOrientation(d) => d.resolve_pair(p, q, species, bc, t),
            Dynamics::Sllod(d) => d.resolve_pair(p, q, species, bc, t),
            Dynamics::Viscous(d) => d.resolve_pair(p, q, species, bc, t),
        }
    }
}

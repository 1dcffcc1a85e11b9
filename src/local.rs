//! # Local objects
//!
//! A `Local` is a stationary object — a wall, plate, or thermostatting
//! surface — that generates `LOCAL` events for particles that pass within
//! its extended cell range. Grounded in `AndersenWall.cpp`: its `getEvent`
//! predicts the wall-collision time, `runEvent` resamples the post-collision
//! velocity from a Maxwell-Boltzmann distribution (an Andersen thermostat),
//! and `isInCell` answers the cube/plane overlap test the cell grid uses to
//! decide which cells must be notified of this local.

use crate::liouvillean::Liouvillean;
use crate::observer::{ObserverBus, ParticleUpdate};
use crate::particle::Particle;
use crate::vector::Vec3;
use rand::RngCore;

/// A stationary local object generating `LOCAL` events.
pub trait Local {
    /// This local's id, referenced from [`crate::event::EventKind::Local`].
    fn id(&self) -> u32;

    /// Predicted time until `p` collides with this local, or `None`.
    fn get_event(&self, p: &Particle, liouvillean: &dyn Liouvillean, t: f64) -> Option<f64>;

    /// Resolves the collision, mutating `p` and firing `sigParticleUpdate`.
    fn run_event(
        &self,
        p: &mut Particle,
        liouvillean: &dyn Liouvillean,
        t: f64,
        rng: &mut dyn RngCore,
        observers: &mut ObserverBus,
    );

    /// Whether this local's extended domain overlaps the cell
    /// `[origin, origin + extent]`, used to decide which cells carry this
    /// local in their notification list.
    fn is_in_cell(&self, origin: Vec3, extent: Vec3) -> bool;
}

/// A planar wall at `x0` with outward normal `normal`, implementing an
/// Andersen thermostat: particles that hit it have the velocity component
/// along `normal` resampled from a Maxwell-Boltzmann distribution at
/// temperature `sqrt_t²`, modelling stochastic energy exchange with a heat
/// bath rather than a specular bounce.
pub struct AndersenWall {
    id: u32,
    /// A point on the wall plane.
    pub x0: Vec3,
    /// Outward unit normal.
    pub normal: Vec3,
    /// `√T` of the thermostat bath.
    pub sqrt_t: f64,
}

impl AndersenWall {
    /// Creates a new Andersen-thermostatted wall.
    pub fn new(id: u32, x0: Vec3, normal: Vec3, sqrt_t: f64) -> Self {
        AndersenWall {
            id,
            x0,
            normal,
            sqrt_t,
        }
    }

    fn signed_distance(&self, extent_scale: f64, origin: Vec3) -> f64 {
        (origin - self.x0).dot(&self.normal) + extent_scale
    }
}

impl Local for AndersenWall {
    fn id(&self) -> u32 {
        self.id
    }

    fn get_event(&self, p: &Particle, liouvillean: &dyn Liouvillean, t: f64) -> Option<f64> {
        liouvillean.wall_collision(p, self.x0, self.normal, t)
    }

    fn run_event(
        &self,
        p: &mut Particle,
        liouvillean: &dyn Liouvillean,
        t: f64,
        rng: &mut dyn RngCore,
        observers: &mut ObserverBus,
    ) {
        liouvillean.update(p, t);
        let position_before = p.position;
        let velocity_before = liouvillean.run_andersen_wall_collision(p, self.normal, self.sqrt_t, rng);

        observers.fire_particle_update(&ParticleUpdate {
            particle_id: p.id,
            position_before,
            velocity_before,
            position_after: p.position,
            velocity_after: p.velocity,
            time: t,
        });
    }

    fn is_in_cell(&self, origin: Vec3, extent: Vec3) -> bool {
        // A conservative "the wall's plane passes within this cell's
        // extended box along the normal axis" test, enough to decide
        // whether the cell needs a new-local notification for this wall.
        let half_extent = 0.5 * extent.dot(&Vec3::new(
            self.normal.x.abs(),
            self.normal.y.abs(),
            self.normal.z.abs(),
        ));
        self.signed_distance(0.0, origin).abs() <= half_extent + extent.norm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::liouvillean::Dynamics;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn andersen_wall_scenario() {
        // Andersen wall at x=0, sqrt(T)=1, particle at (1,0,0) velocity
        // (-1,0,0): single LOCAL event at t=1, post-collision v_x > 0.
        let wall = AndersenWall::new(0, Vec3::zero(), Vec3::x_hat(), 1.0);
        let dyn_ = Dynamics::newtonian();

        let mut p = Particle::new(0);
        p.position = Vec3::new(1.0, 0.0, 0.0);
        p.velocity = Vec3::new(-1.0, 0.0, 0.0);

        let dt = wall.get_event(&p, &dyn_, 0.0).unwrap();
        assert!((dt - 1.0).abs() < 1e-9);

        let mut rng = StdRng::seed_from_u64(7);
        let mut observers = ObserverBus::new();
        wall.run_event(&mut p, &dyn_, dt, &mut rng, &mut observers);

        assert!(p.velocity.x > 0.0);
        assert!((p.position.x).abs() < 1e-9);
    }
}

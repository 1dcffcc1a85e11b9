//! # Particle state
//!
//! A particle's stored position and velocity are only valid as of its
//! *local clock*; the liouvillean streams it forward lazily, only when it
//! actually participates in an event. See [`Particle::streamed_position`].

use crate::vector::Vec3;

/// Dense integer identifier for a particle. Also used as the particle's
/// index into the simulation's particle vector and the cell grid's
/// intrusive per-particle slot array.
pub type ParticleId = u32;

/// Orientation and angular velocity, carried only by dynamics variants that
/// track rotational degrees of freedom (`NewtonianOrientation`, `SLLOD`).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Orientation {
    /// Unit quaternion-free axis-angle-less orientation vector; stored as a
    /// plain `Vec3` direction since the engine never needs full SO(3) state
    /// for the collision kernels it implements.
    pub direction: Vec3,
    /// Angular velocity vector.
    pub angular_velocity: Vec3,
}

/// A single rigid particle.
///
/// Position and velocity are the values last computed at `local_clock`; to
/// get the particle's true state at the current global time `t`, callers go
/// through the liouvillean's `update`/`particle_delay`, never by reading
/// `position/velocity` directly and assuming they're current.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Particle {
    /// Dense integer id; also this particle's index in the simulation's
    /// particle vector.
    pub id: ParticleId,
    /// Stored position as of `local_clock`.
    pub position: Vec3,
    /// Stored velocity as of `local_clock`. Constant between events under
    /// Newtonian dynamics (ballistic flight).
    pub velocity: Vec3,
    /// Orientation and spin, present only for orientation-tracking dynamics.
    pub orientation: Option<Orientation>,
    /// Absolute time at which `position`/`velocity` were last valid.
    pub local_clock: f64,
    /// Name of this particle's entry in the simulation's species table.
    pub species: String,
}

impl Particle {
    /// Creates a new particle at rest at the origin, local clock zero,
    /// tagged with the default species.
    pub fn new(id: ParticleId) -> Self {
        Particle {
            id,
            position: Vec3::zero(),
            velocity: Vec3::zero(),
            orientation: None,
            local_clock: 0.0,
            species: "Default".to_string(),
        }
    }

    /// Returns the streamed position at global time `t` without mutating
    /// stored state: `x + v*(t - t_p)`.
    ///
    /// This is the "predict in the un-streamed frame" half of the
    /// particle-delay trick: predictors call this (or work directly with
    /// `particle_delay`) instead of materialising a fast-forwarded copy.
    pub fn streamed_position(&self, t: f64) -> Vec3 {
        self.position + self.velocity * (t - self.local_clock)
    }

    /// `t - local_clock`: how far behind the global clock this particle's
    /// stored state currently is.
    pub fn delay(&self, t: f64) -> f64 {
        t - self.local_clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streamed_position_advances_by_velocity_times_delay() {
        let mut p = Particle::new(0);
        p.position = Vec3::new(1.0, 0.0, 0.0);
        p.velocity = Vec3::new(2.0, 0.0, 0.0);
        p.local_clock = 1.0;

        let streamed = p.streamed_position(3.0);
        assert_eq!(streamed, Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn delay_is_zero_when_clocks_match() {
        let p = Particle::new(0);
        assert_eq!(p.delay(0.0), 0.0);
    }
}

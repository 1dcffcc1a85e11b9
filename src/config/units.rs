//! # Unit rescaling
//!
//! All stored simulation values are reduced units; I/O applies the
//! `unitLength`, `unitVelocity`, `unitEnergy`, `unitTime`,
//! `unitAcceleration` conversion factors declared on `<Units/>` on the way
//! in and out. The core itself — predictors, resolvers, the event loop —
//! only ever sees reduced units.

use crate::particle::Particle;
use serde::{Deserialize, Serialize};

/// Conversion factors from reduced units to physical units, one per
/// physical quantity named in the document schema.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Units {
    /// Length: `physical = reduced * unit_length`.
    #[serde(rename = "@UnitLength", default = "Units::one")]
    pub unit_length: f64,
    /// Velocity: `physical = reduced * unit_velocity`.
    #[serde(rename = "@UnitVelocity", default = "Units::one")]
    pub unit_velocity: f64,
    /// Energy: `physical = reduced * unit_energy`.
    #[serde(rename = "@UnitEnergy", default = "Units::one")]
    pub unit_energy: f64,
    /// Time: `physical = reduced * unit_time`.
    #[serde(rename = "@UnitTime", default = "Units::one")]
    pub unit_time: f64,
    /// Acceleration: `physical = reduced * unit_acceleration`.
    #[serde(rename = "@UnitAcceleration", default = "Units::one")]
    pub unit_acceleration: f64,
}

impl Units {
    fn one() -> f64 {
        1.0
    }

    /// The identity conversion: reduced units equal physical units.
    pub fn identity() -> Self {
        Units {
            unit_length: 1.0,
            unit_velocity: 1.0,
            unit_energy: 1.0,
            unit_time: 1.0,
            unit_acceleration: 1.0,
        }
    }

    /// Converts position/velocity fields on `particles` from physical units
    /// (as read from the document) into the engine's reduced units, in
    /// place.
    pub fn rescale_into_reduced(&self, particles: &mut [Particle]) {
        for p in particles.iter_mut() {
            p.position = p.position * (1.0 / self.unit_length);
            p.velocity = p.velocity * (1.0 / self.unit_velocity);
        }
    }

    /// Returns a copy of `particles` with position/velocity converted from
    /// the engine's reduced units into physical units, for output.
    pub fn rescale_into_physical(&self, particles: &[Particle]) -> Vec<Particle> {
        particles
            .iter()
            .map(|p| {
                let mut out = p.clone();
                out.position = out.position * self.unit_length;
                out.velocity = out.velocity * self.unit_velocity;
                out
            })
            .collect()
    }

    /// Converts a reduced-unit time to physical units.
    pub fn time_to_physical(&self, t: f64) -> f64 {
        t * self.unit_time
    }

    /// Converts a reduced-unit energy to physical units.
    pub fn energy_to_physical(&self, e: f64) -> f64 {
        e * self.unit_energy
    }
}

impl Default for Units {
    fn default() -> Self {
        Units::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vec3;

    #[test]
    fn rescale_roundtrips_through_reduced_and_physical() {
        let units = Units {
            unit_length: 2.0,
            unit_velocity: 0.5,
            ..Units::identity()
        };

        let mut p = Particle::new(0);
        p.position = Vec3::new(4.0, 4.0, 4.0);
        p.velocity = Vec3::new(1.0, 1.0, 1.0);
        let physical = vec![p.clone()];

        let mut reduced = physical.clone();
        units.rescale_into_reduced(&mut reduced);
        assert_eq!(reduced[0].position, Vec3::new(2.0, 2.0, 2.0));
        assert_eq!(reduced[0].velocity, Vec3::new(2.0, 2.0, 2.0));

        let back = units.rescale_into_physical(&reduced);
        assert_eq!(back[0].position, physical[0].position);
        assert_eq!(back[0].velocity, physical[0].velocity);
    }
}

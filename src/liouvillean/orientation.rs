//! Newtonian dynamics extended with orientation and angular velocity.
//!
//! Translational motion is identical to plain [`super::Newtonian`]; the
//! difference is bookkeeping (orientation/angular velocity are carried and
//! streamed) and that rotational kinetic energy contributes to the system
//! total.

use super::{ballistic_root, Liouvillean};
use crate::bc::BoundaryCondition;
use crate::particle::Particle;
use crate::species::SpeciesTable;

/// Newtonian dynamics with a tracked orientation and angular velocity per
/// particle. Moment of inertia is taken proportional to mass (unit radius
/// of gyration), matching the single-species fast path most configurations
/// use.
pub struct NewtonianOrientation;

impl Liouvillean for NewtonianOrientation {
    fn name(&self) -> &'static str {
        "NewtonianOrientation"
    }

    fn update(&self, p: &mut Particle, t: f64) {
        let dt = p.delay(t);
        p.position = p.streamed_position(t);
        if let Some(orientation) = p.orientation.as_mut() {
            if let Some(rotated) = orientation
                .direction
                .normalize()
                .rotate_around(&orientation.angular_velocity.normalize(), {
                    let omega = orientation.angular_velocity.norm();
                    omega * dt
                })
            {
                orientation.direction = rotated;
            }
        }
        p.local_clock = t;
    }

    fn sphere_sphere_in_root(
        &self,
        p: &Particle,
        q: &Particle,
        sigma: f64,
        t: f64,
        bc: &BoundaryCondition,
    ) -> Option<f64> {
        let r0 = bc.apply_bc(q.streamed_position(t) - p.streamed_position(t), t);
        let v_rel = q.velocity - p.velocity;
        ballistic_root(r0, v_rel, sigma)
    }

    fn particle_kinetic_energy(&self, p: &Particle, species: &SpeciesTable) -> f64 {
        let mass = species.get(&p.species).map(|s| s.mass).unwrap_or(1.0);
        let translational = 0.5 * mass * p.velocity.norm_squared();
        let rotational = p
            .orientation
            .map(|o| 0.5 * mass * o.angular_velocity.norm_squared())
            .unwrap_or(0.0);
        translational + rotational
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vec3;

    #[test]
    fn kinetic_energy_includes_rotational_term() {
        let dyn_ = NewtonianOrientation;
        let species = SpeciesTable::default();
        let mut p = Particle::new(0);
        p.velocity = Vec3::new(1.0, 0.0, 0.0);
        p.orientation = Some(crate::particle::Orientation {
            direction: Vec3::x_hat(),
            angular_velocity: Vec3::new(0.0, 0.0, 2.0),
        });

        let ke = dyn_.particle_kinetic_energy(&p, &species);
        assert!((ke - (0.5 + 2.0)).abs() < 1e-9);
    }
}

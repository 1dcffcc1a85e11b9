//! Dissipative dynamics with constant gravity and an inelastic collision
//! resolver.
//!
//! Streaming is ballistic, same as [`super::Newtonian`] — matching
//! `DynViscous::streamParticle` in the source, which advances position by
//! `velocity * dt` only and never applies `g` to the trajectory itself.
//! Gravity is carried on the variant for parity with the source's stored
//! `_g` field but does not enter streaming or collision prediction.

use super::{ballistic_root, Liouvillean};
use crate::bc::BoundaryCondition;
use crate::error::EdmdError;
use crate::particle::Particle;
use crate::species::SpeciesTable;
use crate::vector::Vec3;

/// Dissipative dynamics: constant gravitational acceleration plus an
/// inelastic restitution coefficient applied on every pair collision.
pub struct Viscous {
    /// Constant gravitational acceleration.
    pub gravity: Vec3,
    /// Coefficient of restitution, `e ∈ (0, 1]`. `e = 1` recovers an
    /// elastic collision.
    pub restitution: f64,
}

impl Viscous {
    /// Creates a `Viscous` dynamics with the given gravity and restitution.
    pub fn new(gravity: Vec3, restitution: f64) -> Self {
        Viscous {
            gravity,
            restitution,
        }
    }

    /// Reduced mass `M` for a colliding pair.
    ///
    /// The source computed `M = 1/m1 - 1/m2` here and never used the
    /// result — the predictor fell straight through to an unconditional
    /// `return 0`. The physically correct reduced-mass form for an impulse
    /// calculation is the *sum* of inverse masses, `M = 1/m1 + 1/m2`; that
    /// is what the resolver below actually uses.
    fn reduced_mass_inverse(&self, m1: f64, m2: f64) -> f64 {
        1.0 / m1 + 1.0 / m2
    }
}

impl Liouvillean for Viscous {
    fn name(&self) -> &'static str {
        "Viscous"
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
        let inv_reduced = self.reduced_mass_inverse(m1, m2);
        let impulse = (1.0 + self.restitution) * vn / inv_reduced;
        p.velocity = p.velocity + n * (impulse / m1);
        q.velocity = q.velocity - n * (impulse / m2);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_prediction_is_ballistic_regardless_of_gravity() {
        // Same head-on setup as the Newtonian case. Gravity is stored on the
        // variant but never enters streaming or pair prediction, so the
        // root is identical to the Newtonian case: gap 4 - sigma 1, closing
        // at relative speed 2, t = 1.5.
        let dyn_ = Viscous::new(Vec3::new(0.0, -1.0, 0.0), 1.0);
        let bc = BoundaryCondition::Periodic(crate::bc::BoxDimensions::cubic(100.0));

        let mut p = Particle::new(0);
        p.position = Vec3::new(-2.0, 5.0, 0.0);
        p.velocity = Vec3::new(1.0, 0.0, 0.0);

        let mut q = Particle::new(1);
        q.position = Vec3::new(2.0, 5.0, 0.0);
        q.velocity = Vec3::new(-1.0, 0.0, 0.0);

        let t = dyn_
            .sphere_sphere_in_root(&p, &q, 1.0, 0.0, &bc)
            .expect("should collide");
        assert!((t - 1.5).abs() < 1e-9);
    }

    #[test]
    fn inelastic_collision_dissipates_relative_speed() {
        let dyn_ = Viscous::new(Vec3::zero(), 0.5);
        let species = SpeciesTable::default();
        let bc = BoundaryCondition::Periodic(crate::bc::BoxDimensions::cubic(100.0));

        let mut p = Particle::new(0);
        p.position = Vec3::new(-0.5, 0.0, 0.0);
        p.velocity = Vec3::new(1.0, 0.0, 0.0);

        let mut q = Particle::new(1);
        q.position = Vec3::new(0.5, 0.0, 0.0);
        q.velocity = Vec3::new(-1.0, 0.0, 0.0);

        dyn_.resolve_pair(&mut p, &mut q, &species, &bc, 0.0).unwrap();

        let relative_speed_after = (q.velocity - p.velocity).norm();
        assert!(relative_speed_after < 2.0);
    }
}

//! Plain ballistic hard-sphere dynamics: velocities are piecewise-constant
//! between events, trajectories are straight lines.

use super::{ballistic_root, Liouvillean};
use crate::bc::BoundaryCondition;
use crate::particle::Particle;

/// The default dynamics: Newtonian free flight between collisions.
pub struct Newtonian;

impl Liouvillean for Newtonian {
    fn name(&self) -> &'static str {
        "Newtonian"
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bc::BoxDimensions;
    use crate::vector::Vec3;

    #[test]
    fn two_spheres_approaching_head_on() {
        // Separation 4, sigma 1, closing at relative speed 2: contact after
        // the gap (4 - 1 = 3) closes at rate 2, t = 1.5.
        let dyn_ = Newtonian;
        let bc = BoundaryCondition::Periodic(BoxDimensions::cubic(10.0));

        let mut p = Particle::new(0);
        p.position = Vec3::new(-2.0, 0.0, 0.0);
        p.velocity = Vec3::new(1.0, 0.0, 0.0);

        let mut q = Particle::new(1);
        q.position = Vec3::new(2.0, 0.0, 0.0);
        q.velocity = Vec3::new(-1.0, 0.0, 0.0);

        let t = dyn_
            .sphere_sphere_in_root(&p, &q, 1.0, 0.0, &bc)
            .expect("spheres should collide");
        assert!((t - 1.5).abs() < 1e-9);
    }

    #[test]
    fn receding_spheres_never_collide() {
        let dyn_ = Newtonian;
        let bc = BoundaryCondition::Periodic(BoxDimensions::cubic(100.0));

        let mut p = Particle::new(0);
        p.position = Vec3::new(-2.0, 0.0, 0.0);
        p.velocity = Vec3::new(-1.0, 0.0, 0.0);

        let mut q = Particle::new(1);
        q.position = Vec3::new(2.0, 0.0, 0.0);
        q.velocity = Vec3::new(1.0, 0.0, 0.0);

        assert!(dyn_.sphere_sphere_in_root(&p, &q, 1.0, 0.0, &bc).is_none());
    }
}

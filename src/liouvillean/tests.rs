use super::*;
use crate::bc::{BoundaryCondition, BoxDimensions};
use crate::species::SpeciesTable;
use crate::vector::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn andersen_wall_at_x_zero_scenario() {
    // Andersen wall at x = 0, sqrt(T) = 1, particle at (1,0,0) with
    // velocity (-1,0,0): single LOCAL event at t = 1.
    let dyn_ = Dynamics::newtonian();
    let mut p = Particle::new(0);
    p.position = Vec3::new(1.0, 0.0, 0.0);
    p.velocity = Vec3::new(-1.0, 0.0, 0.0);

    let x0 = Vec3::zero();
    let normal = Vec3::x_hat();
    let t = dyn_
        .wall_collision(&p, x0, normal, 0.0)
        .expect("particle should hit the wall");
    assert!((t - 1.0).abs() < 1e-9);

    dyn_.update(&mut p, t);
    let mut rng = StdRng::seed_from_u64(42);
    dyn_.run_andersen_wall_collision(&mut p, normal, 1.0, &mut rng);
    assert!(p.velocity.x > 0.0);
}

#[test]
fn resolve_pair_swaps_velocities_for_equal_mass_head_on() {
    let dyn_ = Dynamics::newtonian();
    let species = SpeciesTable::default();
    let bc = BoundaryCondition::Periodic(BoxDimensions::cubic(10.0));

    let mut p = Particle::new(0);
    p.position = Vec3::new(-0.5, 0.0, 0.0);
    p.velocity = Vec3::new(1.0, 0.0, 0.0);

    let mut q = Particle::new(1);
    q.position = Vec3::new(0.5, 0.0, 0.0);
    q.velocity = Vec3::new(-1.0, 0.0, 0.0);

    dyn_.resolve_pair(&mut p, &mut q, &species, &bc, 0.0).unwrap();

    assert!((p.velocity.x - -1.0).abs() < 1e-9);
    assert!((q.velocity.x - 1.0).abs() < 1e-9);
}

#[test]
fn resolve_pair_conserves_momentum_for_unequal_mass() {
    let dyn_ = Dynamics::newtonian();
    let mut species = SpeciesTable::empty();
    species.insert("Light", crate::species::Species::new(1.0, 1.0));
    species.insert("Heavy", crate::species::Species::new(3.0, 1.0));
    let bc = BoundaryCondition::Periodic(BoxDimensions::cubic(10.0));

    let mut p = Particle::new(0);
    p.species = "Light".to_string();
    p.position = Vec3::new(-0.5, 0.0, 0.0);
    p.velocity = Vec3::new(2.0, 0.0, 0.0);

    let mut q = Particle::new(1);
    q.species = "Heavy".to_string();
    q.position = Vec3::new(0.5, 0.0, 0.0);
    q.velocity = Vec3::new(0.0, 0.0, 0.0);

    let before = 1.0 * p.velocity.x + 3.0 * q.velocity.x;
    dyn_.resolve_pair(&mut p, &mut q, &species, &bc, 0.0).unwrap();
    let after = 1.0 * p.velocity.x + 3.0 * q.velocity.x;

    assert!((before - after).abs() < 1e-9);
}

#[test]
fn k_t_matches_equipartition_for_unit_mass_single_axis() {
    let dyn_ = Dynamics::newtonian();
    let species = SpeciesTable::default();
    let particles: Vec<Particle> = (0..4)
        .map(|i| {
            let mut p = Particle::new(i);
            p.velocity = Vec3::new(1.0, 0.0, 0.0);
            p
        })
        .collect();

    // KE = 4 * 0.5 * 1 * 1 = 2.0; kT = 2*KE/(N*DOF) = 2*2/(4*3) = 1/3
    let kt = dyn_.k_t(&particles, &species, 3);
    assert!((kt - (1.0 / 3.0)).abs() < 1e-9);
}

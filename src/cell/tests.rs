use super::*;
use crate::liouvillean::Dynamics;
use crate::observer::ObserverBus;

#[test]
fn too_few_cells_on_an_axis_is_config_error() {
    // A 5x5x5 box with d_max chosen so N_i = 2 on every axis.
    let positions = vec![Vec3::zero()];
    let box_lengths = Vec3::new(5.0, 5.0, 5.0);
    let result = CellGrid::initialise(&positions, 2.6, box_lengths, 0.0, 1);
    assert!(matches!(result, Err(EdmdError::ConfigError(_))));
}

#[test]
fn single_particle_cell_transit_timing() {
    // Scenario: 1 particle in a 5x5x5 box, N_i=5, lambda=0, k=1, velocity
    // (+1,0,0) from (0,0,0): first CELL event at t=0.5, second at t=1.5.
    let box_lengths = Vec3::new(5.0, 5.0, 5.0);
    // d_max/overlink = 1.0 => N_i = floor(5/1) = 5
    let positions = vec![Vec3::zero()];
    let grid = CellGrid::initialise(&positions, 1.0, box_lengths, 0.0, 1).unwrap();
    assert_eq!(grid.cell_count(), [5, 5, 5]);

    let dyn_ = Dynamics::newtonian();
    let mut p = Particle::new(0);
    p.position = Vec3::zero();
    p.velocity = Vec3::new(1.0, 0.0, 0.0);

    let dt = grid.get_event_time(&p, &dyn_, 0.0);
    assert!((dt - 0.5).abs() < 1e-9, "first transit should be at t=0.5, got {dt}");
}

#[test]
fn run_event_moves_particle_to_neighbouring_cell() {
    let box_lengths = Vec3::new(5.0, 5.0, 5.0);
    let positions = vec![Vec3::zero()];
    let mut grid = CellGrid::initialise(&positions, 1.0, box_lengths, 0.0, 1).unwrap();

    let dyn_ = Dynamics::newtonian();
    let mut p = Particle::new(0);
    p.position = Vec3::zero();
    p.velocity = Vec3::new(1.0, 0.0, 0.0);

    let old_cell = grid.particle_cell(0);
    let mut observers = ObserverBus::new();
    let transit = grid.run_event(&mut p, &dyn_, 0.5, &mut observers);

    assert_eq!(transit.old_cell, old_cell);
    assert_ne!(transit.new_cell, old_cell);
    assert_eq!(grid.particle_cell(0), transit.new_cell);
}

#[test]
fn intrusive_list_integrity_after_several_transits() {
    let box_lengths = Vec3::new(5.0, 5.0, 5.0);
    let positions = vec![Vec3::zero(), Vec3::new(2.0, 2.0, 2.0)];
    let mut grid = CellGrid::initialise(&positions, 1.0, box_lengths, 0.0, 1).unwrap();

    let dyn_ = Dynamics::newtonian();
    let mut p0 = Particle::new(0);
    p0.velocity = Vec3::new(1.0, 0.0, 0.0);
    let mut observers = ObserverBus::new();

    for _ in 0..5 {
        let t = grid.get_event_time(&p0, &dyn_, p0.local_clock) + p0.local_clock;
        grid.run_event(&mut p0, &dyn_, t, &mut observers);
    }

    // Every cell's intrusive list enumerates exactly the particles whose
    // stored cell id matches.
    for cell_id in 0..grid.num_cells() {
        let mut cursor = grid.cell(cell_id).head;
        while cursor >= 0 {
            assert_eq!(grid.particle_cell(cursor as ParticleId), cell_id);
            cursor = grid.next[cursor as usize];
        }
    }
}

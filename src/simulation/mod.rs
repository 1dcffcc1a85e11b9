//! # Simulation
//!
//! The explicit context threaded through every component operation,
//! replacing the source's global `SimData*`: a `Simulation` owns the
//! particle vector, the cell grid, and the scheduler, and lends borrowed
//! references to each for the duration of a single event's resolution —
//! never across event executions (§5's aliasing discipline).

mod logic;
pub mod io;

#[cfg(test)]
mod tests;

pub use logic::{ExecutedEventKind, RunBudget, RunReport, StopReason};

use crate::bc::BoundaryCondition;
use crate::cell::CellGrid;
use crate::error::EdmdError;
use crate::liouvillean::Dynamics;
use crate::local::Local;
use crate::observer::ObserverBus;
use crate::particle::Particle;
use crate::scheduler::{BoundedPqScheduler, Scheduler};
use crate::species::SpeciesTable;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Construction-time parameters for a [`Simulation`].
pub struct SimulationParams {
    /// Initial particle population.
    pub particles: Vec<Particle>,
    /// Species registry the particles' species tags resolve against.
    pub species: SpeciesTable,
    /// Boundary condition applied to relative positions.
    pub bc: BoundaryCondition,
    /// Active dynamics variant.
    pub dynamics: Dynamics,
    /// Stationary local objects (walls, plates).
    pub locals: Vec<Box<dyn Local>>,
    /// Cell grid overlap fraction `λ ∈ [0,1]`.
    pub lambda: f64,
    /// Cell grid overlink factor `k ≥ 1`.
    pub overlink: usize,
    /// RNG seed for thermostat draws; fixes the bit-reproducible event
    /// sequence for a given seed, input and sorter choice.
    pub seed: u64,
}

/// Owns every piece of mutable simulation state and drives the event loop.
pub struct Simulation {
    pub(crate) particles: Vec<Particle>,
    pub(crate) species: SpeciesTable,
    pub(crate) bc: BoundaryCondition,
    pub(crate) dynamics: Dynamics,
    pub(crate) locals: Vec<Box<dyn Local>>,
    pub(crate) cell_grid: CellGrid,
    pub(crate) scheduler: Box<dyn Scheduler>,
    pub(crate) observers: ObserverBus,
    pub(crate) rng: StdRng,
    pub(crate) clock: f64,
    pub(crate) event_count: u64,
    pub(crate) overflow_streak: std::collections::HashMap<u32, u32>,
}

impl Simulation {
    /// Builds a new simulation: constructs the cell grid from the
    /// population's largest species diameter and schedules every
    /// particle's first predicted event.
    pub fn new(params: SimulationParams) -> Result<Self, EdmdError> {
        let n = params.particles.len();
        Simulation::new_with_scheduler(params, Box::new(BoundedPqScheduler::new(n)))
    }

    /// Builds a new simulation with an explicitly chosen scheduler sorter
    /// (the heap [`BoundedPqScheduler`] or the linear-scan `DumbScheduler`),
    /// as selected by the document's `<Scheduler Sorter="..."/>` attribute.
    pub fn new_with_scheduler(params: SimulationParams, scheduler: Box<dyn Scheduler>) -> Result<Self, EdmdError> {
        let d_max = params.species.max_diameter();
        let box_lengths = params.bc.dims().lengths;
        let positions: Vec<_> = params.particles.iter().map(|p| p.position).collect();
        let cell_grid = CellGrid::initialise(&positions, d_max, box_lengths, params.lambda, params.overlink)?;

        let n = params.particles.len();
        let mut sim = Simulation {
            particles: params.particles,
            species: params.species,
            bc: params.bc,
            dynamics: params.dynamics,
            locals: params.locals,
            cell_grid,
            scheduler,
            observers: ObserverBus::new(),
            rng: StdRng::seed_from_u64(params.seed),
            clock: 0.0,
            event_count: 0,
            overflow_streak: std::collections::HashMap::new(),
        };

        for id in 0..n as u32 {
            sim.full_update(id)?;
        }
        sim.observers.fire_reinit();

        Ok(sim)
    }

    /// Current global time.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Total events executed so far.
    pub fn event_count(&self) -> u64 {
        self.event_count
    }

    /// Read-only access to the particle population.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access to the observer bus, for registering callbacks before
    /// running the simulation.
    pub fn observers_mut(&mut self) -> &mut ObserverBus {
        &mut self.observers
    }

    /// Total kinetic energy of the population under the active dynamics.
    pub fn kinetic_energy(&self) -> f64 {
        use crate::liouvillean::Liouvillean;
        self.dynamics.system_kinetic_energy(&self.particles, &self.species)
    }

    /// Total linear momentum of the population.
    pub fn momentum(&self) -> crate::vector::Vec3 {
        self.particles.iter().fold(crate::vector::Vec3::zero(), |acc, p| {
            let mass = self.species.get(&p.species).map(|s| s.mass).unwrap_or(1.0);
            acc + p.velocity * mass
        })
    }
}

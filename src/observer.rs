//! # Observer bus
//!
//! Signals are synchronous callbacks, not channels: the contract is
//! callback-only, and an observer that wants asynchrony must buffer
//! internally rather than retain references to call arguments. Replaces the
//! source's signal-slot objects with plain `Vec<Box<dyn FnMut(...)>>` lists
//! held on the owning object.

use crate::particle::ParticleId;
use crate::vector::Vec3;

/// The pre/post state delta an observer receives when a particle event
/// fires, passed to `sigParticleUpdate`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleUpdate {
    /// Particle whose state changed.
    pub particle_id: ParticleId,
    /// Position before the event was resolved.
    pub position_before: Vec3,
    /// Velocity before the event was resolved.
    pub velocity_before: Vec3,
    /// Position after the event was resolved.
    pub position_after: Vec3,
    /// Velocity after the event was resolved.
    pub velocity_after: Vec3,
    /// Absolute time the event fired.
    pub time: f64,
}

/// Holds the observer callback lists for a simulation.
///
/// Every signal is a `Vec` of boxed `FnMut` closures invoked synchronously,
/// in registration order. No closure may retain a reference past its call;
/// this is enforced structurally by passing only owned/copy values.
#[derive(Default)]
pub struct ObserverBus {
    reinit: Vec<Box<dyn FnMut()>>,
    new_neighbour: Vec<Box<dyn FnMut(ParticleId, ParticleId)>>,
    new_local: Vec<Box<dyn FnMut(ParticleId, u32)>>,
    cell_change: Vec<Box<dyn FnMut(ParticleId, u64)>>,
    particle_update: Vec<Box<dyn FnMut(&ParticleUpdate)>>,
}

impl ObserverBus {
    /// Creates an empty observer bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback for `sigReInitNotify` — fired whenever the
    /// simulation (re)initialises its cell grid or scheduler from scratch.
    pub fn on_reinit(&mut self, f: impl FnMut() + 'static) {
        self.reinit.push(Box::new(f));
    }

    /// Registers a callback for `sigNewNeighbourNotify(p, q)` — fired when a
    /// cell transit brings `q` into `p`'s interaction neighbourhood.
    pub fn on_new_neighbour(&mut self, f: impl FnMut(ParticleId, ParticleId) + 'static) {
        self.new_neighbour.push(Box::new(f));
    }

    /// Registers a callback for `sigNewLocalNotify(p, lid)` — fired when a
    /// cell transit brings local object `lid` into `p`'s range.
    pub fn on_new_local(&mut self, f: impl FnMut(ParticleId, u32) + 'static) {
        self.new_local.push(Box::new(f));
    }

    /// Registers a callback for `sigCellChangeNotify(p, old_cell)` — fired
    /// when `p` transits from `old_cell` to a new resident cell.
    pub fn on_cell_change(&mut self, f: impl FnMut(ParticleId, u64) + 'static) {
        self.cell_change.push(Box::new(f));
    }

    /// Registers a callback for `sigParticleUpdate(event_data)` — fired
    /// after every resolved event, with the pre/post state delta.
    pub fn on_particle_update(&mut self, f: impl FnMut(&ParticleUpdate) + 'static) {
        self.particle_update.push(Box::new(f));
    }

    /// Fires `sigReInitNotify`.
    pub fn fire_reinit(&mut self) {
        for f in self.reinit.iter_mut() {
            f();
        }
    }

    /// Fires `sigNewNeighbourNotify(p, q)`.
    pub fn fire_new_neighbour(&mut self, p: ParticleId, q: ParticleId) {
        for f in self.new_neighbour.iter_mut() {
            f(p, q);
        }
    }

    /// Fires `sigNewLocalNotify(p, lid)`.
    pub fn fire_new_local(&mut self, p: ParticleId, local_id: u32) {
        for f in self.new_local.iter_mut() {
            f(p, local_id);
        }
    }

    /// Fires `sigCellChangeNotify(p, old_cell)`.
    pub fn fire_cell_change(&mut self, p: ParticleId, old_cell: u64) {
        for f in self.cell_change.iter_mut() {
            f(p, old_cell);
        }
    }

    /// Fires `sigParticleUpdate(event_data)`.
    pub fn fire_particle_update(&mut self, update: &ParticleUpdate) {
        for f in self.particle_update.iter_mut() {
            f(update);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn new_neighbour_callback_receives_both_ids() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = ObserverBus::new();
        let seen_clone = seen.clone();
        bus.on_new_neighbour(move |p, q| seen_clone.borrow_mut().push((p, q)));

        bus.fire_new_neighbour(3, 7);
        assert_eq!(*seen.borrow(), vec![(3, 7)]);
    }

    #[test]
    fn multiple_observers_all_fire_in_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut bus = ObserverBus::new();
        let o1 = order.clone();
        bus.on_reinit(move || o1.borrow_mut().push(1));
        let o2 = order.clone();
        bus.on_reinit(move || o2.borrow_mut().push(2));

        bus.fire_reinit();
        assert_eq!(*order.borrow(), vec![1, 2]);
    }
}

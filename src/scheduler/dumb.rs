//! `Dumb`: an O(N) linear-scan scheduler with no heap at all, modelled
//! directly on `dumbsched.cpp`'s flat scan over the particle list. Exists
//! to cross-check [`super::heap::BoundedPqScheduler`] for correctness in
//! tests, not for production use on anything but tiny systems.

use super::Scheduler;
use crate::event::Event;
use crate::particle::ParticleId;

/// Linear-scan scheduler: one slot per particle, extract-min by scanning
/// every slot.
#[derive(Default)]
pub struct DumbScheduler {
    slots: Vec<Option<Event>>,
}

impl DumbScheduler {
    /// Creates an empty scheduler sized for `n_particles` particles.
    pub fn new(n_particles: usize) -> Self {
        DumbScheduler {
            slots: vec![None; n_particles],
        }
    }

    fn ensure_capacity(&mut self, p: ParticleId) {
        let idx = p as usize;
        if idx >= self.slots.len() {
            self.slots.resize_with(idx + 1, || None);
        }
    }

    fn min_index(&self) -> Option<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|ev| (i, ev)))
            .min_by(|(_, a), (_, b)| {
                a.time
                    .partial_cmp(&b.time)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.particle_id.cmp(&b.particle_id))
                    .then_with(|| a.kind.ordinal().cmp(&b.kind.ordinal()))
            })
            .map(|(i, _)| i)
    }
}

impl Scheduler for DumbScheduler {
    fn push_event(&mut self, ev: Event) {
        self.ensure_capacity(ev.particle_id);
        self.slots[ev.particle_id as usize] = Some(ev);
    }

    fn pop_next_event(&mut self) -> Option<Event> {
        let idx = self.min_index()?;
        self.slots[idx].take()
    }

    fn peek_next(&mut self) -> Option<Event> {
        let idx = self.min_index()?;
        self.slots[idx].clone()
    }

    fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}

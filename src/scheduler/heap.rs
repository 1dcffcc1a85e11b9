//! The canonical sorter: a `std::collections::BinaryHeap` over
//! [`crate::event::ScheduledEvent`], with per-particle staleness tags so
//! that superseded entries are dropped lazily on pop rather than removed
//! eagerly (`BinaryHeap` supports no decrease-key operation).

use super::Scheduler;
use crate::event::{Event, ScheduledEvent};
use crate::particle::ParticleId;
use std::collections::BinaryHeap;

/// `(time, kind ordinal)` tag identifying the currently-valid event for a
/// particle, used to recognise and drop stale heap entries on pop.
type SlotTag = (f64, u8);

/// Binary-heap-backed scheduler. The default, production sorter.
#[derive(Default)]
pub struct BoundedPqScheduler {
    heap: BinaryHeap<ScheduledEvent>,
    slots: Vec<Option<SlotTag>>,
    live: usize,
}

impl BoundedPqScheduler {
    /// Creates an empty scheduler sized for `n_particles` particles.
    pub fn new(n_particles: usize) -> Self {
        BoundedPqScheduler {
            heap: BinaryHeap::new(),
            slots: vec![None; n_particles],
            live: 0,
        }
    }

    fn ensure_capacity(&mut self, p: ParticleId) {
        let idx = p as usize;
        if idx >= self.slots.len() {
            self.slots.resize(idx + 1, None);
        }
    }

    fn is_current(&self, ev: &Event) -> bool {
        self.slots
            .get(ev.particle_id as usize)
            .and_then(|s| *s)
            .map(|tag| tag == (ev.time, ev.kind.ordinal()))
            .unwrap_or(false)
    }
}

impl Scheduler for BoundedPqScheduler {
    fn push_event(&mut self, ev: Event) {
        self.ensure_capacity(ev.particle_id);
        let idx = ev.particle_id as usize;
        if self.slots[idx].is_none() {
            self.live += 1;
        }
        self.slots[idx] = Some((ev.time, ev.kind.ordinal()));
        self.heap.push(ScheduledEvent(ev));
    }

    fn pop_next_event(&mut self) -> Option<Event> {
        while let Some(ScheduledEvent(ev)) = self.heap.pop() {
            if self.is_current(&ev) {
                self.slots[ev.particle_id as usize] = None;
                self.live -= 1;
                return Some(ev);
            }
            // Stale entry superseded by a later push_event: drop silently.
        }
        None
    }

    fn peek_next(&mut self) -> Option<Event> {
        loop {
            let top = self.heap.peek()?;
            if self.is_current(&top.0) {
                return Some(top.0.clone());
            }
            self.heap.pop();
        }
    }

    fn len(&self) -> usize {
        self.live
    }
}

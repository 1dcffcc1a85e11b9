//! # Scheduler
//!
//! Maintains, for every particle, the currently predicted next event, and
//! provides extract-min in amortised sublinear time. The sorter backing a
//! scheduler is replaceable: [`heap::BoundedPqScheduler`] is the canonical
//! binary-heap implementation, [`dumb::DumbScheduler`] an O(N) linear-scan
//! baseline (directly modelled on `dumbsched.cpp`) used in tests to
//! cross-check the heap sorter's correctness.
//!
//! Invalidation is NOT an explicit list: after an event involving particles
//! `A` and `B` executes, every previously predicted event that used their
//! old state is stale. Rather than track which events that implicates, each
//! scheduler slot simply records the *current* valid `(time, kind)` tag for
//! its particle; pushing a new event for a particle overwrites the tag, and
//! popping an entry whose tag no longer matches silently discards it. The
//! orchestration that re-predicts `A`, `B` and their neighbours after an
//! event lives in [`crate::simulation`], which is the only code that holds
//! the liouvillean, the cell grid and the scheduler at once.

pub mod dumb;
pub mod heap;

#[cfg(test)]
mod tests;

pub use dumb::DumbScheduler;
pub use heap::BoundedPqScheduler;

use crate::event::Event;
use crate::particle::ParticleId;

/// A priority queue over per-particle predicted events.
pub trait Scheduler {
    /// Inserts or replaces the slot for `ev.particle_id` with `ev`. Any
    /// previously pushed event for that particle becomes stale and will be
    /// silently discarded the next time it would otherwise be popped.
    fn push_event(&mut self, ev: Event);

    /// Removes and returns the current global-minimum event, skipping (and
    /// discarding) any stale entries encountered along the way.
    fn pop_next_event(&mut self) -> Option<Event>;

    /// Returns the current global-minimum event without removing it.
    fn peek_next(&mut self) -> Option<Event>;

    /// Signals that `p`'s slot changed and the sorter should re-heapify if
    /// it needs to. The canonical heap sorter needs no explicit signal
    /// (`BinaryHeap` has no decrease-key; staleness is handled lazily on
    /// pop instead), so the default implementation is a no-op.
    fn sort(&mut self, _p: ParticleId) {}

    /// Number of live (non-stale) scheduler slots.
    fn len(&self) -> usize;

    /// Whether the scheduler currently holds any live slots.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

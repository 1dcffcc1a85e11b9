//! # Events
//!
//! An `Event` is a tuple `(particle_id, absolute_time, kind, payload)`. The
//! scheduler orders events totally by `(time, particle id, event-kind
//! ordinal)`: ties go to the smaller particle id, then to
//! `INTERACTION < CELL < LOCAL < SYSTEM`. `std::collections::BinaryHeap` is a
//! max-heap, so [`ScheduledEvent`]'s `Ord` impl reverses the comparison to
//! turn it into a min-heap.

use crate::particle::ParticleId;
use std::cmp::Ordering;

/// Direction a particle crosses an extended cell boundary along, used as
/// the payload of a `CELL` event.
pub type CellAxis = usize;

/// The kind-specific payload carried by an [`Event`].
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// Predicted pair collision with another particle.
    Interaction { partner: ParticleId },
    /// The particle's streamed position will leave its extended cell along
    /// the given axis.
    Cell { axis: CellAxis },
    /// Collision with a wall, plate, or other stationary local object.
    Local { local_id: u32 },
    /// A scheduled global perturbation (e.g. a periodic thermostat kick).
    System { system_id: u32 },
}

impl EventKind {
    /// Ordinal used for tie-breaking: `INTERACTION < CELL < LOCAL < SYSTEM`.
    pub fn ordinal(&self) -> u8 {
        match self {
            EventKind::Interaction { .. } => 0,
            EventKind::Cell { .. } => 1,
            EventKind::Local { .. } => 2,
            EventKind::System { .. } => 3,
        }
    }
}

/// A predicted event: the particle it belongs to, the absolute time it
/// fires, and its kind-specific payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Particle this event is scheduled against.
    pub particle_id: ParticleId,
    /// Absolute (global) time the event fires.
    pub time: f64,
    /// What kind of event this is and its payload.
    pub kind: EventKind,
}

impl Event {
    /// Creates a new event.
    pub fn new(particle_id: ParticleId, time: f64, kind: EventKind) -> Self {
        Event {
            particle_id,
            time,
            kind,
        }
    }
}

/// Wraps an [`Event`] with the ordering needed to use it as a
/// [`std::collections::BinaryHeap`] entry behaving as a min-heap.
///
/// Total order: `(time, particle_id, kind ordinal)`, ties broken by the
/// smaller particle id then by event-kind ordinal, exactly as specified.
/// `BinaryHeap` pops the *greatest* element, so [`Ord::cmp`] below reverses
/// every comparison.
#[derive(Debug, Clone)]
pub struct ScheduledEvent(pub Event);

impl ScheduledEvent {
    fn key(&self) -> (f64, ParticleId, u8) {
        (self.0.time, self.0.particle_id, self.0.kind.ordinal())
    }
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for ScheduledEvent {}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        let (t1, p1, k1) = other.key();
        let (t2, p2, k2) = self.key();
        t1.partial_cmp(&t2)
            .unwrap_or(Ordering::Equal)
            .then_with(|| p1.cmp(&p2))
            .then_with(|| k1.cmp(&k2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BinaryHeap;

    fn interaction(particle_id: ParticleId, time: f64) -> ScheduledEvent {
        ScheduledEvent(Event::new(
            particle_id,
            time,
            EventKind::Interaction { partner: 0 },
        ))
    }

    #[test]
    fn binary_heap_pops_earliest_time_first() {
        let mut heap = BinaryHeap::new();
        heap.push(interaction(0, 5.0));
        heap.push(interaction(1, 1.0));
        heap.push(interaction(2, 3.0));

        assert_eq!(heap.pop().unwrap().0.time, 1.0);
        assert_eq!(heap.pop().unwrap().0.time, 3.0);
        assert_eq!(heap.pop().unwrap().0.time, 5.0);
    }

    #[test]
    fn ties_break_by_smaller_particle_id_then_kind_ordinal() {
        let mut heap = BinaryHeap::new();
        heap.push(ScheduledEvent(Event::new(
            2,
            1.0,
            EventKind::Local { local_id: 0 },
        )));
        heap.push(interaction(2, 1.0));
        heap.push(interaction(1, 1.0));

        let first = heap.pop().unwrap();
        assert_eq!(first.0.particle_id, 1);
        let second = heap.pop().unwrap();
        assert_eq!(second.0.particle_id, 2);
        assert!(matches!(second.0.kind, EventKind::Interaction { .. }));
        let third = heap.pop().unwrap();
        assert!(matches!(third.0.kind, EventKind::Local { .. }));
    }
}

//! The event loop proper: extract-min, stream, dispatch, re-predict.
//!
//! Single-threaded by design (§5's concurrency model) — the only
//! parallelism anywhere near this loop is [`crate::liouvillean::Liouvillean::update_all`],
//! which runs only at construction and reinitialisation, never between two
//! steps of [`super::Simulation::run_until`].

use super::Simulation;
use crate::error::EdmdError;
use crate::event::{Event, EventKind};
use crate::liouvillean::Liouvillean;
use crate::observer::ParticleUpdate;
use crate::particle::ParticleId;
use crate::scheduler::Scheduler;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cancellation budget for [`Simulation::run_until`].
#[derive(Default)]
pub struct RunBudget {
    /// Stop once this many events have been executed.
    pub max_events: Option<u64>,
    /// Stop once this much wall-clock time has elapsed.
    pub max_wall_clock: Option<Duration>,
    /// Externally-flipped stop flag, checked once per iteration — the
    /// `Ctrl-C`/signal-handler path generalises here rather than through a
    /// dedicated `SIGINT` handler inside the loop itself.
    pub stop_flag: Option<Arc<AtomicBool>>,
}

/// Why [`Simulation::run_until`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// `max_events` was reached.
    EventLimit,
    /// `max_wall_clock` elapsed.
    WallClock,
    /// `stop_flag` was observed set.
    ExternalStop,
    /// The scheduler ran dry — every particle's predicted event list is
    /// empty (a fully quiescent system, or every remaining particle had its
    /// predictions rejected as numeric overflows).
    SchedulerExhausted,
}

/// Summary of a [`Simulation::run_until`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunReport {
    /// Number of events executed during this call.
    pub events_executed: u64,
    /// Global time after the last executed event.
    pub final_time: f64,
    /// Why the loop stopped.
    pub stop_reason: StopReason,
}

/// A dispatched event's kind, without the scheduler bookkeeping payload —
/// returned from [`Simulation::step`] for callers that want per-event
/// visibility beyond the observer bus (e.g. a CLI progress line).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutedEventKind {
    /// A resolved pair collision.
    Interaction {
        /// The other particle in the collision.
        partner: ParticleId,
    },
    /// A cell transit.
    Cell,
    /// A resolved local-object collision.
    Local {
        /// The local object's id.
        local_id: u32,
    },
    /// A system-level event.
    System {
        /// The system event's id.
        system_id: u32,
    },
}

/// Borrows two distinct elements of `slice` mutably at once.
///
/// # Panics
/// Panics if `i == j`.
fn index_two_mut<T>(slice: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    assert_ne!(i, j, "cannot borrow the same particle twice");
    if i < j {
        let (left, right) = slice.split_at_mut(j);
        (&mut left[i], &mut right[0])
    } else {
        let (left, right) = slice.split_at_mut(i);
        (&mut right[0], &mut left[j])
    }
}

impl Simulation {
    /// Runs the event loop until `budget` says to stop or the scheduler runs
    /// dry.
    pub fn run_until(&mut self, budget: RunBudget) -> Result<RunReport, EdmdError> {
        let start = Instant::now();
        let mut events_executed = 0u64;

        let stop_reason = loop {
            if let Some(max) = budget.max_events {
                if events_executed >= max {
                    break StopReason::EventLimit;
                }
            }
            if let Some(limit) = budget.max_wall_clock {
                if start.elapsed() >= limit {
                    break StopReason::WallClock;
                }
            }
            if let Some(flag) = &budget.stop_flag {
                if flag.load(Ordering::Relaxed) {
                    break StopReason::ExternalStop;
                }
            }

            match self.step()? {
                Some(_) => events_executed += 1,
                None => break StopReason::SchedulerExhausted,
            }
        };

        Ok(RunReport {
            events_executed,
            final_time: self.clock,
            stop_reason,
        })
    }

    /// Executes exactly one event: extract-min, advance the clock, dispatch
    /// by kind, re-predict. Returns `None` once the scheduler is empty.
    pub fn step(&mut self) -> Result<Option<ExecutedEventKind>, EdmdError> {
        let ev = match self.scheduler.pop_next_event() {
            Some(ev) => ev,
            None => return Ok(None),
        };

        if ev.time + crate::liouvillean::NUMERIC_SLACK < self.clock {
            return Err(EdmdError::InvariantViolation(format!(
                "popped event for particle {} at t={} behind global clock t={}",
                ev.particle_id, ev.time, self.clock
            )));
        }
        self.clock = ev.time.max(self.clock);
        self.event_count += 1;

        let executed = match ev.kind.clone() {
            EventKind::Interaction { partner } => {
                self.dispatch_interaction(ev.particle_id, partner)?;
                ExecutedEventKind::Interaction { partner }
            }
            EventKind::Cell { .. } => {
                self.dispatch_cell(ev.particle_id)?;
                ExecutedEventKind::Cell
            }
            EventKind::Local { local_id } => {
                self.dispatch_local(ev.particle_id, local_id)?;
                ExecutedEventKind::Local { local_id }
            }
            EventKind::System { system_id } => {
                self.dispatch_system(ev.particle_id, system_id)?;
                ExecutedEventKind::System { system_id }
            }
        };

        Ok(Some(executed))
    }

    fn dispatch_interaction(&mut self, p_id: ParticleId, q_id: ParticleId) -> Result<(), EdmdError> {
        let t = self.clock;
        self.dynamics.update(&mut self.particles[p_id as usize], t);
        self.dynamics.update(&mut self.particles[q_id as usize], t);

        let position_before_p = self.particles[p_id as usize].position;
        let velocity_before_p = self.particles[p_id as usize].velocity;
        let position_before_q = self.particles[q_id as usize].position;
        let velocity_before_q = self.particles[q_id as usize].velocity;

        {
            let (p, q) = index_two_mut(&mut self.particles, p_id as usize, q_id as usize);
            self.dynamics.resolve_pair(p, q, &self.species, &self.bc, t)?;
        }

        let p_after = &self.particles[p_id as usize];
        self.observers.fire_particle_update(&ParticleUpdate {
            particle_id: p_id,
            position_before: position_before_p,
            velocity_before: velocity_before_p,
            position_after: p_after.position,
            velocity_after: p_after.velocity,
            time: t,
        });
        let q_after = &self.particles[q_id as usize];
        self.observers.fire_particle_update(&ParticleUpdate {
            particle_id: q_id,
            position_before: position_before_q,
            velocity_before: velocity_before_q,
            position_after: q_after.position,
            velocity_after: q_after.velocity,
            time: t,
        });

        self.full_update(p_id)?;
        self.full_update(q_id)?;
        Ok(())
    }

    fn dispatch_cell(&mut self, p_id: ParticleId) -> Result<(), EdmdError> {
        let t = self.clock;
        let mut p = self.particles[p_id as usize].clone();
        let position_before = p.position;
        let velocity_before = p.velocity;

        self.cell_grid.run_event(&mut p, &self.dynamics, t, &mut self.observers);

        self.observers.fire_particle_update(&ParticleUpdate {
            particle_id: p_id,
            position_before,
            velocity_before,
            position_after: p.position,
            velocity_after: p.velocity,
            time: t,
        });

        self.particles[p_id as usize] = p;
        self.full_update(p_id)?;
        Ok(())
    }

    fn dispatch_local(&mut self, p_id: ParticleId, local_id: u32) -> Result<(), EdmdError> {
        let t = self.clock;
        let local_idx = self
            .locals
            .iter()
            .position(|l| l.id() == local_id)
            .ok_or_else(|| {
                EdmdError::InvariantViolation(format!(
                    "scheduled LOCAL event referenced unknown local {local_id}"
                ))
            })?;

        let mut p = self.particles[p_id as usize].clone();
        self.locals[local_idx].run_event(&mut p, &self.dynamics, t, &mut self.rng, &mut self.observers);
        self.particles[p_id as usize] = p;

        self.full_update(p_id)?;
        Ok(())
    }

    fn dispatch_system(&mut self, p_id: ParticleId, system_id: u32) -> Result<(), EdmdError> {
        log::info!("system event {system_id} fired (particle {p_id}, t={})", self.clock);
        Ok(())
    }

    /// Re-predicts `p`'s next event, then re-predicts every particle in its
    /// interaction neighbourhood — the invalidation step that replaces an
    /// explicit scheduler-removal list: after `p`'s state changes, any
    /// pair event another particle had predicted against it is stale, so
    /// that particle needs a fresh prediction too.
    pub(super) fn full_update(&mut self, p_id: ParticleId) -> Result<(), EdmdError> {
        self.predict_particle(p_id)?;

        let mut neighbours = Vec::new();
        self.cell_grid.get_particle_neighbourhood(p_id, |q| neighbours.push(q));
        for q_id in neighbours {
            self.predict_particle(q_id)?;
        }
        Ok(())
    }

    /// Computes `p`'s next predicted event — the earliest of its `CELL`
    /// transit, any attached `LOCAL` collision, and every pairwise
    /// `INTERACTION` against its cell neighbourhood — and pushes it to the
    /// scheduler. A particle with no finite predicted event (free-floating
    /// in an unbounded system, say) is simply left with no scheduler slot.
    pub(super) fn predict_particle(&mut self, p_id: ParticleId) -> Result<(), EdmdError> {
        let t = self.clock;
        let idx = p_id as usize;

        let mut best_time = f64::INFINITY;
        let mut best_kind: Option<EventKind> = None;

        {
            let p = &self.particles[idx];
            let dt = self.cell_grid.get_event_time(p, &self.dynamics, t);
            let candidate = t + dt;
            if candidate.is_finite() && candidate < best_time {
                let cell_id = self.cell_grid.particle_cell(p_id);
                let origin = self.cell_grid.cell(cell_id).origin;
                let axis = self
                    .dynamics
                    .square_cell_collision_3(p, origin, self.cell_grid.cell_dimension(), t);
                best_time = candidate;
                best_kind = Some(EventKind::Cell { axis });
            }
        }

        {
            let cell_id = self.cell_grid.particle_cell(p_id);
            let local_ids = self.cell_grid.cell(cell_id).locals.clone();
            let p = &self.particles[idx];
            for local_id in local_ids {
                if let Some(local) = self.locals.iter().find(|l| l.id() == local_id) {
                    if let Some(dt) = local.get_event(p, &self.dynamics, t) {
                        let candidate = t + dt;
                        if candidate < best_time {
                            best_time = candidate;
                            best_kind = Some(EventKind::Local { local_id });
                        }
                    }
                }
            }
        }

        {
            let mut neighbours = Vec::new();
            self.cell_grid.get_particle_neighbourhood(p_id, |q| neighbours.push(q));
            let p = self.particles[idx].clone();
            for q_id in neighbours {
                let q = &self.particles[q_id as usize];
                let sigma = self.pair_sigma(&p.species, &q.species)?;
                if let Some(dt) = self.dynamics.sphere_sphere_in_root(&p, q, sigma, t, &self.bc) {
                    let candidate = t + dt;
                    if candidate < best_time {
                        best_time = candidate;
                        best_kind = Some(EventKind::Interaction { partner: q_id });
                    }
                }
            }
        }

        match best_kind {
            Some(kind) if best_time.is_finite() => {
                self.overflow_streak.remove(&p_id);
                self.scheduler.push_event(Event::new(p_id, best_time, kind));
                self.scheduler.sort(p_id);
                Ok(())
            }
            Some(_) => self.record_overflow(p_id),
            None => Ok(()),
        }
    }

    fn pair_sigma(&self, species_p: &str, species_q: &str) -> Result<f64, EdmdError> {
        let a = self.species.resolve(species_p)?;
        let b = self.species.resolve(species_q)?;
        Ok(0.5 * (a.diameter + b.diameter))
    }

    /// Drops a single non-finite prediction with a counter increment;
    /// promotes to a hard [`EdmdError::InvariantViolation`] once the same
    /// particle has overflowed three times running, on the assumption a
    /// transient numeric blowup recovers but a persistent one signals a
    /// broken invariant upstream.
    fn record_overflow(&mut self, p_id: ParticleId) -> Result<(), EdmdError> {
        let streak = self.overflow_streak.entry(p_id).or_insert(0);
        *streak += 1;
        if *streak > 3 {
            return Err(EdmdError::InvariantViolation(format!(
                "particle {p_id} repeatedly produced a non-finite predicted event time"
            )));
        }
        log::warn!("numeric overflow predicting next event for particle {p_id} (streak {streak})");
        Ok(())
    }
}

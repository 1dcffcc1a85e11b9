use super::*;
use crate::event::{Event, EventKind};

fn sample_events() -> Vec<Event> {
    vec![
        Event::new(0, 5.0, EventKind::Interaction { partner: 1 }),
        Event::new(1, 1.0, EventKind::Cell { axis: 0 }),
        Event::new(2, 3.0, EventKind::Local { local_id: 0 }),
        Event::new(3, 1.0, EventKind::System { system_id: 0 }),
    ]
}

#[test]
fn heap_scheduler_pops_in_time_order() {
    let mut sched = BoundedPqScheduler::new(4);
    for ev in sample_events() {
        sched.push_event(ev);
    }
    let mut times = Vec::new();
    while let Some(ev) = sched.pop_next_event() {
        times.push(ev.time);
    }
    assert_eq!(times, vec![1.0, 1.0, 3.0, 5.0]);
}

#[test]
fn dumb_and_heap_schedulers_agree_on_pop_order() {
    let mut heap = BoundedPqScheduler::new(4);
    let mut dumb = DumbScheduler::new(4);
    for ev in sample_events() {
        heap.push_event(ev.clone());
        dumb.push_event(ev);
    }

    loop {
        let a = heap.pop_next_event();
        let b = dumb.pop_next_event();
        assert_eq!(a.map(|e| (e.particle_id, e.time)), b.map(|e| (e.particle_id, e.time)));
        if heap.is_empty() {
            break;
        }
    }
}

#[test]
fn pushing_a_new_event_for_a_particle_invalidates_the_old_one() {
    let mut sched = BoundedPqScheduler::new(2);
    sched.push_event(Event::new(0, 10.0, EventKind::Interaction { partner: 1 }));
    sched.push_event(Event::new(0, 2.0, EventKind::Interaction { partner: 1 }));
    sched.push_event(Event::new(1, 20.0, EventKind::Interaction { partner: 0 }));

    let first = sched.pop_next_event().unwrap();
    assert_eq!(first.time, 2.0);
    let second = sched.pop_next_event().unwrap();
    assert_eq!(second.time, 20.0);
    assert!(sched.pop_next_event().is_none());
}

#[test]
fn peek_next_does_not_remove() {
    let mut sched = BoundedPqScheduler::new(1);
    sched.push_event(Event::new(0, 1.0, EventKind::Interaction { partner: 1 }));
    assert_eq!(sched.peek_next().unwrap().time, 1.0);
    assert_eq!(sched.len(), 1);
    assert_eq!(sched.pop_next_event().unwrap().time, 1.0);
}

//! Bounded clock and bucketed timer wheel.
//!
//! The wheel keys each bucket by the absolute wrapped tick, so insertion,
//! cancellation and dispatch never scan other buckets. An actor sits in at
//! most one bucket, and that bucket always matches its recorded next tick.

use std::collections::HashMap;

use crate::config::AutomationConfig;
use crate::state::{ActorId, Tick};

/// Cyclic counter advanced once per heartbeat.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickClock {
    current: Tick,
}

impl TickClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the clock at `tick` instead of zero.
    pub fn starting_at(tick: Tick) -> Self {
        Self {
            current: Tick::ZERO.wrapping_add(tick.0 as u32),
        }
    }

    pub fn current(&self) -> Tick {
        self.current
    }

    /// Moves to the next slot, wrapping from [`Tick::MAX`] to zero.
    pub fn advance(&mut self) -> Tick {
        self.current = self.current.wrapping_add(1);
        self.current
    }
}

/// Tick-indexed buckets of actors waiting for their next action.
#[derive(Clone, Debug, Default)]
pub struct TimerWheel {
    clock: TickClock,
    buckets: HashMap<Tick, Vec<ActorId>>,
    next_action: HashMap<ActorId, Tick>,
}

impl TimerWheel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clock(clock: TickClock) -> Self {
        Self {
            clock,
            ..Self::default()
        }
    }

    pub fn current(&self) -> Tick {
        self.clock.current()
    }

    pub fn advance(&mut self) -> Tick {
        self.clock.advance()
    }

    /// Schedules `actor` to run `delay` ticks from now and returns the target slot.
    ///
    /// The target is `(current + max(1, delay)) mod (MAX_TICK + 1)`. A delay of
    /// a whole lap lands on the current slot, which was already drained, so the
    /// actor runs one lap later. Any previous entry for the actor is replaced.
    pub fn schedule_at(&mut self, actor: ActorId, delay: i64) -> Tick {
        let delay = delay.max(1).rem_euclid(i64::from(Tick::SLOTS)) as u32;
        let target = self.clock.current().wrapping_add(delay);

        self.remove_from_bucket(actor);
        self.buckets.entry(target).or_default().push(actor);
        self.next_action.insert(actor, target);

        tracing::trace!(%actor, tick = %target, delay, "scheduled");
        target
    }

    /// Removes `actor` from the wheel. Returns the slot it was waiting on.
    pub fn cancel(&mut self, actor: ActorId) -> Option<Tick> {
        let tick = self.remove_from_bucket(actor);
        self.next_action.remove(&actor);
        tick
    }

    /// Drains the bucket for the current tick, in insertion order.
    pub fn take_due(&mut self) -> Vec<ActorId> {
        let due = self
            .buckets
            .remove(&self.clock.current())
            .unwrap_or_default();
        for actor in &due {
            self.next_action.remove(actor);
        }
        due
    }

    pub fn scheduled_tick(&self, actor: ActorId) -> Option<Tick> {
        self.next_action.get(&actor).copied()
    }

    /// Actors waiting on `tick`, in insertion order.
    pub fn bucket(&self, tick: Tick) -> &[ActorId] {
        self.buckets.get(&tick).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_scheduled(&self, actor: ActorId) -> bool {
        self.next_action.contains_key(&actor)
    }

    /// Number of scheduled actors.
    pub fn len(&self) -> usize {
        self.next_action.len()
    }

    pub fn is_empty(&self) -> bool {
        self.next_action.is_empty()
    }

    /// Number of non-empty buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    fn remove_from_bucket(&mut self, actor: ActorId) -> Option<Tick> {
        let tick = self.next_action.get(&actor).copied()?;
        if let Some(bucket) = self.buckets.get_mut(&tick) {
            bucket.retain(|&queued| queued != actor);
            if bucket.is_empty() {
                self.buckets.remove(&tick);
            }
        }
        Some(tick)
    }
}

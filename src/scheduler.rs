use std::time::{Duration, Instant};

/// Host-side clock that decides when the session's tick is due.
///
/// The session never owns timing: the host polls input with [`timeout`],
/// then calls [`fire_if_due`] and ticks the session when it returns true.
///
/// [`timeout`]: TickScheduler::timeout
/// [`fire_if_due`]: TickScheduler::fire_if_due
#[derive(Clone, Debug)]
pub struct TickScheduler {
    interval: Duration,
    last_tick: Instant,
    armed: bool,
}

impl TickScheduler {
    pub fn new(interval: Duration) -> Self {
        Self::starting_at(interval, Instant::now())
    }

    pub fn starting_at(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            last_tick: now,
            armed: true,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Time left until the next tick, or `None` while disarmed.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_at(Instant::now())
    }

    pub fn timeout_at(&self, now: Instant) -> Option<Duration> {
        if !self.armed {
            return None;
        }
        let elapsed = now.saturating_duration_since(self.last_tick);
        Some(self.interval.saturating_sub(elapsed))
    }

    pub fn fire_if_due(&mut self) -> bool {
        self.fire_if_due_at(Instant::now())
    }

    pub fn fire_if_due_at(&mut self, now: Instant) -> bool {
        if !self.armed || now.saturating_duration_since(self.last_tick) < self.interval {
            return false;
        }
        self.last_tick = now;
        true
    }

    pub fn disarm(&mut self) {
        self.armed = false;
    }

    pub fn rearm(&mut self) {
        self.rearm_at(Instant::now());
    }

    pub fn rearm_at(&mut self, now: Instant) {
        self.armed = true;
        self.last_tick = now;
    }
}

//! Fixed-delay scheduler that drives simulation ticks
//!
//! The interval is read each time the clock is re-armed, so changing it takes
//! effect from the next fire onwards and never shortens a wait already under
//! way.

use std::time::Duration;
use tokio::time::{Instant, sleep_until};

/// What the clock should do after a callback returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockControl {
    /// Keep firing at the current interval
    Continue,
    /// Keep firing, at a new interval from the next fire on
    Retime(Duration),
    /// Stop the loop
    Stop,
}

#[derive(Debug)]
pub struct SimulationClock {
    interval: Duration,
    deadline: Option<Instant>,
}

impl SimulationClock {
    pub fn new(interval: Duration) -> Self {
        debug_assert!(!interval.is_zero(), "tick interval must be positive");
        Self {
            interval,
            deadline: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Change the interval used by the next `rearm`
    pub fn set_interval(&mut self, interval: Duration) {
        debug_assert!(!interval.is_zero(), "tick interval must be positive");
        self.interval = interval;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Schedule the next fire one interval from now
    pub fn rearm(&mut self) {
        self.deadline = Some(Instant::now() + self.interval);
    }

    /// Wait for the next fire.
    ///
    /// Arms the clock first if it is not armed. Cancel-safe: dropping the
    /// future keeps the deadline, so it can be used inside `tokio::select!`.
    /// The clock is disarmed once it fires; call `rearm` after handling the
    /// tick.
    pub async fn tick(&mut self) {
        if self.deadline.is_none() {
            self.rearm();
        }
        let deadline = self.deadline.unwrap_or_else(Instant::now);
        sleep_until(deadline).await;
        self.deadline = None;
    }

    /// Run `callback` on every fire until it returns `ClockControl::Stop`.
    ///
    /// The clock re-arms after the callback completes.
    ///
    /// For callers that own nothing else to wait on. The TUI loop in
    /// `modes::human` shares its `select!` with input, so it drives `tick` and
    /// `rearm` directly instead.
    pub async fn on_interval<F>(&mut self, mut callback: F)
    where
        F: FnMut() -> ClockControl,
    {
        loop {
            self.tick().await;
            match callback() {
                ClockControl::Continue => {}
                ClockControl::Retime(interval) => self.set_interval(interval),
                ClockControl::Stop => break,
            }
            self.rearm();
        }
    }
}

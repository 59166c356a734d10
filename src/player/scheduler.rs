//! A cancellable repeating task for animation playback.
//!
//! There is no background thread: the owner asks how long to wait (and
//! passes that to `crossterm::event::poll`), then calls `poll` to see whether
//! the task fired. A task that is stopped never fires.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default)]
pub struct RepeatingTask {
    /// `(interval, next due instant)` while running.
    running: Option<(Duration, Instant)>,
    fired: u64,
}

impl RepeatingTask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    pub fn interval(&self) -> Option<Duration> {
        self.running.map(|(interval, _)| interval)
    }

    /// Number of times the task fired since it was last started.
    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// Start firing every `interval`, first at `now + interval`. Starting an
    /// already running task restarts it.
    pub fn start(&mut self, now: Instant, interval: Duration) {
        self.stop();
        let interval = interval.max(Duration::from_millis(1));
        self.running = Some((interval, now + interval));
    }

    pub fn stop(&mut self) {
        self.running = None;
        self.fired = 0;
    }

    /// Stop, then start with a new interval.
    pub fn restart(&mut self, now: Instant, interval: Duration) {
        self.stop();
        self.start(now, interval);
    }

    /// Time left until the next firing, or `None` when stopped.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.running
            .map(|(_, due)| due.saturating_duration_since(now))
    }

    /// Fire at most once if the task is due, and re-arm for the next interval.
    ///
    /// Missed intervals are skipped rather than replayed, so a stalled caller
    /// never receives a burst of ticks.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some((interval, due)) = self.running else {
            return false;
        };
        if now < due {
            return false;
        }
        let mut next = due + interval;
        if next <= now {
            next = now + interval;
        }
        self.running = Some((interval, next));
        self.fired += 1;
        true
    }
}

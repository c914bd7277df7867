//! Clock-driven debounce.
//!
//! Scheduling replaces whatever was pending; `poll` hands the item back once
//! the delay has passed with no newer schedule. The caller supplies the
//! clock, so this works the same under a browser timer and in tests.

use web_time::{Duration, Instant};

#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn from_millis(ms: u32) -> Self {
        Self::new(Duration::from_millis(u64::from(ms)))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `item`, returning the one it supersedes.
    pub fn schedule(&mut self, now: Instant, item: T) -> Option<T> {
        self.pending
            .replace((now + self.delay, item))
            .map(|(_, item)| item)
    }

    /// Take the pending item if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((deadline, _)) if now >= *deadline => self.pending.take().map(|(_, item)| item),
            _ => None,
        }
    }

    /// When the pending item becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the pending item.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, item)| item)
    }
}

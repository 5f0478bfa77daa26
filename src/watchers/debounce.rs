use std::time::{Duration, Instant};

/// Search input settle delay in milliseconds
pub const SEARCH_DEBOUNCE_MS: u64 = 300;

/// Holds back a rapidly changing value until it has been stable for `delay`.
///
/// Every `push` restarts the wait. `poll` hands out the settled value exactly
/// once.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Record a new value observed at `now`
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// Take the value if it has been stable for the full delay
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, changed_at)) if now.saturating_duration_since(*changed_at) >= self.delay => {
                self.pending.take().map(|(value, _)| value)
            }
            _ => None,
        }
    }

    /// Drop any pending value
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Settle immediately, skipping the wait
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

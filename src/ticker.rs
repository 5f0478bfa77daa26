use chrono::{DateTime, Local};
use std::time::{Duration, Instant};

/// Default tick interval in milliseconds
pub const DEFAULT_TICK_MS: u64 = 250;

/// Clock display refresh interval in milliseconds
pub const CLOCK_INTERVAL_MS: u64 = 1000;

/// Get tick duration
pub fn tick_duration() -> Duration {
    Duration::from_millis(DEFAULT_TICK_MS)
}

/// Source of wall-clock timestamps for task records
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

/// The real local clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock for tests: starts at a fixed instant, advances one second per read
#[cfg(test)]
#[derive(Debug)]
pub struct FixedClock {
    next: std::cell::Cell<DateTime<Local>>,
}

#[cfg(test)]
impl FixedClock {
    pub fn new() -> Self {
        use chrono::TimeZone;
        Self {
            next: std::cell::Cell::new(Local.timestamp_opt(1_700_000_000, 0).unwrap()),
        }
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        let now = self.next.get();
        self.next.set(now + chrono::Duration::seconds(1));
        now
    }
}

/// Repeating timer polled from the event loop.
/// Fires at most once per `poll`, and never more often than `period`.
#[derive(Debug)]
pub struct Interval {
    period: Duration,
    next_due: Option<Instant>,
}

impl Interval {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_due: None,
        }
    }

    /// Arm the timer; the first firing happens immediately
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Returns true when the period has elapsed since the last firing
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                // Skip missed periods instead of firing a burst
                let mut next = due + self.period;
                while next <= now {
                    next += self.period;
                }
                self.next_due = Some(next);
                true
            }
            _ => false,
        }
    }
}

/// Header clock: emits the current time once per second
pub struct ClockWatcher {
    interval: Interval,
    current: DateTime<Local>,
}

impl ClockWatcher {
    pub fn new() -> Self {
        Self {
            interval: Interval::new(Duration::from_millis(CLOCK_INTERVAL_MS)),
            current: Local::now(),
        }
    }

    pub fn start(&mut self) {
        self.interval.start(Instant::now());
    }

    pub fn stop(&mut self) {
        self.interval.stop();
    }

    /// Refresh the reading if a second has passed; returns the new reading
    pub fn poll(&mut self, now: Instant, clock: &dyn Clock) -> Option<DateTime<Local>> {
        if self.interval.poll(now) {
            self.current = clock.now();
            Some(self.current)
        } else {
            None
        }
    }

    /// Last emitted reading
    pub fn current(&self) -> DateTime<Local> {
        self.current
    }
}

pub mod connectivity;
pub mod debounce;
pub mod shortcut;

pub use connectivity::{AlwaysOnline, ConnectivityWatcher, TcpProbe, PROBE_INTERVAL};
pub use debounce::{Debouncer, SEARCH_DEBOUNCE_MS};
pub use shortcut::{Shortcut, ShortcutWatcher};

use crate::ticker::ClockWatcher;
use std::time::Duration;

/// How connectivity is checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeConfig {
    /// TCP connect to host:port
    Tcp(String),
    /// Checking disabled, always online
    Off,
}

impl ProbeConfig {
    /// Parse the `--offline-check` value ("off" or host:port)
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("off") {
            Self::Off
        } else {
            Self::Tcp(value.to_string())
        }
    }
}

/// Every environment watcher, started and stopped together
pub struct Watchers {
    pub clock: ClockWatcher,
    pub connectivity: ConnectivityWatcher,
    pub search: Debouncer<String>,
    pub shortcut: ShortcutWatcher,
}

impl Watchers {
    pub fn new() -> Self {
        Self {
            clock: ClockWatcher::new(),
            connectivity: ConnectivityWatcher::new(PROBE_INTERVAL),
            search: Debouncer::new(Duration::from_millis(SEARCH_DEBOUNCE_MS)),
            shortcut: ShortcutWatcher::new(Shortcut::focus_search()),
        }
    }

    pub fn start(&mut self, probe: &ProbeConfig) {
        self.clock.start();
        self.shortcut.start();
        match probe {
            ProbeConfig::Tcp(addr) => self.connectivity.start(TcpProbe::new(addr.clone())),
            ProbeConfig::Off => self.connectivity.start(AlwaysOnline),
        }
    }

    pub fn stop(&mut self) {
        self.clock.stop();
        self.shortcut.stop();
        self.search.cancel();
        self.connectivity.stop();
        tracing::info!("watchers stopped");
    }
}

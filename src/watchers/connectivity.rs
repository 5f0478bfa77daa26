use std::net::{TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Default reachability target (a public DNS resolver)
pub const DEFAULT_PROBE_ADDR: &str = "1.1.1.1:53";

/// How often the background thread re-probes
pub const PROBE_INTERVAL: Duration = Duration::from_secs(5);

/// Connect timeout for a single probe
pub const PROBE_TIMEOUT: Duration = Duration::from_millis(800);

/// Answers "are we online right now?"
pub trait Probe: Send + 'static {
    fn is_online(&self) -> bool;
}

/// Online if a TCP connection to `addr` succeeds within the timeout
#[derive(Debug, Clone)]
pub struct TcpProbe {
    addr: String,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            timeout: PROBE_TIMEOUT,
        }
    }
}

impl Probe for TcpProbe {
    fn is_online(&self) -> bool {
        let addrs = match self.addr.to_socket_addrs() {
            Ok(addrs) => addrs,
            Err(e) => {
                tracing::debug!(addr = %self.addr, error = %e, "probe address did not resolve");
                return false;
            }
        };
        addrs
            .into_iter()
            .any(|addr| TcpStream::connect_timeout(&addr, self.timeout).is_ok())
    }
}

/// Probe used when checking is disabled
#[derive(Debug, Clone, Copy)]
pub struct AlwaysOnline;

impl Probe for AlwaysOnline {
    fn is_online(&self) -> bool {
        true
    }
}

/// Tracks online/offline transitions.
///
/// Starts out online. A background thread probes right away and then
/// periodically, sending transitions through a channel; the UI loop drains it
/// with `poll`, so the flag only ever changes on the UI thread and a slow probe
/// never blocks it.
pub struct ConnectivityWatcher {
    online: bool,
    interval: Duration,
    rx: Option<mpsc::Receiver<bool>>,
    stop_flag: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl ConnectivityWatcher {
    pub fn new(interval: Duration) -> Self {
        Self {
            online: true,
            interval,
            rx: None,
            stop_flag: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    /// Watch in the background; the first probe runs on the watcher thread
    pub fn start<P: Probe>(&mut self, probe: P) {
        self.stop();

        self.online = true;
        tracing::info!("connectivity watcher started");

        let (tx, rx) = mpsc::channel();
        let stop_flag = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop_flag);
        let interval = self.interval;
        let mut last = self.online;

        let spawned = thread::Builder::new()
            .name("connectivity".to_string())
            .spawn(move || loop {
                let now = probe.is_online();
                if now != last {
                    last = now;
                    if tx.send(now).is_err() {
                        break;
                    }
                }
                if !sleep_unless_stopped(&thread_stop, interval) {
                    break;
                }
            });

        match spawned {
            Ok(handle) => {
                self.rx = Some(rx);
                self.stop_flag = stop_flag;
                self.handle = Some(handle);
            }
            Err(e) => tracing::warn!(error = %e, "could not spawn connectivity thread"),
        }
    }

    /// Apply queued transitions; returns the new state if it changed
    pub fn poll(&mut self) -> Option<bool> {
        let rx = self.rx.as_ref()?;
        let before = self.online;
        while let Ok(online) = rx.try_recv() {
            self.online = online;
        }
        if self.online != before {
            tracing::info!(online = self.online, "connectivity changed");
            Some(self.online)
        } else {
            None
        }
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Stop the background thread and wait for it
    pub fn stop(&mut self) {
        self.stop_flag.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("connectivity thread panicked");
            }
        }
        self.rx = None;
    }
}

impl Drop for ConnectivityWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Sleep for `total` in short slices; false if asked to stop meanwhile
fn sleep_unless_stopped(stop_flag: &AtomicBool, total: Duration) -> bool {
    let slice = Duration::from_millis(50).min(total);
    let deadline = Instant::now() + total;
    loop {
        if stop_flag.load(Ordering::SeqCst) {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        thread::sleep(slice.min(deadline - now));
    }
}

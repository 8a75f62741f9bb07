//! Tick scheduling
//!
//! The countdown only reacts to ticks; how ticks are produced is a capability
//! injected into the session. `ThreadTicker` drives real sessions, while
//! `ManualTicker` lets tests call `tick()` themselves.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, warn};

/// One elapsed interval, stamped with the run that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub generation: u64,
}

/// Periodic scheduling capability
pub trait Ticker {
    /// Begin producing ticks. No-op if already active.
    ///
    /// Returns whether the ticker is active afterwards; false means no ticks
    /// will arrive.
    fn start(&mut self) -> bool;

    /// Stop producing ticks. No-op if inactive.
    fn cancel(&mut self);

    fn is_active(&self) -> bool;

    /// Identifies the current run; bumped on every `start()`
    fn generation(&self) -> u64;

    /// Whether `tick` belongs to the current, still active run
    fn is_current(&self, tick: &Tick) -> bool {
        self.is_active() && tick.generation == self.generation()
    }
}

/// Ticker driven by hand
#[derive(Debug, Clone, Default)]
pub struct ManualTicker {
    active: bool,
    generation: u64,
    starts: usize,
    cancels: usize,
    refuse_starts: bool,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A tick for the current run
    pub fn tick(&self) -> Tick {
        Tick {
            generation: self.generation,
        }
    }

    /// Number of times the ticker actually started
    pub fn starts(&self) -> usize {
        self.starts
    }

    /// Number of times an active ticker was cancelled
    pub fn cancels(&self) -> usize {
        self.cancels
    }

    /// Make later `start()` calls fail, as if no scheduler were available
    pub fn refuse_starts(&mut self, refuse: bool) {
        self.refuse_starts = refuse;
    }
}

impl Ticker for ManualTicker {
    fn start(&mut self) -> bool {
        if !self.active && !self.refuse_starts {
            self.active = true;
            self.generation += 1;
            self.starts += 1;
        }
        self.active
    }

    fn cancel(&mut self) {
        if self.active {
            self.active = false;
            self.cancels += 1;
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn generation(&self) -> u64 {
        self.generation
    }
}

struct Worker {
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
}

/// Background thread sending a `Tick` every interval
///
/// Ticks are delivered over an mpsc channel so the session itself stays on
/// the caller's thread. Cancelling (or dropping) the ticker stops the thread
/// promptly without waiting for the current interval to elapse.
pub struct ThreadTicker {
    interval: Duration,
    tx: Sender<Tick>,
    generation: u64,
    worker: Option<Worker>,
}

impl ThreadTicker {
    /// Create a ticker and the receiving end of its tick channel
    pub fn new(interval: Duration) -> (Self, Receiver<Tick>) {
        let (tx, rx) = mpsc::channel();
        let ticker = Self {
            interval,
            tx,
            generation: 0,
            worker: None,
        };
        (ticker, rx)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Ticker for ThreadTicker {
    fn start(&mut self) -> bool {
        if self.is_active() {
            return true;
        }
        // Reap a worker whose thread already exited
        self.cancel();

        self.generation += 1;
        let generation = self.generation;
        let interval = self.interval;
        let tx = self.tx.clone();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let spawned = thread::Builder::new()
            .name("ambient-ticker".to_string())
            .spawn(move || loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        if tx.send(Tick { generation }).is_err() {
                            break;
                        }
                    }
                    // Stop requested or ticker dropped
                    _ => break,
                }
            });

        match spawned {
            Ok(handle) => {
                debug!("[TICKER] Started run {} every {:?}", generation, interval);
                self.worker = Some(Worker { stop_tx, handle });
                true
            }
            Err(e) => {
                warn!("[TICKER] Could not spawn ticker thread: {}", e);
                false
            }
        }
    }

    fn cancel(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };

        // The thread may already have exited if the receiver went away
        let _ = worker.stop_tx.send(());
        if worker.handle.join().is_err() {
            warn!("[TICKER] Ticker thread panicked");
        }
        debug!("[TICKER] Cancelled run {}", self.generation);
    }

    fn is_active(&self) -> bool {
        self.worker
            .as_ref()
            .map_or(false, |worker| !worker.handle.is_finished())
    }

    fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for ThreadTicker {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_ticker_generations() {
        let mut ticker = ManualTicker::new();
        assert!(!ticker.is_active());

        assert!(ticker.start());
        let first = ticker.tick();
        assert!(ticker.is_current(&first));

        assert!(ticker.start()); // already active
        assert_eq!(ticker.starts(), 1);

        ticker.cancel();
        assert!(!ticker.is_current(&first));
        ticker.start();
        assert!(!ticker.is_current(&first));
        assert!(ticker.is_current(&ticker.tick()));
        assert_eq!(ticker.cancels(), 1);
    }

    #[test]
    fn test_manual_ticker_refusing_starts() {
        let mut ticker = ManualTicker::new();
        ticker.refuse_starts(true);

        assert!(!ticker.start());
        assert!(!ticker.is_active());
        assert_eq!(ticker.starts(), 0);
        assert_eq!(ticker.generation(), 0);

        ticker.refuse_starts(false);
        assert!(ticker.start());
        assert_eq!(ticker.generation(), 1);
    }

    #[test]
    fn test_thread_ticker_delivers_ticks() {
        let (mut ticker, rx) = ThreadTicker::new(Duration::from_millis(5));
        assert!(ticker.start());
        assert!(ticker.is_active());

        let tick = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(tick.generation, 1);
        assert!(ticker.is_current(&tick));

        ticker.cancel();
        assert!(!ticker.is_active());
    }

    #[test]
    fn test_thread_ticker_cancel_is_prompt() {
        let (mut ticker, rx) = ThreadTicker::new(Duration::from_secs(3600));
        ticker.start();
        ticker.cancel();

        // Nothing was sent and the worker is gone
        assert!(rx.try_recv().is_err());
        assert!(!ticker.is_active());
    }

    #[test]
    fn test_stale_ticks_rejected_after_restart() {
        let (mut ticker, rx) = ThreadTicker::new(Duration::from_millis(5));
        ticker.start();
        let stale = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        ticker.cancel();
        ticker.start();

        assert!(!ticker.is_current(&stale));
        ticker.cancel();
    }
}

//! Mock track backend
//!
//! Records every controller call into a shared `TrackLedger` so tests (and
//! the CLI's silent mode) can observe what the mix engine did without real
//! audio. Single-threaded by construction, like the sessions it serves.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use log::{debug, warn};

use super::track::{AudioTrack, TrackBackend};

/// Observed state of one mock track
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackRecord {
    /// Creation index within the ledger
    pub index: usize,
    pub source_ref: Option<String>,
    pub loaded: bool,
    pub playing: bool,
    pub volume: f32,
    pub play_calls: usize,
    pub pause_calls: usize,
    pub dispose_calls: usize,
}

#[derive(Debug, Default)]
struct LedgerInner {
    records: Vec<TrackRecord>,
    failing_sources: HashSet<String>,
}

/// Shared log of every track a `MockBackend` created
#[derive(Debug, Clone, Default)]
pub struct TrackLedger {
    inner: Rc<RefCell<LedgerInner>>,
}

impl TrackLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracks ever created
    pub fn created(&self) -> usize {
        self.inner.borrow().records.len()
    }

    /// Total `dispose()` calls across all tracks
    pub fn dispose_calls(&self) -> usize {
        self.inner.borrow().records.iter().map(|r| r.dispose_calls).sum()
    }

    /// Tracks created but never disposed
    pub fn live(&self) -> usize {
        self.inner
            .borrow()
            .records
            .iter()
            .filter(|r| r.dispose_calls == 0)
            .count()
    }

    /// Snapshot of every record in creation order
    pub fn records(&self) -> Vec<TrackRecord> {
        self.inner.borrow().records.clone()
    }

    pub fn record(&self, index: usize) -> Option<TrackRecord> {
        self.inner.borrow().records.get(index).cloned()
    }

    /// Most recently created, still-live track bound to `source_ref`
    pub fn live_for(&self, source_ref: &str) -> Option<TrackRecord> {
        self.inner
            .borrow()
            .records
            .iter()
            .rev()
            .find(|r| r.dispose_calls == 0 && r.source_ref.as_deref() == Some(source_ref))
            .cloned()
    }

    fn fails(&self, source_ref: &str) -> bool {
        self.inner.borrow().failing_sources.contains(source_ref)
    }

    fn push(&self) -> usize {
        let mut inner = self.inner.borrow_mut();
        let index = inner.records.len();
        inner.records.push(TrackRecord {
            index,
            volume: 1.0,
            ..TrackRecord::default()
        });
        index
    }

    fn update(&self, index: usize, f: impl FnOnce(&mut TrackRecord)) {
        if let Some(record) = self.inner.borrow_mut().records.get_mut(index) {
            f(record);
        }
    }

    fn get(&self, index: usize) -> TrackRecord {
        self.record(index).unwrap_or_default()
    }
}

/// Track that only records what was asked of it
#[derive(Debug)]
pub struct MockTrack {
    index: usize,
    ledger: TrackLedger,
}

impl MockTrack {
    pub fn index(&self) -> usize {
        self.index
    }
}

impl AudioTrack for MockTrack {
    fn load(&mut self, source_ref: &str) {
        let loaded = !self.ledger.fails(source_ref);
        if !loaded {
            warn!("[MOCK {}] Simulated load failure for '{}'", self.index, source_ref);
        }
        self.ledger.update(self.index, |r| {
            if r.dispose_calls == 0 {
                r.source_ref = Some(source_ref.to_string());
                r.loaded = loaded;
            }
        });
    }

    fn play(&mut self) {
        self.ledger.update(self.index, |r| {
            r.play_calls += 1;
            if r.loaded && r.dispose_calls == 0 {
                r.playing = true;
            }
        });
    }

    fn pause(&mut self) {
        self.ledger.update(self.index, |r| {
            r.pause_calls += 1;
            r.playing = false;
        });
    }

    fn set_volume(&mut self, volume: f32) {
        self.ledger.update(self.index, |r| r.volume = volume);
    }

    fn dispose(&mut self) {
        debug!("[MOCK {}] Disposed", self.index);
        self.ledger.update(self.index, |r| {
            r.dispose_calls += 1;
            r.playing = false;
            r.loaded = false;
        });
    }

    fn is_loaded(&self) -> bool {
        self.ledger.get(self.index).loaded
    }

    fn is_playing(&self) -> bool {
        self.ledger.get(self.index).playing
    }

    fn volume(&self) -> f32 {
        self.ledger.get(self.index).volume
    }
}

/// Backend producing `MockTrack`s that share one ledger
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    ledger: TrackLedger,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the ledger; clones observe the same tracks
    pub fn ledger(&self) -> TrackLedger {
        self.ledger.clone()
    }

    /// Make every future `load(source_ref)` fail
    pub fn fail_source(&self, source_ref: &str) {
        self.ledger
            .inner
            .borrow_mut()
            .failing_sources
            .insert(source_ref.to_string());
    }
}

impl TrackBackend for MockBackend {
    type Track = MockTrack;

    fn create_track(&mut self) -> MockTrack {
        let index = self.ledger.push();
        MockTrack {
            index,
            ledger: self.ledger.clone(),
        }
    }
}

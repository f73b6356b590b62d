//! Cell-level change detection ("blink" flags).
//!
//! Every displayed price cell is keyed by its grid coordinates. Each pass is
//! diffed against exactly the previous pass's formatted snapshot:
//! - a cell with no prior observation is recorded, never flagged
//! - an unchanged formatted value is not flagged
//! - a changed formatted value is flagged until its window elapses
//!
//! A flag's expiry is fixed when it is first raised. Further changes inside
//! the window do not extend it.

use crate::models::{CanonicalMarket, PriceLevel, Side};
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use std::time::{Duration, Instant};
use tracing::debug;

/// Grid coordinates of one price cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub market_index: usize,
    pub row_index: usize,
    pub side: Side,
    pub column: usize,
}

impl CellKey {
    pub fn new(market_index: usize, row_index: usize, side: Side, column: usize) -> Self {
        Self {
            market_index,
            row_index,
            side,
            column,
        }
    }
}

/// Formatted value of every cell from one pass
#[derive(Debug, Default, Clone)]
pub struct OddsMemory {
    cells: FxHashMap<CellKey, PriceLevel>,
}

impl OddsMemory {
    pub fn snapshot(markets: &[CanonicalMarket]) -> Self {
        let mut cells = FxHashMap::default();
        for (market_index, market) in markets.iter().enumerate() {
            for (row_index, row) in market.rows.iter().enumerate() {
                for side in [Side::Back, Side::Lay] {
                    for (column, level) in row.levels(side).iter().enumerate() {
                        cells.insert(
                            CellKey::new(market_index, row_index, side, column),
                            level.clone(),
                        );
                    }
                }
            }
        }
        Self { cells }
    }

    pub fn get(&self, key: &CellKey) -> Option<&PriceLevel> {
        self.cells.get(key)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Active flags with their fixed expiry
#[derive(Debug, Default, Clone)]
pub struct BlinkSet {
    expires_at: FxHashMap<CellKey, Instant>,
}

impl BlinkSet {
    /// Flag a cell. Returns false if it was already flagged; its expiry is kept.
    pub fn flag(&mut self, key: CellKey, expires_at: Instant) -> bool {
        match self.expires_at.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(expires_at);
                true
            }
        }
    }

    pub fn is_active(&self, key: &CellKey, now: Instant) -> bool {
        self.expires_at.get(key).is_some_and(|exp| *exp > now)
    }

    /// Drop every flag whose window has elapsed; returns how many were removed
    pub fn sweep(&mut self, now: Instant) -> usize {
        let before = self.expires_at.len();
        self.expires_at.retain(|_, exp| *exp > now);
        before - self.expires_at.len()
    }

    pub fn active(&self, now: Instant) -> Vec<CellKey> {
        let mut keys: Vec<CellKey> = self
            .expires_at
            .iter()
            .filter(|(_, exp)| **exp > now)
            .map(|(key, _)| *key)
            .collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.expires_at.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expires_at.is_empty()
    }

    pub fn clear(&mut self) {
        self.expires_at.clear();
    }
}

/// Outcome of one detection pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Cells whose formatted value changed since the previous pass
    pub changed: Vec<CellKey>,
    /// Subset of `changed` that was not already flagged
    pub newly_flagged: Vec<CellKey>,
    /// Number of cells in this pass
    pub observed: usize,
}

impl PassReport {
    pub fn has_changes(&self) -> bool {
        !self.changed.is_empty()
    }
}

pub struct ChangeDetector {
    window: Duration,
    memory: OddsMemory,
    blinks: BlinkSet,
}

impl ChangeDetector {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            memory: OddsMemory::default(),
            blinks: BlinkSet::default(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn memory(&self) -> &OddsMemory {
        &self.memory
    }

    pub fn observe(&mut self, markets: &[CanonicalMarket]) -> PassReport {
        self.observe_at(markets, Instant::now())
    }

    /// Diff `markets` against the previous pass, flag changes, then replace
    /// the stored snapshot wholesale.
    pub fn observe_at(&mut self, markets: &[CanonicalMarket], now: Instant) -> PassReport {
        self.blinks.sweep(now);

        let current = OddsMemory::snapshot(markets);
        let expires_at = now + self.window;
        let mut report = PassReport {
            observed: current.len(),
            ..PassReport::default()
        };

        for (key, level) in &current.cells {
            let Some(previous) = self.memory.get(key) else {
                continue;
            };
            if previous == level {
                continue;
            }
            report.changed.push(*key);
            if self.blinks.flag(*key, expires_at) {
                report.newly_flagged.push(*key);
            }
        }
        report.changed.sort();
        report.newly_flagged.sort();

        if report.has_changes() {
            debug!(
                changed = report.changed.len(),
                newly_flagged = report.newly_flagged.len(),
                observed = report.observed,
                "odds changes detected"
            );
        }

        self.memory = current;
        report
    }

    pub fn sweep(&mut self, now: Instant) -> usize {
        self.blinks.sweep(now)
    }

    pub fn is_blinking(&self, key: &CellKey, now: Instant) -> bool {
        self.blinks.is_active(key, now)
    }

    pub fn active_blinks(&self, now: Instant) -> Vec<CellKey> {
        self.blinks.active(now)
    }

    /// Flags still held, including expired ones not yet swept
    pub fn held_flags(&self) -> usize {
        self.blinks.len()
    }

    /// Forget the stored snapshot and every active flag
    pub fn clear(&mut self) {
        self.memory = OddsMemory::default();
        self.blinks.clear();
    }
}

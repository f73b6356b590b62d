//! Live board: a thread-safe host around [`Pipeline`] and [`ChangeDetector`].
//!
//! All pass state lives behind one `parking_lot::Mutex`, so a refresh holds
//! the lock from reconciliation through snapshot commit and passes never
//! overlap. A background tokio task sweeps expired flags on a fixed cadence;
//! it is aborted on [`LiveBoard::shutdown`] and when the board is dropped.

use crate::config::PipelineConfig;
use crate::detector::{CellKey, ChangeDetector, PassReport};
use crate::error::BoardError;
use crate::models::CanonicalMarket;
use crate::pipeline::{FeedSnapshot, Pipeline};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};

const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

/// Result of one refresh
#[derive(Debug, Clone)]
pub struct BoardUpdate {
    pub markets: Vec<CanonicalMarket>,
    pub report: PassReport,
}

struct BoardState {
    pipeline: Pipeline,
    detector: ChangeDetector,
    markets: Vec<CanonicalMarket>,
    passes: u64,
}

pub struct LiveBoard {
    state: Arc<Mutex<BoardState>>,
    sweep_interval: Duration,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl LiveBoard {
    pub fn new(config: &PipelineConfig) -> Self {
        Self::with_pipeline(Pipeline::new(config), config)
    }

    pub fn with_pipeline(pipeline: Pipeline, config: &PipelineConfig) -> Self {
        let state = BoardState {
            pipeline,
            detector: ChangeDetector::new(config.blink_window),
            markets: Vec::new(),
            passes: 0,
        };
        Self {
            state: Arc::new(Mutex::new(state)),
            sweep_interval: config.blink_sweep_interval.max(MIN_SWEEP_INTERVAL),
            sweeper: Mutex::new(None),
        }
    }

    /// Run one full pass and commit its snapshot
    pub fn refresh(&self, snapshot: &FeedSnapshot) -> BoardUpdate {
        self.refresh_at(snapshot, Instant::now())
    }

    pub fn refresh_at(&self, snapshot: &FeedSnapshot, now: Instant) -> BoardUpdate {
        let mut state = self.state.lock();
        let markets = state.pipeline.reconcile(snapshot);
        let report = state.detector.observe_at(&markets, now);
        state.markets = markets.clone();
        state.passes += 1;

        trace!(
            pass = state.passes,
            markets = markets.len(),
            changed = report.changed.len(),
            "board refreshed"
        );
        BoardUpdate { markets, report }
    }

    /// Markets from the last committed pass
    pub fn markets(&self) -> Vec<CanonicalMarket> {
        self.state.lock().markets.clone()
    }

    pub fn passes(&self) -> u64 {
        self.state.lock().passes
    }

    pub fn is_blinking(&self, key: &CellKey) -> bool {
        self.state.lock().detector.is_blinking(key, Instant::now())
    }

    pub fn active_blinks(&self) -> Vec<CellKey> {
        self.state.lock().detector.active_blinks(Instant::now())
    }

    /// Flags not yet removed by a sweep
    pub fn held_flags(&self) -> usize {
        self.state.lock().detector.held_flags()
    }

    /// Spawn the flag sweeper on the current tokio runtime. No-op if running.
    pub fn start_sweeper(&self) -> Result<(), BoardError> {
        let mut sweeper = self.sweeper.lock();
        if sweeper.as_ref().is_some_and(|task| !task.is_finished()) {
            return Ok(());
        }

        let handle = Handle::try_current().map_err(|_| BoardError::NoRuntime)?;
        let state = Arc::downgrade(&self.state);
        let period = self.sweep_interval;
        *sweeper = Some(handle.spawn(sweep_loop(state, period)));

        debug!(interval_ms = period.as_millis() as u64, "blink sweeper started");
        Ok(())
    }

    pub fn is_sweeping(&self) -> bool {
        self.sweeper
            .lock()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Cancel the sweeper and drop every pending flag
    pub fn shutdown(&self) {
        if let Some(task) = self.sweeper.lock().take() {
            task.abort();
            info!("blink sweeper stopped");
        }
        self.state.lock().detector.clear();
    }
}

impl Drop for LiveBoard {
    fn drop(&mut self) {
        if let Some(task) = self.sweeper.get_mut().take() {
            task.abort();
        }
    }
}

async fn sweep_loop(state: Weak<Mutex<BoardState>>, period: Duration) {
    let mut interval = tokio::time::interval(period);
    loop {
        interval.tick().await;
        let Some(state) = state.upgrade() else {
            break;
        };
        let removed = state.lock().detector.sweep(Instant::now());
        if removed > 0 {
            trace!(removed, "expired blink flags swept");
        }
    }
}

//! Explicit logging handle.
//!
//! `Telemetry` owns the subscriber instead of installing it globally. `main`
//! installs it as the thread default for the duration of the run and hands a
//! reference to each crawler, which reports run counters through it.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::dispatcher::{DefaultGuard, Dispatch};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Countable outcomes of a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    PageVisited,
    PageSkipped,
    RecordInserted,
    RecordDropped,
    GeocodeMiss,
}

#[derive(Default)]
struct Counters {
    pages_visited: AtomicUsize,
    pages_skipped: AtomicUsize,
    records_inserted: AtomicUsize,
    records_dropped: AtomicUsize,
    geocode_misses: AtomicUsize,
}

impl Counters {
    fn slot(&self, event: Event) -> &AtomicUsize {
        match event {
            Event::PageVisited => &self.pages_visited,
            Event::PageSkipped => &self.pages_skipped,
            Event::RecordInserted => &self.records_inserted,
            Event::RecordDropped => &self.records_dropped,
            Event::GeocodeMiss => &self.geocode_misses,
        }
    }
}

pub struct Telemetry {
    dispatch: Dispatch,
    counters: Counters,
}

impl Telemetry {
    /// Build a formatter subscriber filtered by `filter` (RUST_LOG syntax).
    pub fn new(filter: &str) -> Self {
        let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
        let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();

        Self {
            dispatch: Dispatch::new(subscriber),
            counters: Counters::default(),
        }
    }

    /// Handle with no output, for tests and library callers that log elsewhere.
    pub fn silent() -> Self {
        Self {
            dispatch: Dispatch::none(),
            counters: Counters::default(),
        }
    }

    /// Route this thread's events to the handle until the guard drops.
    pub fn set_default(&self) -> DefaultGuard {
        tracing::dispatcher::set_default(&self.dispatch)
    }

    pub fn record(&self, event: Event) {
        self.counters.slot(event).fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self, event: Event) -> usize {
        self.counters.slot(event).load(Ordering::Relaxed)
    }
}

/// Outcome of one site's crawl
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub site: &'static str,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub pages_visited: usize,
    pub pages_skipped: usize,
    pub records_inserted: usize,
    pub records_dropped: usize,
    pub geocode_misses: usize,
}

impl RunSummary {
    pub fn log(&self) {
        let elapsed = self.finished_at - self.started_at;
        info!(
            site = self.site,
            pages = self.pages_visited,
            skipped_pages = self.pages_skipped,
            inserted = self.records_inserted,
            dropped = self.records_dropped,
            geocode_misses = self.geocode_misses,
            elapsed_secs = elapsed.num_seconds(),
            "Crawl finished"
        );
    }
}

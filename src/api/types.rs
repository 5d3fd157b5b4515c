//! Shared context handed to every handler.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Process-wide counters surfaced by the health endpoint. Cloned freely;
/// clones share the same counters.
#[derive(Clone)]
pub struct AppContext {
    started_at: Instant,
    processed: Arc<AtomicU64>,
}

impl AppContext {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            processed: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Bump the processed-image counter.
    pub fn record_processed(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn processed_count(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}

//! Wall-clock utilities for stamping dataset items.
//!
//! Dataset file names embed integer epoch seconds. The clock is injected
//! rather than read ad hoc so batch runs can be replayed deterministically.

use std::sync::atomic::{AtomicI64, Ordering};

/// Source of "now" as whole seconds since the Unix epoch.
pub trait EpochClock: Send + Sync {
    fn now_epoch_secs(&self) -> i64;
}

/// The real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl EpochClock for SystemClock {
    fn now_epoch_secs(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// A clock that only moves when told to.
///
/// Useful for reproducible dataset names and for exercising the
/// same-second collision path.
#[derive(Debug, Default)]
pub struct ManualClock {
    secs: AtomicI64,
}

impl ManualClock {
    /// Create a clock frozen at `secs`.
    pub fn at(secs: i64) -> Self {
        Self {
            secs: AtomicI64::new(secs),
        }
    }

    /// Move the clock forward by `delta` seconds.
    pub fn advance(&self, delta: i64) {
        self.secs.fetch_add(delta, Ordering::SeqCst);
    }

    /// Jump to an absolute value.
    pub fn set(&self, secs: i64) {
        self.secs.store(secs, Ordering::SeqCst);
    }
}

impl EpochClock for ManualClock {
    fn now_epoch_secs(&self) -> i64 {
        self.secs.load(Ordering::SeqCst)
    }
}

/// Render epoch seconds as RFC 3339 for log output.
pub fn epoch_to_rfc3339(secs: i64) -> String {
    chrono::DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| secs.to_string())
}

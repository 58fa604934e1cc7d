//! Time source abstraction
//!
//! Key expiry, key derivation and mock timestamps all read wall-clock time
//! through [`Clock`] so tests can pin it.

use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Wall-clock source in unix milliseconds
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;

    /// Unix seconds, truncated
    fn now_secs(&self) -> i64 {
        self.now_ms().div_euclid(1000)
    }
}

/// System time via chrono
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Manually driven clock
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicI64,
}

impl ManualClock {
    pub fn new(start_ms: i64) -> Self {
        Self {
            now_ms: AtomicI64::new(start_ms),
        }
    }

    pub fn set(&self, now_ms: i64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance_ms(&self, delta_ms: i64) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

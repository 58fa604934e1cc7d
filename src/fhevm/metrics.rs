//! Encryption path counters
//!
//! Makes the real/mock branch observable to operators.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct ClientMetrics {
    /// `initialize` calls on supported networks
    init_attempts: Arc<AtomicU64>,
    /// Initialisations that ended in mock mode
    init_failures: Arc<AtomicU64>,
    /// Payloads produced by the SDK
    real_encryptions: Arc<AtomicU64>,
    /// Payloads produced by the mock encoder
    mock_encryptions: Arc<AtomicU64>,
    /// Real attempts that failed and fell back to mock
    fallbacks: Arc<AtomicU64>,
}

/// Point-in-time copy of [`ClientMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub init_attempts: u64,
    pub init_failures: u64,
    pub real_encryptions: u64,
    pub mock_encryptions: u64,
    pub fallbacks: u64,
}

impl ClientMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_init_attempt(&self) {
        self.init_attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_init_failure(&self) {
        self.init_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_real(&self) {
        self.real_encryptions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_mock(&self) {
        self.mock_encryptions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback(&self) {
        self.fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            init_attempts: self.init_attempts.load(Ordering::Relaxed),
            init_failures: self.init_failures.load(Ordering::Relaxed),
            real_encryptions: self.real_encryptions.load(Ordering::Relaxed),
            mock_encryptions: self.mock_encryptions.load(Ordering::Relaxed),
            fallbacks: self.fallbacks.load(Ordering::Relaxed),
        }
    }
}

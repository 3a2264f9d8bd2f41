//! Outcome reporters.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use warden_core::error::ErrorKind;
use warden_core::traits::AuthReporter;

/// Discards every outcome.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl AuthReporter for NoopReporter {
    fn success(&self, _operation: &'static str) {}

    fn failure(&self, _operation: &'static str, _kind: ErrorKind) {}
}

/// Per-operation counters.
#[derive(Debug, Default)]
struct OperationCounters {
    succeeded: AtomicU64,
    failed: AtomicU64,
    internal: AtomicU64,
}

/// Counts outcomes per operation in memory.
#[derive(Debug, Default)]
pub struct CounterReporter {
    operations: DashMap<&'static str, OperationCounters>,
}

impl CounterReporter {
    /// Create zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a snapshot of all counters, keyed by operation.
    pub fn snapshot(&self) -> BTreeMap<&'static str, OperationSnapshot> {
        self.operations
            .iter()
            .map(|entry| {
                let counters = entry.value();
                let snapshot = OperationSnapshot {
                    succeeded: counters.succeeded.load(Ordering::Relaxed),
                    failed: counters.failed.load(Ordering::Relaxed),
                    internal: counters.internal.load(Ordering::Relaxed),
                };
                (*entry.key(), snapshot)
            })
            .collect()
    }

    /// Snapshot of a single operation; zero if it never ran.
    pub fn operation(&self, operation: &str) -> OperationSnapshot {
        self.snapshot().remove(operation).unwrap_or_default()
    }
}

impl AuthReporter for CounterReporter {
    fn success(&self, operation: &'static str) {
        self.operations
            .entry(operation)
            .or_default()
            .succeeded
            .fetch_add(1, Ordering::Relaxed);
    }

    fn failure(&self, operation: &'static str, kind: ErrorKind) {
        let counters = self.operations.entry(operation).or_default();
        counters.failed.fetch_add(1, Ordering::Relaxed);
        if kind.is_internal() {
            counters.internal.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Serializable counters of one operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationSnapshot {
    /// Calls that succeeded
    pub succeeded: u64,
    /// Calls that returned any error
    pub failed: u64,
    /// Calls that returned an internal error
    pub internal: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_by_operation() {
        let reporter = CounterReporter::new();
        reporter.success("login");
        reporter.failure("login", ErrorKind::BadCredentials);
        reporter.failure("login", ErrorKind::Internal);

        let login = reporter.operation("login");
        assert_eq!(login.succeeded, 1);
        assert_eq!(login.failed, 2);
        assert_eq!(login.internal, 1);
        assert_eq!(reporter.operation("logout"), OperationSnapshot::default());
    }
}

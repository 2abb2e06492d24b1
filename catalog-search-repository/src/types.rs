//! Request and response types for search index operations.

/// Outcome of a single bulk index request.
///
/// Mirrors a "stats only" bulk: failures are counted, not retried or
/// reported per item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkStats {
    /// Documents the engine accepted.
    pub succeeded: usize,
    /// Documents the engine rejected.
    pub failed: usize,
}

impl BulkStats {
    pub fn new(succeeded: usize, failed: usize) -> Self {
        Self { succeeded, failed }
    }

    /// Stats for a request that failed as a whole.
    pub fn all_failed(count: usize) -> Self {
        Self {
            succeeded: 0,
            failed: count,
        }
    }

    /// Total number of documents in the request.
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

impl std::ops::AddAssign for BulkStats {
    fn add_assign(&mut self, other: Self) {
        self.succeeded += other.succeeded;
        self.failed += other.failed;
    }
}

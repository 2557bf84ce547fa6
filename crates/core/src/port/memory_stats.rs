// Memory statistics port
// reason: async-trait so adapters can be shared as Arc<dyn _>
use async_trait::async_trait;

use crate::domain::MemoryStats;
use crate::error::Result;

/// Host capability yielding total physical memory
#[async_trait]
pub trait MemoryStatsProvider: Send + Sync {
    /// Read total installed physical memory
    ///
    /// # Errors
    /// ProbeError if the host memory service cannot be queried
    async fn memory_stats(&self) -> Result<MemoryStats>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::ProbeError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Mock MemoryStatsProvider for testing
    pub struct MockMemoryStats {
        outcome: Mutex<Result<MemoryStats>>,
        calls: AtomicUsize,
    }

    impl MockMemoryStats {
        pub fn new(total_bytes: u64) -> Self {
            Self {
                outcome: Mutex::new(Ok(MemoryStats { total_bytes })),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                outcome: Mutex::new(Err(ProbeError::new(message))),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn set_total_bytes(&self, total_bytes: u64) {
            *self.outcome.lock().unwrap() = Ok(MemoryStats { total_bytes });
        }

        pub fn fail_with(&self, message: &str) {
            *self.outcome.lock().unwrap() = Err(ProbeError::new(message));
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MemoryStatsProvider for MockMemoryStats {
        async fn memory_stats(&self) -> Result<MemoryStats> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.lock().unwrap().clone()
        }
    }
}

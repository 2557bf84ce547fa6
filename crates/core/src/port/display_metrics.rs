// Display metrics port
use async_trait::async_trait;

use crate::domain::DisplayMetrics;
use crate::error::Result;

/// Host capability yielding the primary display's geometry and density
#[async_trait]
pub trait DisplayMetricsProvider: Send + Sync {
    /// Read pixel height, pixel width and scale factor of the primary display
    ///
    /// # Errors
    /// ProbeError if the host display service cannot be queried
    async fn display_metrics(&self) -> Result<DisplayMetrics>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::ProbeError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Mock DisplayMetricsProvider for testing
    pub struct MockDisplayMetrics {
        outcome: Mutex<Result<DisplayMetrics>>,
        calls: AtomicUsize,
    }

    impl MockDisplayMetrics {
        pub fn new(width_pixels: u32, height_pixels: u32, scale: f64) -> Self {
            Self {
                outcome: Mutex::new(Ok(DisplayMetrics {
                    height_pixels,
                    width_pixels,
                    scale,
                })),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                outcome: Mutex::new(Err(ProbeError::new(message))),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn set_metrics(&self, metrics: DisplayMetrics) {
            *self.outcome.lock().unwrap() = Ok(metrics);
        }

        pub fn fail_with(&self, message: &str) {
            *self.outcome.lock().unwrap() = Err(ProbeError::new(message));
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DisplayMetricsProvider for MockDisplayMetrics {
        async fn display_metrics(&self) -> Result<DisplayMetrics> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.lock().unwrap().clone()
        }
    }
}

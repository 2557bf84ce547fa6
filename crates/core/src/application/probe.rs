//! DeviceInfoProbe - one-shot query of memory and display capabilities
//!
//! Both capability reads must succeed; any failure is surfaced as a single
//! `ProbeError` with no partial result and no retry.

use crate::domain::DeviceInfo;
use crate::error::{ProbeError, Result};
use crate::port::{DisplayMetricsProvider, MemoryStatsProvider};
use std::sync::Arc;
use tracing::{debug, warn};

const MEMORY_CAPABILITY: &str = "memory statistics";
const DISPLAY_CAPABILITY: &str = "display metrics";

/// Device capability probe
///
/// Holds no mutable state; share it across callers with `Arc`.
pub struct DeviceInfoProbe {
    memory: Option<Arc<dyn MemoryStatsProvider>>,
    display: Option<Arc<dyn DisplayMetricsProvider>>,
}

impl DeviceInfoProbe {
    pub fn new(
        memory: Arc<dyn MemoryStatsProvider>,
        display: Arc<dyn DisplayMetricsProvider>,
    ) -> Self {
        Self {
            memory: Some(memory),
            display: Some(display),
        }
    }

    /// Builder for hosts where a capability may be missing
    ///
    /// # Example
    /// ```text
    /// let probe = DeviceInfoProbe::builder()
    ///     .memory(Arc::new(SysinfoMemoryStats::new()))
    ///     .build();
    /// // display capability absent: get_device_info() fails
    /// ```
    pub fn builder() -> DeviceInfoProbeBuilder {
        DeviceInfoProbeBuilder::default()
    }

    /// Query the host and assemble a fresh `DeviceInfo`
    ///
    /// # Errors
    /// ProbeError if either capability is absent or its read fails
    pub async fn get_device_info(&self) -> Result<DeviceInfo> {
        let memory = self
            .memory
            .as_ref()
            .ok_or_else(|| ProbeError::unavailable(MEMORY_CAPABILITY))
            .inspect_err(|e| warn!(error = %e, "Device info probe failed"))?;
        let display = self
            .display
            .as_ref()
            .ok_or_else(|| ProbeError::unavailable(DISPLAY_CAPABILITY))
            .inspect_err(|e| warn!(error = %e, "Device info probe failed"))?;

        let memory_stats = memory.memory_stats().await.inspect_err(|e| {
            warn!(error = %e, capability = MEMORY_CAPABILITY, "Host query failed");
        })?;
        let display_metrics = display.display_metrics().await.inspect_err(|e| {
            warn!(error = %e, capability = DISPLAY_CAPABILITY, "Host query failed");
        })?;

        let info = DeviceInfo::new(memory_stats, display_metrics)?;

        debug!(
            physical_memory = info.physical_memory_bytes(),
            screen_height = info.screen_height_pixels(),
            screen_width = info.screen_width_pixels(),
            screen_scale = info.screen_scale(),
            "Device info collected"
        );

        Ok(info)
    }
}

/// Builder for [`DeviceInfoProbe`]
#[derive(Default)]
pub struct DeviceInfoProbeBuilder {
    memory: Option<Arc<dyn MemoryStatsProvider>>,
    display: Option<Arc<dyn DisplayMetricsProvider>>,
}

impl DeviceInfoProbeBuilder {
    pub fn memory(mut self, provider: Arc<dyn MemoryStatsProvider>) -> Self {
        self.memory = Some(provider);
        self
    }

    pub fn display(mut self, provider: Arc<dyn DisplayMetricsProvider>) -> Self {
        self.display = Some(provider);
        self
    }

    pub fn build(self) -> DeviceInfoProbe {
        DeviceInfoProbe {
            memory: self.memory,
            display: self.display,
        }
    }
}

// Memory statistics adapter
// reason: sysinfo for cross-platform total memory
use async_trait::async_trait;
use sysinfo::System;
use tracing::debug;

use devprobe_core::domain::MemoryStats;
use devprobe_core::port::MemoryStatsProvider;
use devprobe_core::{ProbeError, Result};

/// MemoryStatsProvider backed by sysinfo
///
/// A fresh `System` is created per read, so the adapter holds no state
/// and concurrent callers never contend.
#[derive(Debug, Default, Clone, Copy)]
pub struct SysinfoMemoryStats;

impl SysinfoMemoryStats {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MemoryStatsProvider for SysinfoMemoryStats {
    async fn memory_stats(&self) -> Result<MemoryStats> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(ProbeError::new(
                "memory statistics unavailable: unsupported operating system",
            ));
        }

        let mut sys = System::new();
        sys.refresh_memory();

        // sysinfo reports 0 when the host refused or failed the query
        let total_bytes = sys.total_memory();
        if total_bytes == 0 {
            return Err(ProbeError::new(
                "memory statistics unavailable: host reported no physical memory",
            ));
        }

        debug!(total_bytes = total_bytes, "Memory statistics collected");

        Ok(MemoryStats { total_bytes })
    }
}

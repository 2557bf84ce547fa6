// devprobe Infrastructure - Host Adapters
// Implements: MemoryStatsProvider, DisplayMetricsProvider

pub mod drm_display_metrics;
pub mod sysinfo_memory_stats;

pub use drm_display_metrics::{DrmDisplayConfig, DrmDisplayMetrics, DEFAULT_DRM_ROOT};
pub use sysinfo_memory_stats::SysinfoMemoryStats;

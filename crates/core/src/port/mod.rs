// Port Layer - Interfaces for host capabilities

pub mod display_metrics;
pub mod memory_stats;

// Re-exports
pub use display_metrics::DisplayMetricsProvider;
pub use memory_stats::MemoryStatsProvider;

// Domain Layer - Device info value types

pub mod device_info;

// Re-exports
pub use device_info::{DeviceInfo, DisplayMetrics, MemoryStats};

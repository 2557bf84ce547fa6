//! Device info result and the raw capability readings it is assembled from

use crate::error::{ProbeError, Result};
use serde::{Deserialize, Serialize};

/// Reading from a memory-statistics capability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryStats {
    /// Total installed physical memory in bytes (not current usage)
    pub total_bytes: u64,
}

/// Reading from a display-metrics capability (primary display)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayMetrics {
    pub height_pixels: u32,
    pub width_pixels: u32,
    /// Density/scale factor (logical-to-physical pixel ratio)
    pub scale: f64,
}

/// Immutable device info result
///
/// Always fully populated: there is no constructor for a partial value.
/// Serializes to the boundary object
/// `{physicalMemory, screenHeight, screenWidth, screenScale}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoundaryDeviceInfo", into = "BoundaryDeviceInfo")]
pub struct DeviceInfo {
    physical_memory_bytes: u64,
    screen_height_pixels: u32,
    screen_width_pixels: u32,
    screen_scale: f64,
}

impl DeviceInfo {
    /// Assemble a result from both capability readings
    ///
    /// # Errors
    /// ProbeError if the scale factor is negative or not finite
    pub fn new(memory: MemoryStats, display: DisplayMetrics) -> Result<Self> {
        if !display.scale.is_finite() || display.scale < 0.0 {
            return Err(ProbeError::new(format!(
                "invalid screen scale reported by host: {}",
                display.scale
            )));
        }

        Ok(Self {
            physical_memory_bytes: memory.total_bytes,
            screen_height_pixels: display.height_pixels,
            screen_width_pixels: display.width_pixels,
            screen_scale: display.scale,
        })
    }

    pub fn physical_memory_bytes(&self) -> u64 {
        self.physical_memory_bytes
    }

    pub fn screen_height_pixels(&self) -> u32 {
        self.screen_height_pixels
    }

    pub fn screen_width_pixels(&self) -> u32 {
        self.screen_width_pixels
    }

    pub fn screen_scale(&self) -> f64 {
        self.screen_scale
    }

    /// Boundary object handed to the dispatch layer
    pub fn to_boundary_json(&self) -> serde_json::Value {
        serde_json::json!({
            "physicalMemory": self.physical_memory_bytes,
            "screenHeight": self.screen_height_pixels,
            "screenWidth": self.screen_width_pixels,
            "screenScale": self.screen_scale,
        })
    }
}

/// Wire shape of [`DeviceInfo`]
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct BoundaryDeviceInfo {
    physical_memory: u64,
    screen_height: u32,
    screen_width: u32,
    screen_scale: f64,
}

impl From<DeviceInfo> for BoundaryDeviceInfo {
    fn from(info: DeviceInfo) -> Self {
        Self {
            physical_memory: info.physical_memory_bytes,
            screen_height: info.screen_height_pixels,
            screen_width: info.screen_width_pixels,
            screen_scale: info.screen_scale,
        }
    }
}

impl TryFrom<BoundaryDeviceInfo> for DeviceInfo {
    type Error = ProbeError;

    fn try_from(wire: BoundaryDeviceInfo) -> Result<Self> {
        DeviceInfo::new(
            MemoryStats {
                total_bytes: wire.physical_memory,
            },
            DisplayMetrics {
                height_pixels: wire.screen_height,
                width_pixels: wire.screen_width,
                scale: wire.screen_scale,
            },
        )
    }
}

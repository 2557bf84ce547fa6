//! Runner configuration from environment variables
//!
//! # Environment Variables
//!
//! - `DEVPROBE_DRM_ROOT`: DRM sysfs root (default: /sys/class/drm)
//! - `DEVPROBE_DISPLAY_CONNECTOR`: connector treated as primary (e.g. HDMI-A-1)
//! - `DEVPROBE_SCREEN_SCALE`: fixed scale factor (e.g. 2.0)
//! - `DEVPROBE_LOG_FORMAT`: `json` or `pretty` (default: pretty)

use devprobe_infra_system::{DrmDisplayConfig, DEFAULT_DRM_ROOT};
use std::path::PathBuf;

pub const ENV_DRM_ROOT: &str = "DEVPROBE_DRM_ROOT";
pub const ENV_DISPLAY_CONNECTOR: &str = "DEVPROBE_DISPLAY_CONNECTOR";
pub const ENV_SCREEN_SCALE: &str = "DEVPROBE_SCREEN_SCALE";
pub const ENV_LOG_FORMAT: &str = "DEVPROBE_LOG_FORMAT";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    /// Read once, before the subscriber exists
    pub fn from_env() -> Self {
        Self::parse(std::env::var(ENV_LOG_FORMAT).ok().as_deref())
    }

    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Probe settings for one runner invocation
///
/// Log format is read separately via [`LogFormat::from_env`] so that
/// config warnings reach an installed subscriber.
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerConfig {
    pub display: DrmDisplayConfig,
}

impl RunnerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (tests pass a map instead of the process env)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let drm_root = lookup(ENV_DRM_ROOT)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_DRM_ROOT.to_string());

        let connector = lookup(ENV_DISPLAY_CONNECTOR).filter(|s| !s.is_empty());

        let scale_override = lookup(ENV_SCREEN_SCALE).and_then(|raw| match raw.parse::<f64>() {
            Ok(scale) if scale.is_finite() && scale >= 0.0 => Some(scale),
            _ => {
                tracing::warn!(value = %raw, "Ignoring invalid {}", ENV_SCREEN_SCALE);
                None
            }
        });

        Self {
            display: DrmDisplayConfig {
                drm_root: PathBuf::from(drm_root),
                connector,
                scale_override,
            },
        }
    }
}

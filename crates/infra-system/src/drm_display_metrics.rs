//! Display metrics adapter for Linux DRM sysfs
//!
//! Each connector appears under the DRM root as `card<N>-<connector>` with
//! `status`, `enabled`, `modes` and `edid` attribute files. The primary
//! display is a connected connector; its preferred mode (first line of
//! `modes`) gives the pixel size and the EDID physical size gives the scale.

use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use devprobe_core::domain::DisplayMetrics;
use devprobe_core::port::DisplayMetricsProvider;
use devprobe_core::{ProbeError, Result};

/// Default DRM sysfs root
pub const DEFAULT_DRM_ROOT: &str = "/sys/class/drm";

/// Reference density for scale 1.0
const BASE_DPI: f64 = 96.0;

/// Scale factors are reported in quarter steps
const SCALE_STEP: f64 = 0.25;

const CM_PER_INCH: f64 = 2.54;

const EDID_HEADER: [u8; 8] = [0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00];

/// EDID bytes 21/22: maximum image size in centimetres
///
/// A zero in either byte means no size; with only one zero, EDID 1.4
/// stores an aspect ratio in the other byte instead.
const EDID_WIDTH_CM_OFFSET: usize = 21;
const EDID_HEIGHT_CM_OFFSET: usize = 22;

/// Configuration for [`DrmDisplayMetrics`]
#[derive(Debug, Clone, PartialEq)]
pub struct DrmDisplayConfig {
    /// Directory holding the connector entries
    pub drm_root: PathBuf,
    /// Connector to treat as primary, e.g. `HDMI-A-1` or `card0-HDMI-A-1`
    pub connector: Option<String>,
    /// Fixed scale factor instead of the EDID-derived one
    pub scale_override: Option<f64>,
}

impl Default for DrmDisplayConfig {
    fn default() -> Self {
        Self {
            drm_root: PathBuf::from(DEFAULT_DRM_ROOT),
            connector: None,
            scale_override: None,
        }
    }
}

/// DisplayMetricsProvider reading the Linux DRM sysfs tree
#[derive(Debug, Clone, Default)]
pub struct DrmDisplayMetrics {
    config: DrmDisplayConfig,
}

impl DrmDisplayMetrics {
    pub fn new(config: DrmDisplayConfig) -> Self {
        Self { config }
    }

    /// Read the primary display from sysfs
    ///
    /// # Errors
    /// ProbeError if the DRM root is unreadable, no display is connected,
    /// the configured connector is not connected, or its mode is malformed
    pub fn read_primary_display(&self) -> Result<DisplayMetrics> {
        let connectors = connected_connectors(&self.config.drm_root)?;
        let connector = self.select_primary(&connectors)?;

        let (width_pixels, height_pixels) = read_preferred_mode(connector)?;

        let scale = match self.config.scale_override {
            Some(scale) => scale,
            None => read_edid_scale(&connector.path, width_pixels).unwrap_or(1.0),
        };

        debug!(
            connector = %connector.name,
            width = width_pixels,
            height = height_pixels,
            scale = scale,
            "Display metrics collected"
        );

        Ok(DisplayMetrics {
            height_pixels,
            width_pixels,
            scale,
        })
    }

    fn select_primary<'a>(&self, connectors: &'a [Connector]) -> Result<&'a Connector> {
        if let Some(wanted) = &self.config.connector {
            return connectors
                .iter()
                .find(|c| &c.name == wanted || &c.dir_name == wanted)
                .ok_or_else(|| {
                    ProbeError::new(format!("display connector {wanted} is not connected"))
                });
        }

        connectors
            .iter()
            .find(|c| c.enabled)
            .or_else(|| connectors.first())
            .ok_or_else(|| ProbeError::new("no connected display found"))
    }
}

#[async_trait]
impl DisplayMetricsProvider for DrmDisplayMetrics {
    async fn display_metrics(&self) -> Result<DisplayMetrics> {
        let reader = self.clone();
        tokio::task::spawn_blocking(move || reader.read_primary_display())
            .await
            .map_err(|e| ProbeError::new(format!("display metrics query aborted: {e}")))?
    }
}

/// A connected DRM connector
#[derive(Debug)]
struct Connector {
    /// Directory name, e.g. `card0-eDP-1`
    dir_name: String,
    /// Connector name, e.g. `eDP-1`
    name: String,
    path: PathBuf,
    enabled: bool,
}

/// Connected connectors under `root`, sorted by directory name
fn connected_connectors(root: &Path) -> Result<Vec<Connector>> {
    let entries = fs::read_dir(root).map_err(|e| {
        ProbeError::new(format!("cannot read DRM root {}: {e}", root.display()))
    })?;

    let mut connectors = Vec::new();
    for entry in entries {
        let entry = entry?;
        let dir_name = entry.file_name().to_string_lossy().into_owned();

        let Some(name) = connector_name(&dir_name) else {
            continue;
        };

        let path = entry.path();
        if read_attribute(&path, "status").as_deref() != Some("connected") {
            continue;
        }

        connectors.push(Connector {
            name: name.to_string(),
            enabled: read_attribute(&path, "enabled").as_deref() == Some("enabled"),
            dir_name,
            path,
        });
    }

    connectors.sort_by(|a, b| a.dir_name.cmp(&b.dir_name));
    Ok(connectors)
}

/// `card0-HDMI-A-1` -> `HDMI-A-1`; `card0`, `renderD128` -> None
fn connector_name(dir_name: &str) -> Option<&str> {
    let rest = dir_name.strip_prefix("card")?;
    let (index, name) = rest.split_once('-')?;
    if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) || name.is_empty() {
        return None;
    }
    Some(name)
}

fn read_attribute(dir: &Path, attribute: &str) -> Option<String> {
    fs::read_to_string(dir.join(attribute))
        .ok()
        .map(|s| s.trim().to_string())
}

/// Preferred mode of a connector as `(width, height)`
fn read_preferred_mode(connector: &Connector) -> Result<(u32, u32)> {
    let modes = fs::read_to_string(connector.path.join("modes")).map_err(|e| {
        ProbeError::new(format!(
            "cannot read modes of display connector {}: {e}",
            connector.name
        ))
    })?;

    let line = modes
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or_else(|| {
            ProbeError::new(format!("display connector {} reports no modes", connector.name))
        })?;

    parse_mode(line).ok_or_else(|| ProbeError::new(format!("malformed display mode '{line}'")))
}

/// Parse `1920x1080`, allowing a non-digit suffix such as `i`
fn parse_mode(line: &str) -> Option<(u32, u32)> {
    let (width, rest) = line.split_once('x')?;
    let digits = rest
        .find(|c: char| !c.is_ascii_digit())
        .map_or(rest, |end| &rest[..end]);

    let width = width.parse().ok()?;
    let height = digits.parse().ok()?;
    Some((width, height))
}

/// Scale factor derived from the EDID physical width
///
/// None when the EDID is missing, invalid, or has no size (projectors,
/// aspect-ratio-only EDIDs).
fn read_edid_scale(connector_dir: &Path, width_pixels: u32) -> Option<f64> {
    let edid = fs::read(connector_dir.join("edid")).ok()?;
    scale_from_edid(&edid, width_pixels)
}

fn scale_from_edid(edid: &[u8], width_pixels: u32) -> Option<f64> {
    if edid.len() <= EDID_HEIGHT_CM_OFFSET || edid[..EDID_HEADER.len()] != EDID_HEADER {
        return None;
    }

    let width_cm = edid[EDID_WIDTH_CM_OFFSET];
    let height_cm = edid[EDID_HEIGHT_CM_OFFSET];
    if width_cm == 0 || height_cm == 0 || width_pixels == 0 {
        return None;
    }

    let dpi = f64::from(width_pixels) / (f64::from(width_cm) / CM_PER_INCH);
    let scale = (dpi / BASE_DPI / SCALE_STEP).round() * SCALE_STEP;
    Some(scale.max(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn edid_with_size(width_cm: u8, height_cm: u8) -> Vec<u8> {
        let mut edid = vec![0u8; 128];
        edid[..8].copy_from_slice(&EDID_HEADER);
        edid[EDID_WIDTH_CM_OFFSET] = width_cm;
        edid[EDID_HEIGHT_CM_OFFSET] = height_cm;
        edid
    }

    fn add_connector(root: &Path, dir_name: &str, status: &str, enabled: &str, modes: &str) {
        let dir = root.join(dir_name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("status"), format!("{status}\n")).unwrap();
        fs::write(dir.join("enabled"), format!("{enabled}\n")).unwrap();
        fs::write(dir.join("modes"), modes).unwrap();
    }

    fn provider(root: &Path) -> DrmDisplayMetrics {
        DrmDisplayMetrics::new(DrmDisplayConfig {
            drm_root: root.to_path_buf(),
            ..Default::default()
        })
    }

    #[test]
    fn test_connector_name() {
        assert_eq!(connector_name("card0-HDMI-A-1"), Some("HDMI-A-1"));
        assert_eq!(connector_name("card12-eDP-1"), Some("eDP-1"));
        assert_eq!(connector_name("card0"), None);
        assert_eq!(connector_name("renderD128"), None);
        assert_eq!(connector_name("version"), None);
        assert_eq!(connector_name("cardX-DP-1"), None);
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!(parse_mode("1920x1080"), Some((1920, 1080)));
        assert_eq!(parse_mode("1920x1080i"), Some((1920, 1080)));
        assert_eq!(parse_mode("garbage"), None);
        assert_eq!(parse_mode("x1080"), None);
        assert_eq!(parse_mode("1920x"), None);
    }

    #[test]
    fn test_scale_from_edid() {
        // 2560 px over 34 cm ~ 191 dpi -> 2.0
        assert_eq!(scale_from_edid(&edid_with_size(34, 19), 2560), Some(2.0));
        // 1920 px over 53 cm ~ 92 dpi -> rounds to 1.0
        assert_eq!(scale_from_edid(&edid_with_size(53, 30), 1920), Some(1.0));
        // 2880 px over 31 cm ~ 236 dpi -> 2.5
        assert_eq!(scale_from_edid(&edid_with_size(31, 17), 2880), Some(2.5));
        // no physical size
        assert_eq!(scale_from_edid(&edid_with_size(0, 0), 1920), None);
        // EDID 1.4 landscape aspect ratio (79 = 16:9), not centimetres
        assert_eq!(scale_from_edid(&edid_with_size(79, 0), 3840), None);
        // portrait aspect ratio
        assert_eq!(scale_from_edid(&edid_with_size(0, 79), 2160), None);
        // bad header
        assert_eq!(scale_from_edid(&[0u8; 128], 1920), None);
        // truncated
        assert_eq!(scale_from_edid(&EDID_HEADER, 1920), None);
    }

    #[test]
    fn test_reads_connected_display() {
        let root = TempDir::new().unwrap();
        add_connector(root.path(), "card0-DP-1", "disconnected", "disabled", "");
        add_connector(
            root.path(),
            "card0-HDMI-A-1",
            "connected",
            "enabled",
            "1920x1080\n1280x720\n",
        );

        let metrics = provider(root.path()).read_primary_display().unwrap();
        assert_eq!(metrics.width_pixels, 1920);
        assert_eq!(metrics.height_pixels, 1080);
        assert_eq!(metrics.scale, 1.0);
    }

    #[test]
    fn test_prefers_enabled_connector() {
        let root = TempDir::new().unwrap();
        add_connector(root.path(), "card0-DP-1", "connected", "disabled", "1280x720\n");
        add_connector(root.path(), "card0-eDP-1", "connected", "enabled", "2560x1600\n");

        let metrics = provider(root.path()).read_primary_display().unwrap();
        assert_eq!(metrics.width_pixels, 2560);
    }

    #[test]
    fn test_configured_connector() {
        let root = TempDir::new().unwrap();
        add_connector(root.path(), "card0-DP-1", "connected", "enabled", "1280x720\n");
        add_connector(root.path(), "card0-HDMI-A-1", "connected", "enabled", "3840x2160\n");

        let metrics = DrmDisplayMetrics::new(DrmDisplayConfig {
            drm_root: root.path().to_path_buf(),
            connector: Some("HDMI-A-1".to_string()),
            scale_override: None,
        })
        .read_primary_display()
        .unwrap();
        assert_eq!(metrics.width_pixels, 3840);
        assert_eq!(metrics.height_pixels, 2160);
    }

    #[test]
    fn test_configured_connector_not_connected() {
        let root = TempDir::new().unwrap();
        add_connector(root.path(), "card0-DP-1", "connected", "enabled", "1280x720\n");
        add_connector(root.path(), "card0-HDMI-A-1", "disconnected", "disabled", "");

        let err = DrmDisplayMetrics::new(DrmDisplayConfig {
            drm_root: root.path().to_path_buf(),
            connector: Some("HDMI-A-1".to_string()),
            scale_override: None,
        })
        .read_primary_display()
        .unwrap_err();
        assert_eq!(err.message(), "display connector HDMI-A-1 is not connected");
    }

    #[test]
    fn test_headless_host_fails() {
        let root = TempDir::new().unwrap();
        add_connector(root.path(), "card0-DP-1", "disconnected", "disabled", "");
        fs::create_dir_all(root.path().join("card0")).unwrap();

        let err = provider(root.path()).read_primary_display().unwrap_err();
        assert_eq!(err.message(), "no connected display found");
    }

    #[test]
    fn test_missing_root_fails() {
        let root = TempDir::new().unwrap();
        let missing = root.path().join("absent");

        let err = provider(&missing).read_primary_display().unwrap_err();
        assert!(err.message().starts_with("cannot read DRM root"));
    }

    #[test]
    fn test_malformed_mode_fails() {
        let root = TempDir::new().unwrap();
        add_connector(root.path(), "card0-eDP-1", "connected", "enabled", "preferred\n");

        let err = provider(root.path()).read_primary_display().unwrap_err();
        assert_eq!(err.message(), "malformed display mode 'preferred'");
    }

    #[test]
    fn test_empty_modes_fails() {
        let root = TempDir::new().unwrap();
        add_connector(root.path(), "card0-eDP-1", "connected", "enabled", "\n");

        let err = provider(root.path()).read_primary_display().unwrap_err();
        assert_eq!(err.message(), "display connector eDP-1 reports no modes");
    }

    #[test]
    fn test_scale_from_connector_edid() {
        let root = TempDir::new().unwrap();
        add_connector(root.path(), "card0-eDP-1", "connected", "enabled", "2560x1600\n");
        fs::write(root.path().join("card0-eDP-1/edid"), edid_with_size(34, 21)).unwrap();

        let metrics = tokio_test::block_on(provider(root.path()).display_metrics()).unwrap();
        assert_eq!(metrics.scale, 2.0);
    }

    #[tokio::test]
    async fn test_aspect_ratio_edid_falls_back_to_unit_scale() {
        let root = TempDir::new().unwrap();
        add_connector(root.path(), "card0-HDMI-A-1", "connected", "enabled", "3840x2160\n");
        fs::write(root.path().join("card0-HDMI-A-1/edid"), edid_with_size(79, 0)).unwrap();

        let metrics = provider(root.path()).display_metrics().await.unwrap();
        assert_eq!(metrics.width_pixels, 3840);
        assert_eq!(metrics.scale, 1.0);
    }

    #[tokio::test]
    async fn test_scale_override_wins() {
        let root = TempDir::new().unwrap();
        add_connector(root.path(), "card0-eDP-1", "connected", "enabled", "2560x1600\n");
        fs::write(root.path().join("card0-eDP-1/edid"), edid_with_size(34, 21)).unwrap();

        let provider = DrmDisplayMetrics::new(DrmDisplayConfig {
            drm_root: root.path().to_path_buf(),
            connector: None,
            scale_override: Some(1.25),
        });
        let metrics = provider.display_metrics().await.unwrap();
        assert_eq!(metrics.scale, 1.25);
    }
}

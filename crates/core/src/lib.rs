// devprobe Core - Device Info Domain, Ports & Probe Service
// NO infrastructure dependencies (Hexagonal Architecture)

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use application::{DeviceInfoProbe, DeviceInfoProbeBuilder};
pub use domain::{DeviceInfo, DisplayMetrics, MemoryStats};
pub use error::{ProbeError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! devprobe - Main Entry Point
//! Runs the device info probe once and writes the result object to stdout

mod config;

use anyhow::Result;
use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Import workspace crates
use devprobe_core::{DeviceInfo, DeviceInfoProbe, ProbeError};
use devprobe_infra_system::{DrmDisplayMetrics, SysinfoMemoryStats};

use config::{LogFormat, RunnerConfig};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_LOG_FILTER: &str = "devprobe=info,devprobe_core=info,devprobe_infra_system=info";

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // 1. Initialize logging (stderr only; stdout carries the result)
    init_logging(LogFormat::from_env());

    info!("devprobe v{} starting...", VERSION);

    // 2. Load configuration
    let config = RunnerConfig::from_env();

    // 3. Setup dependencies (DI wiring)
    let probe = DeviceInfoProbe::new(
        Arc::new(SysinfoMemoryStats::new()),
        Arc::new(DrmDisplayMetrics::new(config.display)),
    );

    // 4. Run the probe once
    let outcome = probe.get_device_info().await;
    if let Err(e) = &outcome {
        error!(error = %e, "Device info probe failed");
    }

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", serde_json::to_string(&render_outcome(&outcome))?)?;

    Ok(if outcome.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn init_logging(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match format {
        LogFormat::Json => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Pretty => {
            // Development: Pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }
}

/// Boundary object on success, `{"error": message}` on failure
fn render_outcome(outcome: &std::result::Result<DeviceInfo, ProbeError>) -> serde_json::Value {
    match outcome {
        Ok(info) => info.to_boundary_json(),
        Err(e) => serde_json::json!({ "error": e.message() }),
    }
}

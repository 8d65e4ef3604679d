//! Logging setup for the command-line client
//!
//! - Human-readable output on stderr (stdout is reserved for results)
//! - Optional JSON output for log shippers
//! - `RUST_LOG` overrides the default filter

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_FILTER: &str = "elastical=info,elastical_rs=info,elastical_core=info";

/// Initialize tracing
///
/// Returns a guard that must be kept alive to ensure logs are flushed
pub fn init_telemetry(json: bool, verbose: bool) -> Result<WorkerGuard> {
    let (non_blocking_stderr, guard) = tracing_appender::non_blocking(std::io::stderr());

    let default_filter = if verbose {
        "elastical=debug,elastical_rs=debug,elastical_core=debug"
    } else {
        DEFAULT_FILTER
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let layer = if json {
        fmt::layer()
            .json()
            .with_writer(non_blocking_stderr)
            .with_current_span(true)
            .with_target(true)
            .boxed()
    } else {
        fmt::layer()
            .with_writer(non_blocking_stderr)
            .with_target(false)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layer)
        .try_init()?;

    Ok(guard)
}

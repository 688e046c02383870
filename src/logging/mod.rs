// Logging module for structured logging using the tracing crate

use std::error::Error;

/// Initialize the tracing subscriber for structured logging
///
/// The subscriber is configured with:
/// - Level filtering via `RUST_LOG` (defaults to `info`)
/// - Optional JSON formatting for log aggregation systems
///   (set `LOG_FORMAT=json`)
/// - Output to stdout for container/cloud-native deployments
///
/// # Errors
///
/// Returns an error if a global subscriber has already been installed.
pub fn init_subscriber() -> Result<(), Box<dyn Error + Send + Sync>> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .try_init()?;
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).try_init()?;
    }

    Ok(())
}

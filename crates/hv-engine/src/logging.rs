//! Logging bootstrap.
//!
//! Installs a `tracing-subscriber` fmt subscriber filtered by `RUST_LOG`,
//! falling back to the given directive. In the browser (feature `web`) the
//! formatted lines go to the developer console instead of stdout.

use tracing_subscriber::EnvFilter;

fn filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Install the global subscriber for native builds.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init(default_directive: &str) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(filter(default_directive))
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

/// Install the global subscriber for the browser and route panics to the
/// console.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
#[cfg(feature = "web")]
pub fn init_web(default_directive: &str) -> anyhow::Result<()> {
    console_error_panic_hook::set_once();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(default_directive))
        .with_ansi(false)
        .without_time()
        .with_writer(tracing_web::MakeWebConsoleWriter::new().with_pretty_level())
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

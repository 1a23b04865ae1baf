//! Log output for the CLI.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialise the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise only warnings are shown, or
/// everything down to debug under `--verbose`. Logs go to stderr so they
/// never mix with JSON written to stdout.
pub fn init(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

//! Structured logging setup.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "offgrid_sim=info";

/// Installs a `fmt` subscriber writing to stderr so stdout stays clean for
/// reports and LaTeX rows.
///
/// `RUST_LOG` overrides the default filter. `quiet` restricts output to
/// warnings and errors. Calling this twice is a no-op.
pub fn init_tracing(quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

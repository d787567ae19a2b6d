//! Logging setup
//!
//! Library code emits `tracing` events; the binary installs a fmt
//! subscriber on stderr. `RUST_LOG` overrides the verbosity flags.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default filter directive for a verbosity level
///
/// `quiet` wins over `verbose`; each `-v` lowers the threshold one step.
pub fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "tft_s16_tables=info,warn",
        2 => "tft_s16_tables=debug,info",
        _ => "trace",
    }
}

/// Initialize logging with tracing
pub fn init_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    // A second init (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

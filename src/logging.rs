//! Logger bootstrap for the simulation binary and tests.
use env_logger::{Builder, Env};
use log::LevelFilter;

/// Installs `env_logger` as the global logger.
///
/// `RUST_LOG` takes precedence. Without it, `verbose` selects debug output
/// (per-tick state transitions) and the quiet default shows lifecycle events
/// only.
pub fn init(verbose: bool) {
    let fallback = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = Builder::from_env(Env::default().default_filter_or(fallback.to_string()));
    builder.format_timestamp(None).format_target(true);

    // A second install attempt only fails because a logger already exists.
    if builder.try_init().is_err() {
        log::trace!("logger already installed");
    }
}

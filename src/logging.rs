use std::sync::OnceLock;

use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt};

static INIT: OnceLock<()> = OnceLock::new();

/// Initialize logging backends using `tracing`.
///
/// `-v` raises the default directive to `debug`, `-vv` to `trace`;
/// `RUST_LOG` wins over both when set.
pub fn init(verbose: u8, no_color: bool) {
    INIT.get_or_init(|| {
        let directive = match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
        let subscriber = Registry::default()
            .with(filter)
            .with(fmt::layer().with_target(false).with_ansi(!no_color));
        if tracing::subscriber::set_global_default(subscriber).is_err() {
            // Ignore error if a subscriber is already set (e.g., tests).
        }
    });
}

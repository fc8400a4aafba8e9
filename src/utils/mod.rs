pub mod build_info;

use std::{io, sync::Once};

static TRACING_INIT: Once = Once::new();

pub const DEFAULT_LOG_DIRECTIVE: &str = "coin_ledger=info";

/// Initializes the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `directive` (usually from the config
/// file) or [`DEFAULT_LOG_DIRECTIVE`] applies. Logs go to stderr so they never
/// mix with command output.
pub fn init_tracing(directive: Option<&str>) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let fallback = directive.unwrap_or(DEFAULT_LOG_DIRECTIVE);
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(fallback))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE));

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .try_init();
    });
}

//! Tracing subscriber setup
//!
//! Logs go to stderr so they never mix with assessment output on stdout.
//! `RUST_LOG` overrides the verbosity-derived filter.

use crate::cli::Verbosity;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset or invalid
pub fn default_filter(verbosity: Verbosity) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()))
}

/// Install the global subscriber. Safe to call more than once.
pub fn init(verbosity: Verbosity, ansi: bool) {
    let result = tracing_subscriber::registry()
        .with(default_filter(verbosity))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(ansi)
                .with_target(false),
        )
        .try_init();

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_does_not_panic() {
        init(Verbosity::Quiet, false);
        init(Verbosity::Verbose, false);
    }
}

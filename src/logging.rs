//! Logging
//!
//! Structured logging via `tracing`. The library only emits spans and
//! events; installing a subscriber is the embedding application's call,
//! made once through [`init_logging`].

use crate::error::VcsError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Environment variable consulted for the log filter, e.g.
/// `STRATA_LOG=debug` or `STRATA_LOG=strata::repo=trace`.
pub const LOG_ENV_VAR: &str = "STRATA_LOG";

const DEFAULT_FILTER: &str = "info";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Install the global tracing subscriber.
///
/// The filter comes from [`LOG_ENV_VAR`], defaulting to `info`. Fails if
/// a subscriber is already installed.
pub fn init_logging(format: LogFormat) -> Result<(), VcsError> {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let base = Registry::default().with(filter);

    let result = match format {
        LogFormat::Text => base.with(fmt::layer().with_target(true)).try_init(),
        LogFormat::Json => base.with(fmt::layer().json()).try_init(),
    };

    result.map_err(|e| VcsError::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice_fails() {
        // Whichever call wins the race, the second installation attempt
        // must report an error instead of panicking.
        let first = init_logging(LogFormat::Text);
        let second = init_logging(LogFormat::Json);

        assert!(first.is_ok() || second.is_err());
    }
}

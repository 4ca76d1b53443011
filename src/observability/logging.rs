//! Structured logging.
//!
//! Uses `tracing-subscriber` with an `EnvFilter`: `RUST_LOG` wins when set,
//! otherwise `observability.log_level` applies to this crate and tower-http.
//! JSON lines for production, human-readable format for development.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Default filter directive for a plain level such as `info`.
pub fn default_directive(level: &str) -> String {
    format!("lottery_console={level},tower_http={level}")
}

/// Install the global subscriber.
pub fn init_logging(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directive(&config.log_level).into());

    let json = config.json_logs;
    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(
            default_directive("debug"),
            "lottery_console=debug,tower_http=debug"
        );
        assert!(EnvFilter::try_new(default_directive("warn")).is_ok());
    }
}

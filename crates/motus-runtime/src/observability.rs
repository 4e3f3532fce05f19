//! Logging setup

use motus_core::{MotusError, MotusResult};
use tracing_subscriber::EnvFilter;

/// Log output format
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable, for terminals
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

/// Install the global tracing subscriber
///
/// The filter comes from `RUST_LOG`, defaulting to `info`. Calling this more
/// than once keeps the first subscriber.
pub fn init_tracing(format: LogFormat) -> MotusResult<()> {
    let filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) => {
            EnvFilter::try_new(directives).map_err(|e| MotusError::Config(e.to_string()))?
        }
        Err(_) => EnvFilter::new("info"),
    };

    let installed = match format {
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init(),
    };

    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[serial_test::serial]
    fn test_init_is_idempotent() {
        std::env::remove_var(EnvFilter::DEFAULT_ENV);
        assert!(init_tracing(LogFormat::Json).is_ok());
        assert!(init_tracing(LogFormat::Pretty).is_ok());
    }

    #[test]
    #[serial_test::serial]
    fn test_bad_filter_is_rejected() {
        std::env::set_var(EnvFilter::DEFAULT_ENV, "motus=notalevel");
        let result = init_tracing(LogFormat::Pretty);
        std::env::remove_var(EnvFilter::DEFAULT_ENV);

        assert!(matches!(result, Err(MotusError::Config(_))));
    }
}

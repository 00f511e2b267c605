//! Logging setup for gemprompt
//!
//! Everything the library logs goes through `tracing`. Directive problems are
//! reported at WARN, request dispatch at INFO, and wire details at DEBUG/TRACE.
//! Applications that already install a subscriber don't need this module.

use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable that overrides the level passed to [`init_logging`].
pub const LOG_ENV_VAR: &str = "GEMPROMPT_LOG";

/// Log levels supported by gemprompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    /// Includes discarded or adjusted thinking directives
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Level {
        match self {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

/// Install a global `fmt` subscriber for gemprompt at `level`.
///
/// `GEMPROMPT_LOG`, when set to a valid filter, takes precedence:
///
/// ```bash
/// GEMPROMPT_LOG=gemprompt::directive=debug cargo run
/// ```
///
/// Returns false if a global subscriber was already installed.
///
/// ```no_run
/// use gemprompt::logging::{init_logging, LogLevel};
///
/// init_logging(LogLevel::Warn);
///
/// // Logs a warning and falls back to a plain request
/// let (model, budget) = gemprompt::parse_thinking_suffix("gemini-2.5-flash:4kk");
/// assert_eq!((model.as_str(), budget), ("gemini-2.5-flash", 0));
/// ```
pub fn init_logging(level: LogLevel) -> bool {
    let env_filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(format!("gemprompt={}", level.to_tracing_level())));

    let installed = install(env_filter);
    if installed {
        tracing::info!(?level, "gemprompt logging initialized");
    }
    installed
}

/// Install a global subscriber from an `EnvFilter` directive string, e.g.
/// `"gemprompt=info,gemprompt::backend=trace"`.
///
/// An unparsable filter falls back to `gemprompt=info`.
pub fn init_logging_with_filter(filter: &str) -> bool {
    let (env_filter, valid) = match EnvFilter::try_new(filter) {
        Ok(f) => (f, true),
        Err(_) => (EnvFilter::new("gemprompt=info"), false),
    };

    let installed = install(env_filter);
    if installed && !valid {
        tracing::warn!(filter, "Invalid filter string, using default (info)");
    } else if installed {
        tracing::info!(filter, "gemprompt logging initialized with custom filter");
    }
    installed
}

fn install(env_filter: EnvFilter) -> bool {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(env_filter)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::LogLevel;
    use std::str::FromStr;
    use tracing::Level;

    #[test]
    fn test_log_level_mapping() {
        assert_eq!(LogLevel::Error.to_tracing_level(), Level::ERROR);
        assert_eq!(LogLevel::Warn.to_tracing_level(), Level::WARN);
        assert_eq!(LogLevel::Trace.to_tracing_level(), Level::TRACE);
    }

    #[test]
    fn test_log_level_from_str() {
        assert_eq!(LogLevel::from_str("WARNING"), Ok(LogLevel::Warn));
        assert_eq!(LogLevel::from_str(" debug "), Ok(LogLevel::Debug));
        assert!(LogLevel::from_str("loud").is_err());
    }
}

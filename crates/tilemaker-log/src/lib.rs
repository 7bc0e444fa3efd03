//! Logging setup for the tile atlas builder.
//!
//! Console output through `tracing-subscriber`, filtered by `RUST_LOG` or the
//! configured level, plus a JSON log file in debug builds.

use std::path::Path;

use tilemaker_config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Name of the JSON log file written in debug builds.
pub const LOG_FILE: &str = "tilemaker.log";

/// Filter used when neither `RUST_LOG` nor the config says otherwise.
const DEFAULT_FILTER: &str = "info";

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` wins if set. Otherwise the config's `debug.log_level` is used,
/// raised to `debug` when `debug.verbose` is on. With `debug_build` and a
/// `log_dir`, events are also written as JSON lines to [`LOG_FILE`].
///
/// # Examples
///
/// ```no_run
/// use tilemaker_config::Config;
/// use tilemaker_log::init_logging;
///
/// let config = Config::default();
/// init_logging(Some(std::path::Path::new("./logs")), cfg!(debug_assertions), Some(&config));
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let filter_str = config.map_or_else(|| DEFAULT_FILTER.to_string(), filter_for);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join(LOG_FILE))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        return;
    }

    subscriber.init();
}

/// Filter string for a loaded config.
pub fn filter_for(config: &Config) -> String {
    let level = config.debug.log_level.trim();
    match (config.debug.verbose, level) {
        (true, "" | "error" | "warn" | "info") => "debug".to_string(),
        (false, "") => DEFAULT_FILTER.to_string(),
        _ => level.to_string(),
    }
}

/// Create an `EnvFilter` with the default filter string.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_level() {
        assert_eq!(format!("{}", default_env_filter()), "info");
        assert_eq!(filter_for(&Config::default()), "info");
    }

    #[test]
    fn test_verbose_raises_level() {
        let mut config = Config::default();
        config.debug.verbose = true;
        assert_eq!(filter_for(&config), "debug");

        // An explicitly finer level is kept.
        config.debug.log_level = "trace".to_string();
        assert_eq!(filter_for(&config), "trace");
    }

    #[test]
    fn test_configured_filter_is_kept() {
        let mut config = Config::default();
        config.debug.log_level = "warn,tilemaker_atlas=debug".to_string();
        assert_eq!(filter_for(&config), "warn,tilemaker_atlas=debug");

        config.debug.log_level = "  ".to_string();
        assert_eq!(filter_for(&config), "info");
    }

    #[test]
    fn test_env_filter_parsing() {
        for filter_str in ["info", "debug,tilemaker_atlas=trace", "warn", "error"] {
            assert!(EnvFilter::try_from(filter_str).is_ok(), "{filter_str}");
        }
    }

    #[test]
    fn test_json_lines_are_valid() {
        // Same layer shape as the debug-build file layer, written to a file
        // under a scoped subscriber so the global one stays untouched.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOG_FILE);
        let file = std::fs::File::create(&path).unwrap();
        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .json(),
        );
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(category = "normal", "compositing");
        });

        let contents = std::fs::read_to_string(&path).unwrap();
        let line = contents.lines().next().unwrap();
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(value["level"], "INFO");
        assert_eq!(value["fields"]["message"], "compositing");
        assert_eq!(value["fields"]["category"], "normal");
    }
}

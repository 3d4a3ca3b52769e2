use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info", "spinning_box=debug,wgpu=warn").
/// When unset, `RUST_LOG` is used, then `info`.
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
}

static INIT: Once = Once::new();

/// Initializes the global logger. Only the first call has an effect, and a logger installed by the
/// host process is left in place.
pub fn init_logging(config: &LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match resolve_filter(config, std::env::var("RUST_LOG").ok()) {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => {
                // wgpu is chatty at info.
                builder
                    .filter_level(log::LevelFilter::Info)
                    .filter_module("wgpu_core", log::LevelFilter::Warn)
                    .filter_module("wgpu_hal", log::LevelFilter::Warn)
                    .filter_module("naga", log::LevelFilter::Warn);
            }
        }

        match builder.try_init() {
            Ok(()) => log::debug!("Logging initialized"),
            Err(error) => log::debug!("Keeping existing logger: {error}"),
        }
    });
}

/// Picks the filter string: the configured one, else `env` (the `RUST_LOG` value). `None` means the
/// built-in default applies.
fn resolve_filter(config: &LoggingConfig, env: Option<String>) -> Option<String> {
    config.env_filter.clone().or(env)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_filter_beats_environment() {
        let config = LoggingConfig {
            env_filter: Some("spinning_box=debug".to_string()),
        };
        assert_eq!(
            resolve_filter(&config, Some("warn".to_string())),
            Some("spinning_box=debug".to_string())
        );
    }

    #[test]
    fn environment_used_without_configured_filter() {
        let config = LoggingConfig::default();
        assert_eq!(
            resolve_filter(&config, Some("trace".to_string())),
            Some("trace".to_string())
        );
    }

    #[test]
    fn no_filter_falls_back_to_default() {
        assert_eq!(resolve_filter(&LoggingConfig::default(), None), None);
    }

    #[test]
    fn init_twice_does_not_panic() {
        init_logging(&LoggingConfig::default());
        init_logging(&LoggingConfig::default());
    }
}

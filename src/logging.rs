//! Process-wide `env_logger` setup.

use std::sync::Once;

/// `env_filter` uses the `env_logger` filter syntax, e.g.
/// `"info,lamplight=debug,wgpu_core=warn"`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Installs the global logger. Only the first call has any effect.
///
/// The filter comes from `config`, then `RUST_LOG`, then defaults to `info`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();
        match filter_source(config.env_filter, std::env::var("RUST_LOG").ok()) {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => {
                builder.filter_level(log::LevelFilter::Info);
            }
        }
        builder.write_style(config.write_style);
        builder.init();

        log::debug!("logging initialized");
    });
}

fn filter_source(configured: Option<String>, env: Option<String>) -> Option<String> {
    configured.or(env).filter(|filter| !filter.trim().is_empty())
}

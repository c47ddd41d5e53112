//! Logging
//!
//! 基于 tracing-subscriber 初始化日志，`RUST_LOG` 优先于配置中的级别

use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;
use crate::error::{Error, Result};

/// 默认过滤规则
fn default_filter(config: &LogConfig) -> String {
    format!(
        "{},turboapi={},tower_http=debug",
        config.level, config.level
    )
}

/// 初始化全局日志订阅者
///
/// 重复调用返回 [`Error::Logging`]，不会 panic。
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter(config)))
        .map_err(|e| Error::Logging(e.to_string()))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| Error::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        let config = LogConfig {
            level: "debug".to_string(),
            json: false,
        };
        assert_eq!(
            default_filter(&config),
            "debug,turboapi=debug,tower_http=debug"
        );
    }

    #[test]
    fn test_second_init_fails_without_panic() {
        let config = LogConfig::default();
        let _ = init_logging(&config);
        assert!(init_logging(&config).is_err());
    }
}

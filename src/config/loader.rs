//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（turboapi.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File, Map};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["turboapi", "turboapi.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `TURBOAPI_`，层级分隔符 `__`）
/// 2. 配置文件（turboapi.toml 或 turboapi.local.toml）
/// 3. 默认值
///
/// 环境变量一律按字符串读取，由目标字段决定类型，因此 `TURBOAPI_APP__VERSION=1.0`
/// 保持为 `"1.0"`。`cors.allow_origins` 接受逗号分隔的列表。
///
/// # 环境变量示例
/// - `TURBOAPI_SERVER__HOST=0.0.0.0`
/// - `TURBOAPI_SERVER__PORT=9000`
/// - `TURBOAPI_CORS__ENABLED=true`
/// - `TURBOAPI_CORS__ALLOW_ORIGINS=https://a.example,https://b.example`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    load(config_path, None)
}

/// `env` 为 None 时读取进程环境变量
fn load(
    config_path: Option<&Path>,
    env: Option<Map<String, String>>,
) -> Result<AppConfig, ConfigError> {
    let defaults = AppConfig::default();
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", defaults.server.host)?
        .set_default("server.port", i64::from(defaults.server.port))?
        .set_default("app.title", defaults.app.title)?
        .set_default("app.version", defaults.app.version)?
        .set_default("cors.enabled", defaults.cors.enabled)?
        .set_default("cors.allow_origins", defaults.cors.allow_origins)?
        .set_default("cors.max_age_secs", defaults.cors.max_age_secs as i64)?
        .set_default("limits.body_limit_bytes", defaults.limits.body_limit_bytes as i64)?
        .set_default("log.level", defaults.log.level)?
        .set_default("log.json", defaults.log.json)?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    builder = builder.add_source(
        Environment::with_prefix("TURBOAPI")
            .prefix_separator("_")
            .separator("__")
            .source(env),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.app.title.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Application title cannot be empty".to_string(),
        ));
    }

    if config.limits.body_limit_bytes == 0 {
        return Err(ConfigError::ValidationError(
            "Body limit cannot be 0".to_string(),
        ));
    }

    if config.cors.enabled && config.cors.allow_origins.is_empty() {
        return Err(ConfigError::ValidationError(
            "CORS is enabled but no origins are allowed".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("App: {} v{}", config.app.title, config.app.version);
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("Body Limit: {} bytes", config.limits.body_limit_bytes);
    tracing::info!("CORS Enabled: {}", config.cors.enabled);
    if config.cors.enabled {
        tracing::info!("CORS Origins: {:?}", config.cors.allow_origins);
        tracing::info!("CORS Max Age: {}s", config.cors.max_age_secs);
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let file = write_config(
            r#"
            [server]
            port = 9100

            [app]
            title = "Inventory API"

            [cors]
            enabled = true
            allow_origins = ["https://example.com"]
            "#,
        );

        let config = load_config_from_path(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.app.title, "Inventory API");
        assert_eq!(config.app.version, "0.1.0");
        assert!(config.cors.enabled);
        assert_eq!(config.cors.allow_origins, vec!["https://example.com"]);
        assert_eq!(config.log.level, "info");
    }

    fn env(vars: &[(&str, &str)]) -> Map<String, String> {
        vars.iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn test_env_overrides_file_and_defaults() {
        let file = write_config("[server]\nport = 9100\nhost = \"0.0.0.0\"\n");
        let vars = env(&[
            ("TURBOAPI_SERVER__PORT", "9200"),
            ("TURBOAPI_CORS__ENABLED", "true"),
            ("TURBOAPI_CORS__ALLOW_ORIGINS", "https://a.example, https://b.example"),
            ("TURBOAPI_LIMITS__BODY_LIMIT_BYTES", "1024"),
            ("OTHER_SERVER__PORT", "1"),
        ]);

        let config = load(Some(file.path()), Some(vars)).unwrap();
        assert_eq!(config.server.port, 9200);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.cors.enabled);
        assert_eq!(
            config.cors.allow_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.limits.body_limit_bytes, 1024);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_env_strings_are_not_reinterpreted() {
        let vars = env(&[
            ("TURBOAPI_APP__VERSION", "1.0"),
            ("TURBOAPI_APP__TITLE", "42"),
        ]);

        let config = load(None, Some(vars)).unwrap();
        assert_eq!(config.app.version, "1.0");
        assert_eq!(config.app.title, "42");
    }

    #[test]
    fn test_env_value_of_wrong_type_is_a_parse_error() {
        let vars = env(&[("TURBOAPI_SERVER__PORT", "eighty")]);
        let result = load(None, Some(vars));
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = load_config_from_path(Some(Path::new("/nonexistent/turboapi.toml")));
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn test_invalid_file_fails_validation() {
        let file = write_config("[server]\nport = 0\n");
        let result = load_config_from_path(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_blank_title() {
        let mut config = AppConfig::default();
        config.app.title = "  ".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_body_limit() {
        let mut config = AppConfig::default();
        config.limits.body_limit_bytes = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_cors_without_origins() {
        let mut config = AppConfig::default();
        config.cors.enabled = true;
        config.cors.allow_origins.clear();
        assert!(validate_config(&config).is_err());
    }
}

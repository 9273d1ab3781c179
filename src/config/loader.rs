//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;
use crate::domain::SubtitleFormat;

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
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `MEDIAHUB_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `MEDIAHUB_SERVER__PORT=8080`
/// - `MEDIAHUB_HELPERS__URL=http://helpers:8100`
/// - `MEDIAHUB_ELEVENLABS__API_KEY=...`
/// - `MEDIAHUB_LOG__FILE=/var/log/mediahub.log`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级），列表类默认值由 serde(default) 提供
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8000)?
        .set_default("static_files.dir", "static")?
        .set_default("helpers.url", "http://localhost:8100")?
        .set_default("helpers.timeout_secs", 900)?
        .set_default("elevenlabs.url", "https://api.elevenlabs.io")?
        .set_default("elevenlabs.timeout_secs", 120)?
        .set_default("transcription.model_size", "medium")?
        .set_default("transcription.target_lang_code", "de")?
        .set_default("transcription.subtitle_type", "vtt")?
        .set_default("log.level", "info")?
        .set_default("log.file_level", "debug")?
        .set_default("log.json", false)?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 例如: MEDIAHUB_HELPERS__URL=http://helpers:8100
    builder = builder.add_source(
        Environment::with_prefix("MEDIAHUB")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
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

    if config.helpers.url.is_empty() {
        return Err(ConfigError::ValidationError(
            "Helper service URL cannot be empty".to_string(),
        ));
    }

    if config.elevenlabs.url.is_empty() {
        return Err(ConfigError::ValidationError(
            "ElevenLabs URL cannot be empty".to_string(),
        ));
    }

    if config.helpers.timeout_secs == 0 || config.elevenlabs.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Collaborator timeouts must be greater than 0".to_string(),
        ));
    }

    if config.transcription.target_lang_code.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Default target language cannot be empty".to_string(),
        ));
    }

    config
        .transcription
        .subtitle_type
        .parse::<SubtitleFormat>()
        .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("CORS Origins: {:?}", config.server.cors_origins);
    tracing::info!("Static Directory: {:?}", config.static_files.dir);
    tracing::info!("Upload Directory: {:?}", config.storage.upload_dir());
    tracing::info!("Helper Service: {}", config.helpers.url);
    tracing::info!("Helper Timeout: {}s", config.helpers.timeout_secs);
    tracing::info!("ElevenLabs: {}", config.elevenlabs.url);
    if config.elevenlabs.api_key.is_empty() {
        tracing::warn!("ElevenLabs API key is not set, speech routes will fail");
    }
    tracing::info!(
        "Transcription Defaults: model={}, lang={}, format={}",
        config.transcription.model_size,
        config.transcription.target_lang_code,
        config.transcription.subtitle_type
    );
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

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
    fn test_validation_error_for_empty_helper_url() {
        let mut config = AppConfig::default();
        config.helpers.url = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_timeout() {
        let mut config = AppConfig::default();
        config.elevenlabs.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_unknown_subtitle_type() {
        let mut config = AppConfig::default();
        config.transcription.subtitle_type = "ass".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_load_from_explicit_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 9100

[transcription]
target_lang_code = "fr"
subtitle_type = "srt"
"#
        )
        .unwrap();

        let config = load_config_from_path(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.transcription.target_lang_code, "fr");
        assert_eq!(config.transcription.subtitle_type, "srt");
        assert_eq!(config.transcription.model_size, "medium");
        assert_eq!(config.helpers.url, "http://localhost:8100");
    }
}

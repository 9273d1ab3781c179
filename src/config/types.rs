//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 静态文件服务配置
    #[serde(default)]
    pub static_files: StaticFilesConfig,

    /// 上传文件存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 媒体/转写 helper 服务配置
    #[serde(default)]
    pub helpers: HelperServiceConfig,

    /// ElevenLabs 语音服务配置
    #[serde(default)]
    pub elevenlabs: ElevenLabsConfig,

    /// 固定参数路由使用的转写默认值
    #[serde(default)]
    pub transcription: TranscriptionConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 允许跨域的来源
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// 请求体大小上限（字节），视频上传需要较大的值
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost".to_string(),
        "http://localhost:3000".to_string(),
        "http://localhost:5173".to_string(),
    ]
}

fn default_max_body_bytes() -> usize {
    200 * 1024 * 1024 // 200 MB
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 静态文件服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct StaticFilesConfig {
    /// 静态文件根目录，`/static/<filename>` 从这里解析
    #[serde(default = "default_static_dir")]
    pub dir: PathBuf,
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            dir: default_static_dir(),
        }
    }
}

/// 上传文件存储配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    /// 上传文件临时目录，未设置时使用系统临时目录
    #[serde(default)]
    pub upload_dir: Option<PathBuf>,
}

impl StorageConfig {
    pub fn upload_dir(&self) -> PathBuf {
        self.upload_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

/// Helper 服务配置（图像、音乐、图表、用户、转写）
#[derive(Debug, Clone, Deserialize)]
pub struct HelperServiceConfig {
    /// Helper 服务基础 URL
    #[serde(default = "default_helpers_url")]
    pub url: String,

    /// 请求超时时间（秒），视频下载和转写可能很慢
    #[serde(default = "default_helpers_timeout")]
    pub timeout_secs: u64,
}

fn default_helpers_url() -> String {
    "http://localhost:8100".to_string()
}

fn default_helpers_timeout() -> u64 {
    900
}

impl Default for HelperServiceConfig {
    fn default() -> Self {
        Self {
            url: default_helpers_url(),
            timeout_secs: default_helpers_timeout(),
        }
    }
}

/// ElevenLabs 配置
#[derive(Debug, Clone, Deserialize)]
pub struct ElevenLabsConfig {
    /// API 基础 URL
    #[serde(default = "default_elevenlabs_url")]
    pub url: String,

    /// API Key（`xi-api-key` 请求头）
    #[serde(default)]
    pub api_key: String,

    /// 合成模型
    #[serde(default = "default_elevenlabs_model")]
    pub model_id: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_elevenlabs_timeout")]
    pub timeout_secs: u64,
}

fn default_elevenlabs_url() -> String {
    "https://api.elevenlabs.io".to_string()
}

fn default_elevenlabs_model() -> String {
    "eleven_multilingual_v2".to_string()
}

fn default_elevenlabs_timeout() -> u64 {
    120
}

impl Default for ElevenLabsConfig {
    fn default() -> Self {
        Self {
            url: default_elevenlabs_url(),
            api_key: String::new(),
            model_id: default_elevenlabs_model(),
            timeout_secs: default_elevenlabs_timeout(),
        }
    }
}

/// 转写默认参数
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionConfig {
    /// Whisper 模型大小
    #[serde(default = "default_model_size")]
    pub model_size: String,

    /// 目标语言代码
    #[serde(default = "default_target_lang")]
    pub target_lang_code: String,

    /// 字幕格式（vtt / srt）
    #[serde(default = "default_subtitle_type")]
    pub subtitle_type: String,
}

fn default_model_size() -> String {
    "medium".to_string()
}

fn default_target_lang() -> String {
    "de".to_string()
}

fn default_subtitle_type() -> String {
    "vtt".to_string()
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            model_size: default_model_size(),
            target_lang_code: default_target_lang(),
            subtitle_type: default_subtitle_type(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 控制台日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 日志文件路径，为空则不写文件
    #[serde(default = "default_log_file")]
    pub file: Option<PathBuf>,

    /// 文件日志级别
    #[serde(default = "default_file_level")]
    pub file_level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> Option<PathBuf> {
    Some(PathBuf::from("app.log"))
}

fn default_file_level() -> String {
    "debug".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
            file_level: default_file_level(),
            json: false,
        }
    }
}

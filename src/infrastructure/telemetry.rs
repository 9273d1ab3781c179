//! Telemetry - 日志初始化
//!
//! 控制台 + 文件双输出。进程启动时构造一次，
//! 返回的 `LogGuard` 在进程退出时 drop，负责刷盘

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

use crate::config::LogConfig;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Invalid log level: {0}")]
    InvalidLevel(String),

    #[error("Failed to open log file {path}: {source}")]
    OpenFile {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to install subscriber: {0}")]
    Init(String),
}

/// 日志句柄
///
/// 持有日志文件，drop 时同步到磁盘
#[derive(Debug)]
pub struct LogGuard {
    file: Option<Arc<File>>,
}

impl LogGuard {
    pub fn file_enabled(&self) -> bool {
        self.file.is_some()
    }
}

impl Drop for LogGuard {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            let _ = file.sync_all();
        }
    }
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// 初始化全局 tracing subscriber
///
/// - 控制台：`log.level`，可被 `RUST_LOG` 覆盖
/// - 文件：`log.file`，级别 `log.file_level`，追加写入
pub fn init_telemetry(config: &LogConfig) -> Result<LogGuard, TelemetryError> {
    let mut layers: Vec<BoxedLayer> = Vec::new();

    let console_filter = console_filter(config);
    layers.push(if config.json {
        fmt::layer().json().with_filter(console_filter).boxed()
    } else {
        fmt::layer().with_target(true).with_filter(console_filter).boxed()
    });

    let file = match config.file.as_deref().filter(|p| !p.as_os_str().is_empty()) {
        Some(path) => {
            let file = open_log_file(path)?;
            let level = parse_level(&config.file_level)?;
            layers.push(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .with_writer(file.clone())
                    .with_filter(level)
                    .boxed(),
            );
            Some(file)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| TelemetryError::Init(e.to_string()))?;

    Ok(LogGuard { file })
}

fn console_filter(config: &LogConfig) -> EnvFilter {
    let directives = format!(
        "{},mediahub={},tower_http=debug",
        config.level, config.level
    );
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives))
}

fn parse_level(level: &str) -> Result<LevelFilter, TelemetryError> {
    level
        .parse::<LevelFilter>()
        .map_err(|_| TelemetryError::InvalidLevel(level.to_string()))
}

fn open_log_file(path: &Path) -> Result<Arc<File>, TelemetryError> {
    let open_err = |source| TelemetryError::OpenFile {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(open_err)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(open_err)?;

    Ok(Arc::new(file))
}

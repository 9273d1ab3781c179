//! Application State
//!
//! 每个协作方以端口注入，处理函数之间不共享可变状态

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::FromRef;

use crate::application::{MediaGenerationPort, SpeechPort, TranscriptionPort, UserRegistryPort};
use crate::config::TranscriptionConfig;
use crate::domain::{DomainError, LanguageCode, SubtitleFormat};
use crate::infrastructure::adapters::TempUploadDir;

/// 固定参数路由使用的转写参数
#[derive(Debug, Clone)]
pub struct TranscriptionDefaults {
    pub model_size: String,
    pub target_lang: LanguageCode,
    pub subtitle_format: SubtitleFormat,
}

impl TryFrom<&TranscriptionConfig> for TranscriptionDefaults {
    type Error = DomainError;

    fn try_from(config: &TranscriptionConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            model_size: config.model_size.clone(),
            target_lang: LanguageCode::new(config.target_lang_code.clone())?,
            subtitle_format: config.subtitle_type.parse()?,
        })
    }
}

/// 应用状态
pub struct AppState {
    pub media: Arc<dyn MediaGenerationPort>,
    pub users: Arc<dyn UserRegistryPort>,
    pub transcription: Arc<dyn TranscriptionPort>,
    pub speech: Arc<dyn SpeechPort>,

    /// 上传文件临时目录
    pub uploads: TempUploadDir,
    /// 转写默认参数
    pub defaults: TranscriptionDefaults,
    /// 静态文件根目录
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(
        media: Arc<dyn MediaGenerationPort>,
        users: Arc<dyn UserRegistryPort>,
        transcription: Arc<dyn TranscriptionPort>,
        speech: Arc<dyn SpeechPort>,
        uploads: TempUploadDir,
        defaults: TranscriptionDefaults,
        static_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            media,
            users,
            transcription,
            speech,
            uploads,
            defaults,
            static_dir: static_dir.into(),
        }
    }
}

/// 表单提取器从状态中取上传目录
impl FromRef<Arc<AppState>> for TempUploadDir {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.uploads.clone()
    }
}

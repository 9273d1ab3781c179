//! Transcription Port - 视频/音频转写与字幕翻译
//!
//! 覆盖五种 YouTube/视频处理方式以及音频转字幕

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;

use crate::application::CollaboratorError;
use crate::domain::{LanguageCode, SubtitleFormat};

/// 本地媒体文件处理任务（上传后落盘的视频或音频）
#[derive(Debug, Clone)]
pub struct LocalMediaJob {
    /// 临时文件路径，仅在调用期间有效
    pub path: PathBuf,
    /// 客户端上传时的文件名
    pub original_name: Option<String>,
    pub target_lang: LanguageCode,
    pub subtitle_format: SubtitleFormat,
}

/// YouTube 链接处理任务
#[derive(Debug, Clone)]
pub struct SubtitleJob {
    pub youtube_url: String,
    pub target_lang: LanguageCode,
    pub subtitle_format: SubtitleFormat,
}

/// Transcription Port
#[async_trait]
pub trait TranscriptionPort: Send + Sync {
    /// 处理上传的视频：转写并生成翻译后的字幕
    async fn process_uploaded_video(&self, job: LocalMediaJob) -> Result<Value, CollaboratorError>;

    /// 提取 YouTube 字幕并翻译，返回字幕文件路径
    async fn process_youtube_subtitles(&self, job: SubtitleJob)
        -> Result<String, CollaboratorError>;

    /// 下载 YouTube 视频并完整处理（转写 + 翻译）
    async fn process_youtube_video(
        &self,
        job: SubtitleJob,
        model_size: &str,
    ) -> Result<Value, CollaboratorError>;

    /// 从视频中提取音频，返回音频文件路径
    async fn convert_video_to_audio(&self, video_path: &str) -> Result<String, CollaboratorError>;

    /// 生成带字幕的视频，返回输出视频路径
    async fn process_video_with_subtitles(
        &self,
        job: SubtitleJob,
        model_size: &str,
    ) -> Result<String, CollaboratorError>;

    /// 仅生成字幕并返回字幕内容
    async fn process_video_and_return_subtitles(
        &self,
        job: SubtitleJob,
        model_size: &str,
    ) -> Result<Value, CollaboratorError>;

    /// 音频转字幕并翻译
    async fn generate_and_translate_subtitles(
        &self,
        job: LocalMediaJob,
    ) -> Result<Value, CollaboratorError>;
}

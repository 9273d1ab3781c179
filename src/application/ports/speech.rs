//! Speech Port - 文本转语音与声音克隆

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;

use crate::application::CollaboratorError;
use crate::domain::VoiceId;

/// 声音克隆样本
#[derive(Debug, Clone)]
pub struct VoiceSample {
    pub file_name: String,
    pub content_type: Option<String>,
    /// 样本临时文件路径，仅在调用期间有效
    pub path: PathBuf,
}

/// 声音克隆请求
#[derive(Debug, Clone)]
pub struct VoiceCloneRequest {
    pub name: String,
    /// 标签（协作方约定的 JSON 字符串，原样转发）
    pub labels: String,
    pub description: String,
    pub samples: Vec<VoiceSample>,
}

/// Speech Port
#[async_trait]
pub trait SpeechPort: Send + Sync {
    /// 使用指定音色合成语音
    async fn text_to_speech(&self, voice_id: &VoiceId, text: &str)
        -> Result<Value, CollaboratorError>;

    /// 克隆声音，返回协作方的原始响应
    async fn clone_voice(&self, request: VoiceCloneRequest) -> Result<Value, CollaboratorError>;
}

//! Media Generation Port - 图像、音乐、图表生成

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::application::CollaboratorError;

/// 音乐生成请求
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MusicRequest {
    /// 描述音乐风格的提示词
    pub prompts: Vec<String>,
    /// 目标时长（秒）
    pub duration: u32,
}

/// Media Generation Port
#[async_trait]
pub trait MediaGenerationPort: Send + Sync {
    /// 根据提示词生成图像，返回协作方的图像描述
    async fn process_image(&self, prompt: &str) -> Result<Value, CollaboratorError>;

    /// 根据提示词和时长生成音乐
    async fn generate_music(&self, request: MusicRequest) -> Result<Value, CollaboratorError>;

    /// 根据指令生成饼图文本
    async fn generate_pie_chart(&self, instruction: &str) -> Result<String, CollaboratorError>;
}

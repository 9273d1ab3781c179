//! Data Transfer Objects

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// 请求
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ImageGenerationRequest {
    pub prompt: String,
}

/// 提示词，可以是单个字符串或字符串列表
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Prompts {
    One(String),
    Many(Vec<String>),
}

impl Prompts {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Prompts::One(prompt) => vec![prompt],
            Prompts::Many(prompts) => prompts,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MusicGenerationRequest {
    pub prompts: Prompts,
    /// 时长（秒）
    pub duration: u32,
}

#[derive(Debug, Deserialize)]
pub struct PieChartRequest {
    pub instruction: String,
}

// ============================================================================
// 响应
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ChartResponse {
    pub result: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse<T: Serialize> {
    pub message: T,
}

impl MessageResponse<String> {
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubtitlesFileResponse {
    pub message: &'static str,
    pub subtitles_file: String,
}

#[derive(Debug, Serialize)]
pub struct AudioPathResponse {
    pub message: &'static str,
    pub audio_path: String,
}

#[derive(Debug, Serialize)]
pub struct SubtitlesResponse {
    pub subtitles: Value,
}

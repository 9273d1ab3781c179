//! Speech Handlers - 文本转语音与声音克隆

use axum::{extract::State, Json};
use serde_json::Value;
use std::sync::Arc;

use crate::application::{VoiceCloneRequest, VoiceSample};
use crate::domain::VoiceId;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::FormData;
use crate::infrastructure::http::state::AppState;

/// 文本转语音
pub async fn convert_text_to_speech(
    State(state): State<Arc<AppState>>,
    form: FormData,
) -> Result<Json<Value>, ApiError> {
    let voice_id = VoiceId::new(form.text("voice_id")?)?;
    let text = form.text("text")?;

    tracing::info!(voice_id = %voice_id, text_len = text.len(), "Text-to-speech requested");

    let result = state.speech.text_to_speech(&voice_id, text).await?;
    Ok(Json(result))
}

/// 声音克隆，直接返回协作方响应
pub async fn clone_voice(
    State(state): State<Arc<AppState>>,
    mut form: FormData,
) -> Result<Json<Value>, ApiError> {
    let name = form.text("name")?.to_string();
    let labels = form.text("labels")?.to_string();
    let description = form.text("description")?.to_string();

    // 样本临时文件在 `files` drop 前保持存在
    let files = form.take_files("audio_files");
    if files.is_empty() {
        return Err(ApiError::missing("audio_files"));
    }

    let samples: Vec<VoiceSample> = files
        .iter()
        .enumerate()
        .map(|(i, file)| VoiceSample {
            file_name: file
                .file_name
                .clone()
                .unwrap_or_else(|| format!("sample_{}.mp3", i + 1)),
            content_type: file.content_type.clone(),
            path: file.path().to_path_buf(),
        })
        .collect();

    tracing::info!(name = %name, samples = samples.len(), "Voice clone requested");

    let response = state
        .speech
        .clone_voice(VoiceCloneRequest {
            name,
            labels,
            description,
            samples,
        })
        .await?;
    drop(files);

    Ok(Json(response))
}

//! Generation Handlers - 图像、音乐、图表

use axum::{extract::State, Json};
use serde_json::Value;
use std::sync::Arc;

use crate::application::MusicRequest;
use crate::infrastructure::http::dto::{
    ChartResponse, ImageGenerationRequest, MusicGenerationRequest, PieChartRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::ApiJson;
use crate::infrastructure::http::state::AppState;

/// 图像生成
pub async fn process_image(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<ImageGenerationRequest>,
) -> Result<Json<Value>, ApiError> {
    tracing::info!(prompt_len = req.prompt.len(), "Image generation requested");

    let result = state.media.process_image(&req.prompt).await?;
    Ok(Json(result))
}

/// 音乐生成
pub async fn generate_music(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<MusicGenerationRequest>,
) -> Result<Json<Value>, ApiError> {
    let prompts = req.prompts.into_vec();
    if prompts.is_empty() {
        return Err(ApiError::BadRequest("prompts cannot be empty".to_string()));
    }
    if req.duration == 0 {
        return Err(ApiError::BadRequest(
            "duration must be greater than 0".to_string(),
        ));
    }

    tracing::info!(
        prompts = prompts.len(),
        duration = req.duration,
        "Music generation requested"
    );

    let result = state
        .media
        .generate_music(MusicRequest {
            prompts,
            duration: req.duration,
        })
        .await?;
    Ok(Json(result))
}

/// 饼图文本生成
pub async fn generate_pie_chart(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<PieChartRequest>,
) -> Result<Json<ChartResponse>, ApiError> {
    let result = state.media.generate_pie_chart(&req.instruction).await?;
    Ok(Json(ChartResponse { result }))
}

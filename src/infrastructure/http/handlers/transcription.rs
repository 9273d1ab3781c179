//! Transcription Handlers - YouTube/视频/音频转写与字幕
//!
//! 所有失败都返回 `{"error": "..."}`。上传的文件在提取阶段已写入临时文件，
//! 处理函数返回时随 `FormData` 一起删除

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use std::sync::Arc;

use crate::application::{LocalMediaJob, SubtitleJob};
use crate::domain::{LanguageCode, SubtitleFormat};
use crate::infrastructure::http::dto::{
    AudioPathResponse, MessageResponse, SubtitlesFileResponse, SubtitlesResponse,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::{FormData, UploadedFile};
use crate::infrastructure::http::state::AppState;

/// 读取目标语言和字幕格式，字段名按顺序尝试
fn language_and_format(
    form: &FormData,
    lang_keys: &[&str],
    format_keys: &[&str],
) -> Result<(LanguageCode, SubtitleFormat), ApiError> {
    let lang = LanguageCode::new(form.text_any(lang_keys)?)?;
    let format = form.text_any(format_keys)?.parse::<SubtitleFormat>()?;
    Ok((lang, format))
}

/// 使用默认语言和格式构造 YouTube 任务
fn default_job(state: &AppState, form: &FormData) -> Result<SubtitleJob, ApiError> {
    Ok(SubtitleJob {
        youtube_url: form.text("youtube_url")?.to_string(),
        target_lang: state.defaults.target_lang.clone(),
        subtitle_format: state.defaults.subtitle_format,
    })
}

/// 用已落盘的上传文件构造本地媒体任务
fn media_job(
    upload: &UploadedFile,
    target_lang: LanguageCode,
    subtitle_format: SubtitleFormat,
) -> LocalMediaJob {
    LocalMediaJob {
        path: upload.path().to_path_buf(),
        original_name: upload.file_name.clone(),
        target_lang,
        subtitle_format,
    }
}

/// 上传视频生成字幕
async fn process_uploaded_video(
    state: &AppState,
    form: &FormData,
) -> Result<Json<Value>, ApiError> {
    let video = form.file("video_file")?;
    let (lang, format) =
        language_and_format(form, &["target_lang_code"], &["subtitle_type"])?;

    tracing::info!(
        file_name = ?video.file_name,
        size = video.size(),
        target_lang = %lang,
        subtitle_type = %format,
        "Processing uploaded video"
    );

    let result = state
        .transcription
        .process_uploaded_video(media_job(video, lang, format))
        .await?;

    Ok(Json(result))
}

/// 下载 YouTube 视频并处理
async fn process_youtube_url(
    state: &AppState,
    form: &FormData,
) -> Result<Json<MessageResponse<Value>>, ApiError> {
    let youtube_url = form.text("youtube_url")?.to_string();
    let (target_lang, subtitle_format) = language_and_format(
        form,
        &["TARGET_LANG_CODE", "target_lang_code"],
        &["SUBTITLE_TYPE", "subtitle_type"],
    )?;

    tracing::info!(
        youtube_url = %youtube_url,
        model_size = %state.defaults.model_size,
        target_lang = %target_lang,
        subtitle_type = %subtitle_format,
        "Processing YouTube video"
    );

    let job = SubtitleJob {
        youtube_url,
        target_lang,
        subtitle_format,
    };
    let result = state
        .transcription
        .process_youtube_video(job, &state.defaults.model_size)
        .await?;

    Ok(Json(MessageResponse { message: result }))
}

/// `/process_youtube_video/`
///
/// 带 `video_file` 时按上传视频处理，否则按 `youtube_url` 处理
pub async fn process_youtube_video(
    State(state): State<Arc<AppState>>,
    form: FormData,
) -> Result<Response, ApiError> {
    if form.has_file("video_file") {
        return Ok(process_uploaded_video(&state, &form).await?.into_response());
    }

    if form.has_text("youtube_url") {
        return Ok(process_youtube_url(&state, &form).await?.into_response());
    }

    Err(ApiError::missing("video_file"))
}

/// `/process_youtube_url/`
pub async fn process_youtube_video_url(
    State(state): State<Arc<AppState>>,
    form: FormData,
) -> Result<Json<MessageResponse<Value>>, ApiError> {
    process_youtube_url(&state, &form).await
}

/// 提取并翻译 YouTube 字幕
pub async fn process_youtube_sub(
    State(state): State<Arc<AppState>>,
    form: FormData,
) -> Result<Json<SubtitlesFileResponse>, ApiError> {
    let youtube_url = form.text("youtube_url")?.to_string();
    let (target_lang, subtitle_format) =
        language_and_format(&form, &["target_lang_code"], &["subtitle_type"])?;

    tracing::info!(youtube_url = %youtube_url, target_lang = %target_lang, "Processing YouTube subtitles");

    let subtitles_file = state
        .transcription
        .process_youtube_subtitles(SubtitleJob {
            youtube_url,
            target_lang,
            subtitle_format,
        })
        .await?;

    Ok(Json(SubtitlesFileResponse {
        message: "Subtitles processed and translated successfully",
        subtitles_file,
    }))
}

/// 视频转音频
pub async fn convert_video_to_audio(
    State(state): State<Arc<AppState>>,
    form: FormData,
) -> Result<Json<AudioPathResponse>, ApiError> {
    let video_path = form.text("video_path")?;

    tracing::info!(video_path = %video_path, "Converting video to audio");

    let audio_path = state.transcription.convert_video_to_audio(video_path).await?;

    Ok(Json(AudioPathResponse {
        message: "Video converted to audio successfully",
        audio_path,
    }))
}

/// 生成带字幕的视频
pub async fn process_video_with_subtitles(
    State(state): State<Arc<AppState>>,
    form: FormData,
) -> Result<Json<MessageResponse<String>>, ApiError> {
    let job = default_job(&state, &form)?;

    tracing::info!(youtube_url = %job.youtube_url, "Processing video with subtitles");

    let output_path = state
        .transcription
        .process_video_with_subtitles(job, &state.defaults.model_size)
        .await?;

    tracing::info!(output_path = %output_path, "Subtitled video ready");

    Ok(Json(MessageResponse::text(
        "Video processed and subtitled successfully",
    )))
}

/// 生成并返回字幕
pub async fn process_video_and_get_subtitles(
    State(state): State<Arc<AppState>>,
    form: FormData,
) -> Result<Json<SubtitlesResponse>, ApiError> {
    let job = default_job(&state, &form)?;

    tracing::info!(youtube_url = %job.youtube_url, "Generating video subtitles");

    let subtitles = state
        .transcription
        .process_video_and_return_subtitles(job, &state.defaults.model_size)
        .await?;

    Ok(Json(SubtitlesResponse { subtitles }))
}

/// 音频转字幕并翻译
pub async fn process_audio_and_get_subtitles(
    State(state): State<Arc<AppState>>,
    form: FormData,
) -> Result<Json<Value>, ApiError> {
    let audio = form.file("audio_file")?;

    tracing::info!(
        file_name = ?audio.file_name,
        size = audio.size(),
        "Generating subtitles from audio"
    );

    let job = media_job(
        audio,
        state.defaults.target_lang.clone(),
        state.defaults.subtitle_format,
    );
    let result = state
        .transcription
        .generate_and_translate_subtitles(job)
        .await?;

    Ok(Json(result))
}

//! HTTP Routes
//!
//! API Endpoints:
//! - /                                         GET   欢迎文本
//! - /api/ping                                 GET   健康检查
//! - /api/image_generation/process_image       POST  图像生成 (JSON)
//! - /api/music_gen/generate_music             POST  音乐生成 (JSON)
//! - /api/pie_chart/generate_pie_chart         POST  饼图文本 (JSON)
//! - /insert_user/                             POST  登记用户
//! - /process_youtube_video/                   POST  上传视频或 YouTube 链接处理
//! - /process_youtube_url/                     POST  YouTube 链接处理
//! - /process_youtube_sub/                     POST  YouTube 字幕提取翻译
//! - /convert_video_to_audio/                  POST  视频转音频
//! - /process_video_with_subtitles/            POST  生成带字幕视频
//! - /process_video_and_get_subtitles/         POST  生成字幕
//! - /process_audio_and_get_subtitles/         POST  音频转字幕
//! - /convert/                                 POST  文本转语音
//! - /clone_voice/                             POST  声音克隆
//! - /static/<path>                            GET   静态文件

use axum::{
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes(static_dir: impl AsRef<Path>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::index))
        .nest("/api", api_routes())
        .route("/insert_user/", post(handlers::insert_user))
        .merge(transcription_routes())
        .merge(speech_routes())
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))
}

/// JSON API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route(
            "/image_generation/process_image",
            post(handlers::process_image),
        )
        .route("/music_gen/generate_music", post(handlers::generate_music))
        .route(
            "/pie_chart/generate_pie_chart",
            post(handlers::generate_pie_chart),
        )
}

/// 转写/字幕路由
fn transcription_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/process_youtube_video/",
            post(handlers::process_youtube_video),
        )
        .route(
            "/process_youtube_url/",
            post(handlers::process_youtube_video_url),
        )
        .route("/process_youtube_sub/", post(handlers::process_youtube_sub))
        .route(
            "/convert_video_to_audio/",
            post(handlers::convert_video_to_audio),
        )
        .route(
            "/process_video_with_subtitles/",
            post(handlers::process_video_with_subtitles),
        )
        .route(
            "/process_video_and_get_subtitles/",
            post(handlers::process_video_and_get_subtitles),
        )
        .route(
            "/process_audio_and_get_subtitles/",
            post(handlers::process_audio_and_get_subtitles),
        )
}

/// 语音路由
fn speech_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/convert/", post(handlers::convert_text_to_speech))
        .route("/clone_voice/", post(handlers::clone_voice))
}

//! mediahub - 媒体生成与转写 API 网关

use std::sync::Arc;

use mediahub::config::{load_config, print_config};
use mediahub::infrastructure::adapters::{
    ElevenLabsClient, ElevenLabsClientConfig, HttpHelperClient, HttpHelperClientConfig,
    TempUploadDir,
};
use mediahub::infrastructure::http::{AppState, HttpServer, ServerConfig, TranscriptionDefaults};
use mediahub::infrastructure::init_telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志，guard 存活到 main 结束
    let _log_guard = init_telemetry(&config.log)?;

    tracing::info!("mediahub - 媒体生成与转写 API 网关");
    print_config(&config);

    // 确保静态目录和上传目录存在
    tokio::fs::create_dir_all(&config.static_files.dir).await?;
    let uploads = TempUploadDir::new(config.storage.upload_dir());
    tokio::fs::create_dir_all(uploads.path()).await?;

    // Helper 服务客户端（图像、音乐、图表、用户、转写）
    let helper_config = HttpHelperClientConfig::new(config.helpers.url.clone())
        .with_timeout(config.helpers.timeout_secs);
    let helpers = Arc::new(HttpHelperClient::new(helper_config)?);

    // ElevenLabs 客户端（文本转语音、声音克隆）
    let speech = Arc::new(ElevenLabsClient::new(ElevenLabsClientConfig {
        base_url: config.elevenlabs.url.clone(),
        api_key: config.elevenlabs.api_key.clone(),
        model_id: config.elevenlabs.model_id.clone(),
        timeout_secs: config.elevenlabs.timeout_secs,
        static_dir: config.static_files.dir.clone(),
    })?);

    let defaults = TranscriptionDefaults::try_from(&config.transcription)?;

    let state = AppState::new(
        helpers.clone(),
        helpers.clone(),
        helpers,
        speech,
        uploads,
        defaults,
        config.static_files.dir.clone(),
    );

    let server_config = ServerConfig::new(&config.server.host, config.server.port)
        .with_cors_origins(config.server.cors_origins.clone())
        .with_max_body_bytes(config.server.max_body_bytes);

    let server = HttpServer::new(server_config, state);

    tracing::info!("Starting HTTP server...");

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

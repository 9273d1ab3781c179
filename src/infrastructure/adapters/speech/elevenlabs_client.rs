//! ElevenLabs Client - 文本转语音与声音克隆
//!
//! 实现 SpeechPort trait
//!
//! ElevenLabs API:
//! - POST {url}/v1/text-to-speech/{voice_id}  {"text", "model_id"} -> audio/mpeg
//! - POST {url}/v1/voices/add                 multipart(name, description, labels, files[])
//!
//! 合成的音频写入静态目录下的 `audio/`，通过 `/static/audio/<id>.mp3` 访问。
//! URL 按路径段拼接并转义，voice_id 不能改变请求的路径或查询参数

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::multipart::Form;
use reqwest::{Client, Url};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

use crate::application::{CollaboratorError, SpeechPort, VoiceCloneRequest};
use crate::domain::VoiceId;
use crate::infrastructure::adapters::multipart::file_part;

/// ElevenLabs 客户端配置
#[derive(Debug, Clone)]
pub struct ElevenLabsClientConfig {
    /// API 基础 URL
    pub base_url: String,
    /// API Key
    pub api_key: String,
    /// 合成模型
    pub model_id: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 合成音频输出目录（静态根目录）
    pub static_dir: PathBuf,
}

impl Default for ElevenLabsClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.elevenlabs.io".to_string(),
            api_key: String::new(),
            model_id: "eleven_multilingual_v2".to_string(),
            timeout_secs: 120,
            static_dir: PathBuf::from("static"),
        }
    }
}

#[derive(Debug, Serialize)]
struct SpeechBody<'a> {
    text: &'a str,
    model_id: &'a str,
}

/// 合成音频在静态目录下的子目录
const AUDIO_SUBDIR: &str = "audio";

pub struct ElevenLabsClient {
    client: Client,
    config: ElevenLabsClientConfig,
}

impl ElevenLabsClient {
    pub fn new(config: ElevenLabsClientConfig) -> Result<Self, CollaboratorError> {
        let mut headers = HeaderMap::new();
        if !config.api_key.is_empty() {
            let key = HeaderValue::from_str(&config.api_key)
                .map_err(|e| CollaboratorError::Failed(format!("Invalid API key: {}", e)))?;
            headers.insert("xi-api-key", key);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| CollaboratorError::Unavailable(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 在基础 URL 后追加路径段，每段单独转义
    fn endpoint(&self, segments: &[&str]) -> Result<Url, CollaboratorError> {
        let mut url = Url::parse(&self.config.base_url).map_err(|e| {
            CollaboratorError::Failed(format!("Invalid ElevenLabs URL {}: {}", self.config.base_url, e))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                CollaboratorError::Failed(format!(
                    "Invalid ElevenLabs URL {}: cannot be a base",
                    self.config.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    fn tts_url(&self, voice_id: &str) -> Result<Url, CollaboratorError> {
        self.endpoint(&["v1", "text-to-speech", voice_id])
    }

    fn clone_url(&self) -> Result<Url, CollaboratorError> {
        self.endpoint(&["v1", "voices", "add"])
    }

    /// 把合成音频写入静态目录，返回对外 URL
    async fn store_audio(&self, audio: &[u8]) -> Result<String, CollaboratorError> {
        let dir = self.config.static_dir.join(AUDIO_SUBDIR);
        tokio::fs::create_dir_all(&dir).await?;

        let file_name = format!("{}.mp3", Uuid::new_v4());
        tokio::fs::write(dir.join(&file_name), audio).await?;

        Ok(format!("/static/{}/{}", AUDIO_SUBDIR, file_name))
    }
}

/// 解析 ElevenLabs 错误响应（`{"detail": {"message": ...}}` 或 `{"detail": "..."}`）
fn fault_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        let detail = &value["detail"];
        if let Some(msg) = detail["message"].as_str().or_else(|| detail.as_str()) {
            return msg.to_string();
        }
    }
    format!("ElevenLabs returned HTTP {}", status)
}

#[async_trait]
impl SpeechPort for ElevenLabsClient {
    async fn text_to_speech(
        &self,
        voice_id: &VoiceId,
        text: &str,
    ) -> Result<Value, CollaboratorError> {
        tracing::debug!(
            voice_id = %voice_id,
            text_len = text.len(),
            "Sending text-to-speech request"
        );

        let response = self
            .client
            .post(self.tts_url(voice_id.as_str())?)
            .header(ACCEPT, "audio/mpeg")
            .json(&SpeechBody {
                text,
                model_id: &self.config.model_id,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CollaboratorError::Failed(fault_message(status.as_u16(), &body)));
        }

        let audio = response.bytes().await?;
        let audio_url = self.store_audio(&audio).await?;

        tracing::info!(
            voice_id = %voice_id,
            audio_size = audio.len(),
            audio_url = %audio_url,
            "Text-to-speech completed"
        );

        Ok(json!({ "audio_url": audio_url, "voice_id": voice_id.as_str() }))
    }

    async fn clone_voice(&self, request: VoiceCloneRequest) -> Result<Value, CollaboratorError> {
        let sample_count = request.samples.len();
        let mut form = Form::new()
            .text("name", request.name)
            .text("description", request.description)
            .text("labels", request.labels);

        for sample in request.samples {
            let part = file_part(&sample.path, sample.file_name, sample.content_type.as_deref()).await?;
            form = form.part("files", part);
        }

        tracing::debug!(samples = sample_count, "Sending voice clone request");

        let response = self
            .client
            .post(self.clone_url()?)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CollaboratorError::Failed(fault_message(status.as_u16(), &body)));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| CollaboratorError::InvalidResponse(e.to_string()))
    }
}

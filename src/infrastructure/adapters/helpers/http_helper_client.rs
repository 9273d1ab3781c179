//! HTTP Helper Client - 调用外部媒体/转写 helper 服务
//!
//! 实现 MediaGenerationPort、UserRegistryPort、TranscriptionPort
//!
//! Helper API（JSON，除上传类接口外）:
//! - POST /image/generate                  {"prompt"}
//! - POST /music/generate                  {"prompts", "duration"}
//! - POST /chart/pie                       {"instruction"} -> {"text"}
//! - POST /users                           {first_name, ...} -> {"message"}
//! - POST /transcript/upload               multipart(file, target_lang_code, subtitle_type)
//! - POST /transcript/youtube_subtitles    -> {"subtitles_file"}
//! - POST /transcript/youtube_video
//! - POST /transcript/video_to_audio       -> {"audio_path"}
//! - POST /transcript/video_with_subtitles -> {"output_path"}
//! - POST /transcript/video_subtitles
//! - POST /transcript/audio_subtitles      multipart(file, target_lang_code, subtitle_type)
//!
//! 失败时 helper 返回非 2xx，body 为 {"error": "..."} 或 {"detail": "..."}

use async_trait::async_trait;
use reqwest::multipart::Form;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::application::{
    CollaboratorError, LocalMediaJob, MediaGenerationPort, MusicRequest, SubtitleJob,
    TranscriptionPort, UserRegistryPort,
};
use crate::domain::UserContact;
use crate::infrastructure::adapters::multipart::file_part;

/// HTTP Helper 客户端配置
#[derive(Debug, Clone)]
pub struct HttpHelperClientConfig {
    /// Helper 服务基础 URL
    pub base_url: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpHelperClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8100".to_string(),
            timeout_secs: 900,
        }
    }
}

impl HttpHelperClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

#[derive(Debug, Serialize)]
struct PromptBody<'a> {
    prompt: &'a str,
}

#[derive(Debug, Serialize)]
struct InstructionBody<'a> {
    instruction: &'a str,
}

#[derive(Debug, Serialize)]
struct YoutubeBody<'a> {
    youtube_url: &'a str,
    target_lang_code: &'a str,
    subtitle_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    model_size: Option<&'a str>,
}

impl<'a> YoutubeBody<'a> {
    fn new(job: &'a SubtitleJob, model_size: Option<&'a str>) -> Self {
        Self {
            youtube_url: &job.youtube_url,
            target_lang_code: job.target_lang.as_str(),
            subtitle_type: job.subtitle_format.as_str(),
            model_size,
        }
    }
}

#[derive(Debug, Serialize)]
struct VideoPathBody<'a> {
    video_path: &'a str,
}

#[derive(Debug, Deserialize)]
struct TextReply {
    text: String,
}

#[derive(Debug, Deserialize)]
struct MessageReply {
    message: String,
}

#[derive(Debug, Deserialize)]
struct SubtitlesFileReply {
    subtitles_file: String,
}

#[derive(Debug, Deserialize)]
struct AudioPathReply {
    audio_path: String,
}

#[derive(Debug, Deserialize)]
struct OutputPathReply {
    output_path: String,
}

/// HTTP Helper 客户端
pub struct HttpHelperClient {
    client: Client,
    config: HttpHelperClientConfig,
}

impl HttpHelperClient {
    pub fn new(config: HttpHelperClientConfig) -> Result<Self, CollaboratorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CollaboratorError::Unavailable(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, CollaboratorError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.url(path);
        tracing::debug!(url = %url, "Sending helper request");

        let response = self.client.post(&url).json(body).send().await?;
        decode(response).await
    }

    /// 上传本地媒体文件，文件内容从磁盘流式发送
    async fn post_media(
        &self,
        path: &str,
        job: &LocalMediaJob,
    ) -> Result<Value, CollaboratorError> {
        let file_name = job.original_name.clone().unwrap_or_else(|| {
            job.path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("upload.bin")
                .to_string()
        });

        let url = self.url(path);
        tracing::debug!(
            url = %url,
            file_name = %file_name,
            path = %job.path.display(),
            "Uploading media to helper"
        );

        let form = Form::new()
            .part("file", file_part(&job.path, file_name, None).await?)
            .text("target_lang_code", job.target_lang.to_string())
            .text("subtitle_type", job.subtitle_format.to_string());

        let response = self.client.post(&url).multipart(form).send().await?;
        decode(response).await
    }
}

/// 解析 helper 响应，非 2xx 转换为 `CollaboratorError::Failed`
async fn decode<R: DeserializeOwned>(response: Response) -> Result<R, CollaboratorError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CollaboratorError::Failed(fault_message(status.as_u16(), &body)));
    }

    response
        .json::<R>()
        .await
        .map_err(|e| CollaboratorError::InvalidResponse(e.to_string()))
}

/// 从错误响应中提取描述
fn fault_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["error", "detail", "message"] {
            if let Some(msg) = value.get(key).and_then(Value::as_str) {
                return msg.to_string();
            }
        }
    }

    let body = body.trim();
    if body.is_empty() {
        format!("Helper service returned HTTP {}", status)
    } else {
        body.to_string()
    }
}

#[async_trait]
impl MediaGenerationPort for HttpHelperClient {
    async fn process_image(&self, prompt: &str) -> Result<Value, CollaboratorError> {
        self.post_json("/image/generate", &PromptBody { prompt }).await
    }

    async fn generate_music(&self, request: MusicRequest) -> Result<Value, CollaboratorError> {
        self.post_json("/music/generate", &request).await
    }

    async fn generate_pie_chart(&self, instruction: &str) -> Result<String, CollaboratorError> {
        let reply: TextReply = self
            .post_json("/chart/pie", &InstructionBody { instruction })
            .await?;
        Ok(reply.text)
    }
}

#[async_trait]
impl UserRegistryPort for HttpHelperClient {
    async fn insert_user(&self, contact: UserContact) -> Result<String, CollaboratorError> {
        let reply: MessageReply = self.post_json("/users", &contact).await?;
        Ok(reply.message)
    }
}

#[async_trait]
impl TranscriptionPort for HttpHelperClient {
    async fn process_uploaded_video(&self, job: LocalMediaJob) -> Result<Value, CollaboratorError> {
        self.post_media("/transcript/upload", &job).await
    }

    async fn process_youtube_subtitles(
        &self,
        job: SubtitleJob,
    ) -> Result<String, CollaboratorError> {
        let reply: SubtitlesFileReply = self
            .post_json("/transcript/youtube_subtitles", &YoutubeBody::new(&job, None))
            .await?;
        Ok(reply.subtitles_file)
    }

    async fn process_youtube_video(
        &self,
        job: SubtitleJob,
        model_size: &str,
    ) -> Result<Value, CollaboratorError> {
        self.post_json(
            "/transcript/youtube_video",
            &YoutubeBody::new(&job, Some(model_size)),
        )
        .await
    }

    async fn convert_video_to_audio(&self, video_path: &str) -> Result<String, CollaboratorError> {
        let reply: AudioPathReply = self
            .post_json("/transcript/video_to_audio", &VideoPathBody { video_path })
            .await?;
        Ok(reply.audio_path)
    }

    async fn process_video_with_subtitles(
        &self,
        job: SubtitleJob,
        model_size: &str,
    ) -> Result<String, CollaboratorError> {
        let reply: OutputPathReply = self
            .post_json(
                "/transcript/video_with_subtitles",
                &YoutubeBody::new(&job, Some(model_size)),
            )
            .await?;
        Ok(reply.output_path)
    }

    async fn process_video_and_return_subtitles(
        &self,
        job: SubtitleJob,
        model_size: &str,
    ) -> Result<Value, CollaboratorError> {
        self.post_json(
            "/transcript/video_subtitles",
            &YoutubeBody::new(&job, Some(model_size)),
        )
        .await
    }

    async fn generate_and_translate_subtitles(
        &self,
        job: LocalMediaJob,
    ) -> Result<Value, CollaboratorError> {
        self.post_media("/transcript/audio_subtitles", &job).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LanguageCode, SubtitleFormat};
    use mockito::Matcher;
    use serde_json::json;
    use std::io::Write;

    fn client_for(server: &mockito::ServerGuard) -> HttpHelperClient {
        HttpHelperClient::new(HttpHelperClientConfig::new(server.url()).with_timeout(5)).unwrap()
    }

    fn youtube_job(lang: &str, format: SubtitleFormat) -> SubtitleJob {
        SubtitleJob {
            youtube_url: "https://youtu.be/abc".to_string(),
            target_lang: LanguageCode::new(lang).unwrap(),
            subtitle_format: format,
        }
    }

    #[test]
    fn test_config_default() {
        let config = HttpHelperClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8100");
        assert_eq!(config.timeout_secs, 900);
    }

    #[test]
    fn test_config_builder() {
        let config = HttpHelperClientConfig::new("http://helpers:9000").with_timeout(30);
        assert_eq!(config.base_url, "http://helpers:9000");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let client =
            HttpHelperClient::new(HttpHelperClientConfig::new("http://helpers:9000/")).unwrap();
        assert_eq!(client.url("/chart/pie"), "http://helpers:9000/chart/pie");
    }

    #[test]
    fn test_fault_message_prefers_error_field() {
        assert_eq!(
            fault_message(500, r#"{"error": "download failed"}"#),
            "download failed"
        );
        assert_eq!(fault_message(422, r#"{"detail": "bad url"}"#), "bad url");
        assert_eq!(fault_message(500, "boom\n"), "boom");
        assert_eq!(fault_message(502, ""), "Helper service returned HTTP 502");
    }

    #[test]
    fn test_youtube_body_serialization() {
        let job = SubtitleJob {
            youtube_url: "https://youtu.be/abc".to_string(),
            target_lang: LanguageCode::new("de").unwrap(),
            subtitle_format: SubtitleFormat::Vtt,
        };

        let without_model = serde_json::to_value(YoutubeBody::new(&job, None)).unwrap();
        assert_eq!(
            without_model,
            serde_json::json!({
                "youtube_url": "https://youtu.be/abc",
                "target_lang_code": "de",
                "subtitle_type": "vtt"
            })
        );

        let with_model = serde_json::to_value(YoutubeBody::new(&job, Some("medium"))).unwrap();
        assert_eq!(with_model["model_size"], "medium");
    }

    #[tokio::test]
    async fn test_pie_chart_posts_json_and_reads_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chart/pie")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({ "instruction": "market share" })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"text": "Apples 40%, Pears 60%"}"#)
            .create_async()
            .await;

        let text = client_for(&server)
            .generate_pie_chart("market share")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(text, "Apples 40%, Pears 60%");
    }

    #[tokio::test]
    async fn test_youtube_video_sends_model_size() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/transcript/youtube_video")
            .match_body(Matcher::Json(json!({
                "youtube_url": "https://youtu.be/abc",
                "target_lang_code": "it",
                "subtitle_type": "srt",
                "model_size": "medium"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"subtitles_file": "video.srt"}"#)
            .create_async()
            .await;

        let result = client_for(&server)
            .process_youtube_video(youtube_job("it", SubtitleFormat::Srt), "medium")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result, json!({ "subtitles_file": "video.srt" }));
    }

    #[tokio::test]
    async fn test_non_success_status_is_failed_with_description() {
        let mut server = mockito::Server::new_async().await;
        let _json_fault = server
            .mock("POST", "/transcript/youtube_subtitles")
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "download failed"}"#)
            .create_async()
            .await;
        let _text_fault = server
            .mock("POST", "/transcript/video_to_audio")
            .with_status(422)
            .with_body("video not found\n")
            .create_async()
            .await;

        let client = client_for(&server);

        match client
            .process_youtube_subtitles(youtube_job("de", SubtitleFormat::Vtt))
            .await
        {
            Err(CollaboratorError::Failed(message)) => assert_eq!(message, "download failed"),
            other => panic!("unexpected: {:?}", other),
        }

        match client.convert_video_to_audio("clip.mp4").await {
            Err(CollaboratorError::Failed(message)) => assert_eq!(message, "video not found"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_undecodable_reply_is_invalid_response() {
        let mut server = mockito::Server::new_async().await;
        let _not_json = server
            .mock("POST", "/image/generate")
            .with_status(200)
            .with_body("<html>proxy page</html>")
            .create_async()
            .await;
        let _wrong_shape = server
            .mock("POST", "/users")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status": "ok"}"#)
            .create_async()
            .await;

        let client = client_for(&server);

        assert!(matches!(
            client.process_image("a cat").await,
            Err(CollaboratorError::InvalidResponse(_))
        ));

        let contact = UserContact {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            username: "ada".to_string(),
            phone_number: "5550100".to_string(),
            email: "ada@example.com".to_string(),
        };
        assert!(matches!(
            client.insert_user(contact).await,
            Err(CollaboratorError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_uploaded_media_is_sent_as_multipart() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/transcript/upload")
            .match_header("content-type", Matcher::Regex("multipart/form-data".into()))
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="file"; filename="lecture.mp4""#.into()),
                Matcher::Regex("fake mp4 bytes".into()),
                Matcher::Regex(r#"name="target_lang_code"\s+es"#.into()),
                Matcher::Regex(r#"name="subtitle_type"\s+srt"#.into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message": "Video processed"}"#)
            .create_async()
            .await;

        let mut file = tempfile::Builder::new().suffix(".mp4").tempfile().unwrap();
        file.write_all(b"fake mp4 bytes").unwrap();

        let job = LocalMediaJob {
            path: file.path().to_path_buf(),
            original_name: Some("lecture.mp4".to_string()),
            target_lang: LanguageCode::new("es").unwrap(),
            subtitle_format: SubtitleFormat::Srt,
        };
        let result = client_for(&server).process_uploaded_video(job).await.unwrap();

        mock.assert_async().await;
        assert_eq!(result, json!({ "message": "Video processed" }));
    }

    #[tokio::test]
    async fn test_unreachable_helper_is_unavailable() {
        let client = HttpHelperClient::new(
            HttpHelperClientConfig::new("http://127.0.0.1:1").with_timeout(5),
        )
        .unwrap();

        assert!(matches!(
            client.generate_pie_chart("market share").await,
            Err(CollaboratorError::Unavailable(_))
        ));
    }
}

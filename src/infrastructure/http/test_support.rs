//! 路由测试用的协作方桩

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::application::{
    CollaboratorError, LocalMediaJob, MediaGenerationPort, MusicRequest, SpeechPort, SubtitleJob,
    TranscriptionPort, UserRegistryPort, VoiceCloneRequest,
};
use crate::config::TranscriptionConfig;
use crate::domain::{UserContact, VoiceId};
use crate::infrastructure::adapters::TempUploadDir;

use super::server::{build_router, ServerConfig};
use super::state::{AppState, TranscriptionDefaults};

/// 上传文件在协作方调用期间的观察结果
#[derive(Debug, Clone)]
pub struct SeenUpload {
    pub path: PathBuf,
    pub existed: bool,
    pub contents: Vec<u8>,
}

/// 同时实现四个端口的桩，记录调用次数，可配置为失败
#[derive(Default)]
pub struct StubCollaborators {
    calls: AtomicUsize,
    fault: Option<String>,
    last_method: Mutex<Option<&'static str>>,
    uploads: Mutex<Vec<SeenUpload>>,
    clone_requests: Mutex<Vec<VoiceCloneRequest>>,
    sample_contents: Mutex<Vec<Vec<u8>>>,
    music_requests: Mutex<Vec<MusicRequest>>,
    jobs: Mutex<Vec<(String, String, String, Option<String>)>>,
}

impl StubCollaborators {
    pub fn ok() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            fault: Some(message.to_string()),
            ..Default::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_method(&self) -> Option<&'static str> {
        *self.last_method.lock().unwrap()
    }

    pub fn uploads(&self) -> Vec<SeenUpload> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn clone_requests(&self) -> Vec<VoiceCloneRequest> {
        self.clone_requests.lock().unwrap().clone()
    }

    /// 调用时读到的样本文件内容
    pub fn sample_contents(&self) -> Vec<Vec<u8>> {
        self.sample_contents.lock().unwrap().clone()
    }

    pub fn music_requests(&self) -> Vec<MusicRequest> {
        self.music_requests.lock().unwrap().clone()
    }

    /// (url, lang, format, model_size)
    pub fn jobs(&self) -> Vec<(String, String, String, Option<String>)> {
        self.jobs.lock().unwrap().clone()
    }

    fn enter(&self, method: &'static str) -> Result<(), CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_method.lock().unwrap() = Some(method);
        match &self.fault {
            Some(message) => Err(CollaboratorError::failed(message.clone())),
            None => Ok(()),
        }
    }

    fn record_upload(&self, path: &Path) {
        self.uploads.lock().unwrap().push(SeenUpload {
            path: path.to_path_buf(),
            existed: path.exists(),
            contents: std::fs::read(path).unwrap_or_default(),
        });
    }

    fn record_job(&self, job: &SubtitleJob, model_size: Option<&str>) {
        self.jobs.lock().unwrap().push((
            job.youtube_url.clone(),
            job.target_lang.to_string(),
            job.subtitle_format.to_string(),
            model_size.map(str::to_string),
        ));
    }
}

#[async_trait]
impl MediaGenerationPort for StubCollaborators {
    async fn process_image(&self, prompt: &str) -> Result<Value, CollaboratorError> {
        self.enter("process_image")?;
        Ok(json!({ "image_url": "/static/images/cat.png", "prompt": prompt }))
    }

    async fn generate_music(&self, request: MusicRequest) -> Result<Value, CollaboratorError> {
        self.music_requests.lock().unwrap().push(request.clone());
        self.enter("generate_music")?;
        Ok(json!({ "audio_url": "/static/music/track.wav", "duration": request.duration }))
    }

    async fn generate_pie_chart(&self, instruction: &str) -> Result<String, CollaboratorError> {
        self.enter("generate_pie_chart")?;
        Ok(format!("chart for: {}", instruction))
    }
}

#[async_trait]
impl UserRegistryPort for StubCollaborators {
    async fn insert_user(&self, contact: UserContact) -> Result<String, CollaboratorError> {
        self.enter("insert_user")?;
        Ok(format!("User {} inserted", contact.username))
    }
}

#[async_trait]
impl TranscriptionPort for StubCollaborators {
    async fn process_uploaded_video(&self, job: LocalMediaJob) -> Result<Value, CollaboratorError> {
        self.record_upload(&job.path);
        self.enter("process_uploaded_video")?;
        Ok(json!({
            "message": "Video processed",
            "target_lang_code": job.target_lang.as_str(),
            "subtitle_type": job.subtitle_format.as_str(),
        }))
    }

    async fn process_youtube_subtitles(
        &self,
        job: SubtitleJob,
    ) -> Result<String, CollaboratorError> {
        self.record_job(&job, None);
        self.enter("process_youtube_subtitles")?;
        Ok(format!("subtitles.{}", job.subtitle_format.extension()))
    }

    async fn process_youtube_video(
        &self,
        job: SubtitleJob,
        model_size: &str,
    ) -> Result<Value, CollaboratorError> {
        self.record_job(&job, Some(model_size));
        self.enter("process_youtube_video")?;
        Ok(json!("video processed"))
    }

    async fn convert_video_to_audio(&self, video_path: &str) -> Result<String, CollaboratorError> {
        self.enter("convert_video_to_audio")?;
        Ok(video_path.replace(".mp4", ".mp3"))
    }

    async fn process_video_with_subtitles(
        &self,
        job: SubtitleJob,
        model_size: &str,
    ) -> Result<String, CollaboratorError> {
        self.record_job(&job, Some(model_size));
        self.enter("process_video_with_subtitles")?;
        Ok("output/video_subtitled.mp4".to_string())
    }

    async fn process_video_and_return_subtitles(
        &self,
        job: SubtitleJob,
        model_size: &str,
    ) -> Result<Value, CollaboratorError> {
        self.record_job(&job, Some(model_size));
        self.enter("process_video_and_return_subtitles")?;
        Ok(json!("WEBVTT\n\n00:00.000 --> 00:01.000\nHallo"))
    }

    async fn generate_and_translate_subtitles(
        &self,
        job: LocalMediaJob,
    ) -> Result<Value, CollaboratorError> {
        self.record_upload(&job.path);
        self.enter("generate_and_translate_subtitles")?;
        Ok(json!({
            "subtitles_file": "audio.vtt",
            "target_lang_code": job.target_lang.as_str(),
        }))
    }
}

#[async_trait]
impl SpeechPort for StubCollaborators {
    async fn text_to_speech(
        &self,
        _voice_id: &VoiceId,
        _text: &str,
    ) -> Result<Value, CollaboratorError> {
        self.enter("text_to_speech")?;
        Ok(json!({ "audio_url": "a.mp3" }))
    }

    async fn clone_voice(&self, request: VoiceCloneRequest) -> Result<Value, CollaboratorError> {
        for sample in &request.samples {
            self.sample_contents
                .lock()
                .unwrap()
                .push(std::fs::read(&sample.path).unwrap_or_default());
        }
        self.clone_requests.lock().unwrap().push(request.clone());
        self.enter("clone_voice")?;
        Ok(json!({ "voice_id": "cloned-123", "requires_verification": false }))
    }
}

/// 捕获日志输出，用于断言某条日志出现的次数
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// 在当前线程安装捕获用的 subscriber，guard 存活期间生效
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// 测试用临时目录（静态根 + 上传目录）
pub struct TestDirs {
    pub static_dir: TempDir,
    pub upload_dir: TempDir,
}

impl TestDirs {
    pub fn new() -> Self {
        Self {
            static_dir: tempfile::tempdir().unwrap(),
            upload_dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn upload_count(&self) -> usize {
        std::fs::read_dir(self.upload_dir.path()).unwrap().count()
    }
}

/// 用桩构建完整 Router
pub fn test_app(stub: &Arc<StubCollaborators>, dirs: &TestDirs) -> Router {
    let defaults = TranscriptionDefaults::try_from(&TranscriptionConfig::default()).unwrap();
    let state = AppState::new(
        stub.clone(),
        stub.clone(),
        stub.clone(),
        stub.clone(),
        TempUploadDir::new(dirs.upload_dir.path()),
        defaults,
        dirs.static_dir.path(),
    );

    build_router(&ServerConfig::default(), Arc::new(state))
}

pub fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn form_request(uri: &str, fields: &[(&str, &str)]) -> Request<Body> {
    let body = fields
        .iter()
        .map(|(k, v)| format!("{}={}", k, v.replace(' ', "+")))
        .collect::<Vec<_>>()
        .join("&");

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

const BOUNDARY: &str = "mediahub-test-boundary";

/// multipart 请求，files 为 (字段名, 文件名, 内容)
pub fn multipart_request(
    uri: &str,
    fields: &[(&str, &str)],
    files: &[(&str, &str, &[u8])],
) -> Request<Body> {
    let mut body: Vec<u8> = Vec::new();

    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }

    for (name, file_name, data) in files {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                BOUNDARY, name, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

//! Request Extractors
//!
//! - `ApiJson<T>`：JSON 请求体，拒绝时返回统一错误格式
//! - `FormData`：表单字段 + 上传文件，同时接受 urlencoded 与 multipart。
//!   文件字段逐块写入上传目录下的临时文件

use std::collections::HashMap;
use std::path::Path;

use axum::{
    async_trait,
    extract::{multipart::Field, FromRef, FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::infrastructure::adapters::{TempUpload, TempUploadDir};

/// JSON 请求体
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}

/// 上传的文件，内容已写入临时文件
///
/// 随 `FormData` 一起 drop 时删除
#[derive(Debug)]
pub struct UploadedFile {
    pub field: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    upload: TempUpload,
}

impl UploadedFile {
    pub fn path(&self) -> &Path {
        self.upload.path()
    }

    pub fn size(&self) -> u64 {
        self.upload.size()
    }
}

/// 上传文件名没有扩展名时，按字段使用的默认扩展名
fn default_extension(field: &str) -> &'static str {
    match field {
        "video_file" => "mp4",
        "audio_file" | "audio_files" => "mp3",
        _ => "bin",
    }
}

/// 表单数据
///
/// 同名文本字段只保留第一个；文件按出现顺序保存
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: Vec<UploadedFile>,
}

impl FormData {
    /// 读取必填文本字段
    pub fn text(&self, name: &str) -> Result<&str, ApiError> {
        self.fields
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| ApiError::missing(name))
    }

    /// 按顺序尝试多个字段名，返回第一个存在的值
    ///
    /// 都不存在时报告第一个名字
    pub fn text_any(&self, names: &[&str]) -> Result<&str, ApiError> {
        names
            .iter()
            .find_map(|name| self.fields.get(*name))
            .map(String::as_str)
            .ok_or_else(|| ApiError::missing(names.first().copied().unwrap_or_default()))
    }

    pub fn has_text(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// 读取必填文件字段
    pub fn file(&self, name: &str) -> Result<&UploadedFile, ApiError> {
        self.files
            .iter()
            .find(|f| f.field == name)
            .ok_or_else(|| ApiError::missing(name))
    }

    pub fn has_file(&self, name: &str) -> bool {
        self.files.iter().any(|f| f.field == name)
    }

    /// 取出某个字段下的全部文件
    pub fn take_files(&mut self, name: &str) -> Vec<UploadedFile> {
        let (taken, rest) = std::mem::take(&mut self.files)
            .into_iter()
            .partition(|f| f.field == name);
        self.files = rest;
        taken
    }

    fn insert_text(&mut self, name: String, value: String) {
        self.fields.entry(name).or_insert(value);
    }

    async fn from_multipart(
        mut multipart: Multipart,
        uploads: &TempUploadDir,
    ) -> Result<Self, ApiError> {
        let mut form = FormData::default();

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            ApiError::BadRequest(format!("Failed to read multipart field: {}", e))
        })? {
            let name = field.name().unwrap_or_default().to_string();

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let file_name = Some(file_name).filter(|n| !n.is_empty());
                    let content_type = field.content_type().map(str::to_string);
                    let upload = spool_field(field, &name, file_name.as_deref(), uploads).await?;

                    form.files.push(UploadedFile {
                        field: name,
                        file_name,
                        content_type,
                        upload,
                    });
                }
                None => {
                    let value = field.text().await.map_err(|e| {
                        ApiError::BadRequest(format!("Failed to read {}: {}", name, e))
                    })?;
                    form.insert_text(name, value);
                }
            }
        }

        Ok(form)
    }
}

/// 把文件字段逐块写入临时文件
async fn spool_field(
    mut field: Field<'_>,
    name: &str,
    file_name: Option<&str>,
    uploads: &TempUploadDir,
) -> Result<TempUpload, ApiError> {
    let save_failed = |e: std::io::Error| {
        ApiError::Internal(format!("Failed to save uploaded file: {}", e))
    };

    let mut upload = uploads
        .create(file_name, default_extension(name))
        .await
        .map_err(save_failed)?;

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read file {}: {}", name, e)))?
    {
        upload.write_chunk(&chunk).await.map_err(save_failed)?;
    }
    upload.finish().await.map_err(save_failed)?;

    Ok(upload)
}

#[async_trait]
impl<S> FromRequest<S> for FormData
where
    TempUploadDir: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.starts_with("multipart/form-data"))
            .unwrap_or(false);

        if is_multipart {
            let uploads = TempUploadDir::from_ref(state);
            let multipart = Multipart::from_request(req, state).await?;
            return Self::from_multipart(multipart, &uploads).await;
        }

        let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;

        let mut form = FormData::default();
        for (name, value) in pairs {
            form.insert_text(name, value);
        }
        Ok(form)
    }
}

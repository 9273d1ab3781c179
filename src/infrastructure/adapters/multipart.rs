//! Multipart 文件段
//!
//! 从磁盘流式读取文件构造 multipart part，不把文件整个读入内存

use std::path::Path;

use reqwest::multipart::Part;
use reqwest::Body;
use tokio_util::io::ReaderStream;

use crate::application::CollaboratorError;

/// 以文件内容构造一个带长度的流式 part
pub(crate) async fn file_part(
    path: &Path,
    file_name: String,
    content_type: Option<&str>,
) -> Result<Part, CollaboratorError> {
    let file = tokio::fs::File::open(path).await?;
    let length = file.metadata().await?.len();

    let part = Part::stream_with_length(Body::wrap_stream(ReaderStream::new(file)), length)
        .file_name(file_name);

    match content_type {
        Some(mime) => part
            .mime_str(mime)
            .map_err(|e| CollaboratorError::Failed(format!("Invalid content type {}: {}", mime, e))),
        None => Ok(part),
    }
}

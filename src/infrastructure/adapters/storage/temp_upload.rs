//! Temp Upload - 上传文件的作用域临时文件
//!
//! `TempUpload` 持有一个 `NamedTempFile`，drop 时删除文件。
//! 上传内容按块写入，不在内存中保留整份数据

use std::io;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;

/// 上传临时目录
#[derive(Debug, Clone)]
pub struct TempUploadDir {
    dir: PathBuf,
}

impl TempUploadDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// 创建一个唯一命名的空临时文件
    ///
    /// 后缀取自上传文件名的扩展名，缺失或不规范时使用 `default_ext`
    pub async fn create(&self, file_name: Option<&str>, default_ext: &str) -> io::Result<TempUpload> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let suffix = format!(".{}", extension_for(file_name, default_ext));
        let file = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(&suffix)
            .tempfile_in(&self.dir)?;
        let writer = tokio::fs::File::from_std(file.as_file().try_clone()?);

        Ok(TempUpload {
            file,
            writer: Some(writer),
            size: 0,
        })
    }
}

/// 临时上传文件，drop 时删除
#[derive(Debug)]
pub struct TempUpload {
    file: NamedTempFile,
    writer: Option<tokio::fs::File>,
    size: u64,
}

impl TempUpload {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// 已写入的字节数
    pub fn size(&self) -> u64 {
        self.size
    }

    /// 追加一块数据
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "temp upload already finished"))?;
        writer.write_all(chunk).await?;
        self.size += chunk.len() as u64;
        Ok(())
    }

    /// 刷盘并关闭写句柄，之后文件内容完整可读
    pub async fn finish(&mut self) -> io::Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().await?;
        }

        tracing::debug!(
            path = %self.file.path().display(),
            size = self.size,
            "Spooled upload to temp file"
        );
        Ok(())
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        tracing::debug!(path = %self.file.path().display(), "Removing temp upload");
    }
}

fn extension_for<'a>(file_name: Option<&'a str>, default_ext: &'a str) -> &'a str {
    file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or(default_ext)
}

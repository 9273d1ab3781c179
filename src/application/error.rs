//! 协作方错误定义
//!
//! 所有端口共用的错误类型

use thiserror::Error;

/// 协作方错误
///
/// `Failed` 的显示文本就是协作方给出的描述，原样返回给客户端
#[derive(Debug, Error)]
pub enum CollaboratorError {
    /// 协作方执行失败
    #[error("{0}")]
    Failed(String),

    /// 无法连接协作方
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// 请求超时
    #[error("Request timeout")]
    Timeout,

    /// 响应无法解析
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// 本地 IO 错误（读取上传文件、写入音频等）
    #[error("IO error: {0}")]
    Io(String),
}

impl CollaboratorError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

impl From<reqwest::Error> for CollaboratorError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Unavailable(e.to_string())
        } else if e.is_decode() {
            Self::InvalidResponse(e.to_string())
        } else {
            Self::Failed(e.to_string())
        }
    }
}

impl From<std::io::Error> for CollaboratorError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

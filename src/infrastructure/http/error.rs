//! HTTP Error Handling
//!
//! 所有路由统一返回 `{"error": "..."}`，状态码区分失败类型

use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::application::CollaboratorError;
use crate::domain::DomainError;

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// API 错误
#[derive(Debug)]
pub enum ApiError {
    /// 缺少必填字段，协作方不会被调用
    MissingField(String),
    BadRequest(String),
    NotFound(String),
    /// 协作方失败，描述原样返回
    Collaborator(CollaboratorError),
    /// 协作方失败，只向客户端返回通用描述，细节仅写日志
    Masked {
        source: CollaboratorError,
        message: &'static str,
    },
    Internal(String),
}

impl ApiError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }

    pub fn masked(source: CollaboratorError, message: &'static str) -> Self {
        Self::Masked { source, message }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingField(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Collaborator(e) | ApiError::Masked { source: e, .. } => collaborator_status(e),
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::MissingField(field) => format!("Missing required field: {}", field),
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) | ApiError::Internal(msg) => {
                msg.clone()
            }
            ApiError::Collaborator(e) => e.to_string(),
            ApiError::Masked { message, .. } => message.to_string(),
        }
    }
}

fn collaborator_status(e: &CollaboratorError) -> StatusCode {
    match e {
        CollaboratorError::Failed(_) | CollaboratorError::InvalidResponse(_) => {
            StatusCode::BAD_GATEWAY
        }
        CollaboratorError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        CollaboratorError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        CollaboratorError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();

        match &self {
            ApiError::MissingField(_) | ApiError::BadRequest(_) => {
                tracing::warn!(status = status.as_u16(), error = %message, "Bad request");
            }
            ApiError::NotFound(_) => {
                tracing::warn!(status = status.as_u16(), error = %message, "Resource not found");
            }
            ApiError::Collaborator(e) => {
                tracing::error!(status = status.as_u16(), error = %e, "Collaborator failed");
            }
            ApiError::Masked { source, .. } => {
                tracing::error!(status = status.as_u16(), error = %source, "Collaborator failed");
            }
            ApiError::Internal(_) => {
                tracing::error!(status = status.as_u16(), error = %message, "Internal server error");
            }
        }

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

impl From<CollaboratorError> for ApiError {
    fn from(e: CollaboratorError) -> Self {
        ApiError::Collaborator(e)
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

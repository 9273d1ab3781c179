//! User Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::domain::UserContact;
use crate::infrastructure::http::dto::MessageResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::extract::FormData;
use crate::infrastructure::http::state::AppState;

/// 插入失败时返回给客户端的描述，具体原因只写日志
const INSERT_USER_FAILED: &str = "An error occurred while processing the request.";

/// 登记用户
pub async fn insert_user(
    State(state): State<Arc<AppState>>,
    form: FormData,
) -> Result<Json<MessageResponse<String>>, ApiError> {
    let contact = UserContact {
        first_name: form.text("first_name")?.to_string(),
        last_name: form.text("last_name")?.to_string(),
        username: form.text("username")?.to_string(),
        phone_number: form.text("phone_number")?.to_string(),
        email: form.text("email")?.to_string(),
    };

    tracing::info!(
        first_name = %contact.first_name,
        last_name = %contact.last_name,
        username = %contact.username,
        phone_number = %contact.phone_number,
        email = %contact.email,
        "Received user data"
    );

    let message = state
        .users
        .insert_user(contact)
        .await
        .map_err(|e| ApiError::masked(e, INSERT_USER_FAILED))?;

    Ok(Json(MessageResponse::text(message)))
}

use crate::api::AppState;
use crate::api::middleware::{AuthUser, JsonBody};
use crate::api::schemas::messaging::{MarkRead, MessageResponse, SendMessageRequest};
use crate::error::Result;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

pub async fn send_message(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    JsonBody(payload): JsonBody<SendMessageRequest>,
) -> Result<impl IntoResponse> {
    let message = state.message_service.send(actor.user_id, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(MessageResponse::from(message))))
}

pub async fn mark_read(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<MarkRead>,
) -> Result<impl IntoResponse> {
    let message = state.message_service.mark_read(actor.user_id, id, payload.is_read).await?;
    Ok(Json(MessageResponse::from(message)))
}

pub async fn delete_message(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.message_service.delete(actor.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

use crate::api::AppState;
use crate::api::middleware::JsonBody;
use crate::api::schemas::auth::{AuthSessionResponse, Login, Registration};
use crate::error::Result;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<Registration>,
) -> Result<impl IntoResponse> {
    let session = state.account_service.register(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(AuthSessionResponse::from(session))))
}

pub async fn login(State(state): State<AppState>, JsonBody(payload): JsonBody<Login>) -> Result<impl IntoResponse> {
    let session = state.auth_service.login(payload.email.trim(), payload.password).await?;
    Ok(Json(AuthSessionResponse::from(session)))
}

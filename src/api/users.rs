use crate::api::AppState;
use crate::api::middleware::{AuthUser, JsonBody};
use crate::api::schemas::users::{UpdateUser, UserResponse};
use crate::error::Result;
use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

pub async fn me(State(state): State<AppState>, AuthUser(actor): AuthUser) -> Result<impl IntoResponse> {
    let user = state.account_service.get(actor.user_id).await?;
    Ok(Json(UserResponse::from(user)))
}

pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(_actor): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let user = state.account_service.get(id).await?;
    Ok(Json(UserResponse::from(user)))
}

pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<UpdateUser>,
) -> Result<impl IntoResponse> {
    let (patch, role) = payload.split();
    let user = state.account_service.update(actor, id, patch, role).await?;
    Ok(Json(UserResponse::from(user)))
}

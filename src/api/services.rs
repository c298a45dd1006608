use crate::api::AppState;
use crate::api::middleware::{AuthUser, JsonBody};
use crate::api::schemas::Adjustment;
use crate::api::schemas::directory::{CreateService, ServiceQuery, ServiceResponse, UpdateService};
use crate::error::Result;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

pub async fn list_services(
    State(state): State<AppState>,
    Query(query): Query<ServiceQuery>,
) -> Result<impl IntoResponse> {
    let services = state.directory_service.list(query.into()).await?;
    Ok(Json(services.into_iter().map(ServiceResponse::from).collect::<Vec<_>>()))
}

pub async fn get_service(State(state): State<AppState>, Path(id): Path<i64>) -> Result<impl IntoResponse> {
    let service = state.directory_service.get(id).await?;
    Ok(Json(ServiceResponse::from(service)))
}

pub async fn create_service(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    JsonBody(payload): JsonBody<CreateService>,
) -> Result<impl IntoResponse> {
    let service = state.directory_service.create(actor, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(ServiceResponse::from(service))))
}

pub async fn update_service(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<UpdateService>,
) -> Result<impl IntoResponse> {
    let service = state.directory_service.update(actor, id, |d| payload.apply(d)).await?;
    Ok(Json(ServiceResponse::from(service)))
}

pub async fn delete_service(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.directory_service.delete(actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Atomically moves the occupancy counter by `delta`, bounded by `[0, totalCapacity]`.
pub async fn adjust_capacity(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<Adjustment>,
) -> Result<impl IntoResponse> {
    let service = state.directory_service.adjust_capacity(actor, id, payload.delta).await?;
    Ok(Json(ServiceResponse::from(service)))
}

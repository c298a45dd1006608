use crate::api::AppState;
use crate::api::middleware::{AuthUser, JsonBody};
use crate::api::schemas::directory::{CreateJob, JobQuery, JobResponse, UpdateJob};
use crate::error::Result;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

pub async fn list_jobs(State(state): State<AppState>, Query(query): Query<JobQuery>) -> Result<impl IntoResponse> {
    let jobs = state.job_service.list(query.into()).await?;
    Ok(Json(jobs.into_iter().map(JobResponse::from).collect::<Vec<_>>()))
}

pub async fn get_job(State(state): State<AppState>, Path(id): Path<i64>) -> Result<impl IntoResponse> {
    let job = state.job_service.get(id).await?;
    Ok(Json(JobResponse::from(job)))
}

pub async fn create_job(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    JsonBody(payload): JsonBody<CreateJob>,
) -> Result<impl IntoResponse> {
    let job = state.job_service.create(actor, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(JobResponse::from(job))))
}

pub async fn update_job(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<UpdateJob>,
) -> Result<impl IntoResponse> {
    let job = state.job_service.update(actor, id, |d| payload.apply(d)).await?;
    Ok(Json(JobResponse::from(job)))
}

pub async fn delete_job(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.job_service.delete(actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

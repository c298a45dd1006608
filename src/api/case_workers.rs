use crate::api::AppState;
use crate::api::middleware::{AuthUser, JsonBody};
use crate::api::schemas::Adjustment;
use crate::api::schemas::directory::{CaseWorkerQuery, CaseWorkerResponse, CreateCaseWorker, UpdateCaseWorker};
use crate::api::schemas::messaging::{MessageResponse, ThreadQuery};
use crate::error::Result;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

pub async fn list_case_workers(
    State(state): State<AppState>,
    Query(query): Query<CaseWorkerQuery>,
) -> Result<impl IntoResponse> {
    let workers = state.case_worker_service.list(query.available).await?;
    Ok(Json(workers.into_iter().map(CaseWorkerResponse::from).collect::<Vec<_>>()))
}

pub async fn get_case_worker(State(state): State<AppState>, Path(id): Path<i64>) -> Result<impl IntoResponse> {
    let worker = state.case_worker_service.get(id).await?;
    Ok(Json(CaseWorkerResponse::from(worker)))
}

pub async fn create_case_worker(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    JsonBody(payload): JsonBody<CreateCaseWorker>,
) -> Result<impl IntoResponse> {
    let worker = state.case_worker_service.create(actor, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(CaseWorkerResponse::from(worker))))
}

pub async fn update_case_worker(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<UpdateCaseWorker>,
) -> Result<impl IntoResponse> {
    let worker = state.case_worker_service.update(actor, id, |d| payload.apply(d)).await?;
    Ok(Json(CaseWorkerResponse::from(worker)))
}

pub async fn delete_case_worker(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.case_worker_service.delete(actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn adjust_caseload(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<Adjustment>,
) -> Result<impl IntoResponse> {
    let worker = state.case_worker_service.adjust_caseload(actor, id, payload.delta).await?;
    Ok(Json(CaseWorkerResponse::from(worker)))
}

/// The caller's message thread with a case worker, oldest first.
pub async fn case_worker_messages(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<i64>,
    Query(query): Query<ThreadQuery>,
) -> Result<impl IntoResponse> {
    let page = state.message_service.page(query.limit, query.before);
    let messages = state.message_service.case_worker_thread(actor.user_id, id, query.user_id, page).await?;
    Ok(Json(messages.into_iter().map(MessageResponse::from).collect::<Vec<_>>()))
}

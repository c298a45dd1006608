use crate::api::AppState;
use crate::api::middleware::{AuthUser, JsonBody};
use crate::api::schemas::documents::{CreateDocument, DocumentResponse, UpdateDocument};
use crate::error::Result;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

pub async fn list_documents(State(state): State<AppState>, AuthUser(actor): AuthUser) -> Result<impl IntoResponse> {
    let documents = state.document_service.list(actor).await?;
    Ok(Json(documents.into_iter().map(DocumentResponse::from).collect::<Vec<_>>()))
}

pub async fn get_document(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let document = state.document_service.get(actor, id).await?;
    Ok(Json(DocumentResponse::from(document)))
}

pub async fn create_document(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    JsonBody(payload): JsonBody<CreateDocument>,
) -> Result<impl IntoResponse> {
    let document = state.document_service.create(actor, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(DocumentResponse::from(document))))
}

pub async fn update_document(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<UpdateDocument>,
) -> Result<impl IntoResponse> {
    let document = state.document_service.update(actor, id, |d| payload.apply(d)).await?;
    Ok(Json(DocumentResponse::from(document)))
}

pub async fn delete_document(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.document_service.delete(actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

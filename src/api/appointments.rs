use crate::api::AppState;
use crate::api::middleware::{AuthUser, JsonBody};
use crate::api::schemas::appointments::{
    AppointmentQuery, AppointmentResponse, CreateAppointment, UpdateAppointment,
};
use crate::error::Result;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

pub async fn list_appointments(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Query(query): Query<AppointmentQuery>,
) -> Result<impl IntoResponse> {
    let appointments = state.appointment_service.list(actor, query.into()).await?;
    Ok(Json(appointments.into_iter().map(AppointmentResponse::from).collect::<Vec<_>>()))
}

pub async fn get_appointment(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let appointment = state.appointment_service.get(actor, id).await?;
    Ok(Json(AppointmentResponse::from(appointment)))
}

pub async fn create_appointment(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    JsonBody(payload): JsonBody<CreateAppointment>,
) -> Result<impl IntoResponse> {
    let appointment = state.appointment_service.create(actor, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(AppointmentResponse::from(appointment))))
}

pub async fn update_appointment(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<UpdateAppointment>,
) -> Result<impl IntoResponse> {
    let appointment = state.appointment_service.update(actor, id, |d| payload.apply(d)).await?;
    Ok(Json(AppointmentResponse::from(appointment)))
}

pub async fn delete_appointment(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.appointment_service.delete(actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

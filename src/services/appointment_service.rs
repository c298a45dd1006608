use crate::adapters::database::DbPool;
use crate::adapters::database::appointment_repo::AppointmentRepository;
use crate::adapters::database::case_worker_repo::CaseWorkerRepository;
use crate::domain::appointment::{
    Appointment, AppointmentDetails, AppointmentFilter, AppointmentStatus, DEFAULT_DURATION_MINUTES, default_location,
};
use crate::domain::auth::Actor;
use crate::error::{AppError, Result};
use opentelemetry::{KeyValue, global, metrics::Counter};
use time::OffsetDateTime;

#[derive(Clone, Debug)]
struct Metrics {
    booked_total: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("dignity-server");
        Self {
            booked_total: meter
                .u64_counter("appointments_booked_total")
                .with_description("Appointments created, labelled by whether the location was defaulted")
                .build(),
        }
    }
}

/// A booking request. Missing fields fall back to their defaults.
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub user_id: Option<i64>,
    pub case_worker_id: i64,
    pub scheduled_at: OffsetDateTime,
    pub duration_minutes: Option<i32>,
    pub location: Option<String>,
    pub purpose: Option<String>,
    pub notes: Option<String>,
}

#[derive(Clone, Debug)]
pub struct AppointmentService {
    pool: DbPool,
    repo: AppointmentRepository,
    case_workers: CaseWorkerRepository,
    metrics: Metrics,
}

impl AppointmentService {
    #[must_use]
    pub fn new(pool: DbPool, repo: AppointmentRepository, case_workers: CaseWorkerRepository) -> Self {
        Self { pool, repo, case_workers, metrics: Metrics::new() }
    }

    /// Books an appointment. A blank location defaults to the case worker's office.
    ///
    /// Staff may book on behalf of another user; everyone else books for themselves.
    ///
    /// # Errors
    /// Returns `AppError::NotFound` if the case worker or user does not exist and
    /// `AppError::BadRequest` for invalid details.
    #[tracing::instrument(err(level = "warn"), skip(self, request), fields(case_worker_id = request.case_worker_id))]
    pub async fn create(&self, actor: Actor, request: NewAppointment) -> Result<Appointment> {
        let user_id = match request.user_id {
            Some(user_id) if user_id != actor.user_id && !actor.is_staff() => return Err(AppError::Forbidden),
            Some(user_id) => user_id,
            None => actor.user_id,
        };

        let mut conn = self.pool.acquire().await?;
        let office = self
            .case_workers
            .find_office_location(&mut conn, request.case_worker_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let defaulted = request.location.as_deref().is_none_or(|l| l.trim().is_empty());
        let details = AppointmentDetails {
            scheduled_at: request.scheduled_at,
            duration_minutes: request.duration_minutes.unwrap_or(DEFAULT_DURATION_MINUTES),
            location: default_location(request.location.as_deref(), office.as_deref()),
            purpose: request.purpose,
            notes: request.notes,
            status: AppointmentStatus::default(),
        };
        details.validate()?;

        let appointment = self.repo.create(&mut conn, user_id, request.case_worker_id, &details).await?;
        self.metrics.booked_total.add(1, &[KeyValue::new("location_defaulted", defaulted)]);
        tracing::info!(appointment_id = appointment.id, "Appointment booked");
        Ok(appointment)
    }

    /// # Errors
    /// Returns `AppError::NotFound` for an unknown appointment and `AppError::Forbidden` if it is not visible to the caller.
    #[tracing::instrument(err(level = "debug"), skip(self))]
    pub async fn get(&self, actor: Actor, id: i64) -> Result<Appointment> {
        let mut conn = self.pool.acquire().await?;
        let appointment = self.repo.find_by_id(&mut conn, id).await?.ok_or(AppError::NotFound)?;
        Self::authorize(actor, &appointment)?;
        Ok(appointment)
    }

    /// Lists the caller's appointments. Staff filtering by case worker see that worker's whole schedule.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the query fails.
    #[tracing::instrument(err, skip(self))]
    pub async fn list(&self, actor: Actor, mut filter: AppointmentFilter) -> Result<Vec<Appointment>> {
        if !(actor.is_staff() && filter.case_worker_id.is_some()) {
            filter.user_id = Some(actor.user_id);
        }
        let mut conn = self.pool.acquire().await?;
        self.repo.list(&mut conn, filter).await
    }

    /// Any status may move to any other; there is no transition table.
    ///
    /// # Errors
    /// Returns `AppError::NotFound`, `AppError::Forbidden` or `AppError::BadRequest` as for the other operations.
    #[tracing::instrument(err(level = "warn"), skip(self, patch))]
    pub async fn update<F>(&self, actor: Actor, id: i64, patch: F) -> Result<Appointment>
    where
        F: FnOnce(&mut AppointmentDetails) + Send,
    {
        let mut tx = self.pool.begin().await?;
        let appointment = self.repo.find_by_id(&mut tx, id).await?.ok_or(AppError::NotFound)?;
        Self::authorize(actor, &appointment)?;

        let mut details = appointment.details;
        patch(&mut details);
        details.validate()?;

        let appointment = self.repo.update(&mut tx, id, &details).await?.ok_or(AppError::NotFound)?;
        tx.commit().await?;
        Ok(appointment)
    }

    /// # Errors
    /// Returns `AppError::NotFound` for an unknown appointment and `AppError::Forbidden` if it is not the caller's.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn delete(&self, actor: Actor, id: i64) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        let appointment = self.repo.find_by_id(&mut conn, id).await?.ok_or(AppError::NotFound)?;
        Self::authorize(actor, &appointment)?;
        if self.repo.delete(&mut conn, id).await? { Ok(()) } else { Err(AppError::NotFound) }
    }

    fn authorize(actor: Actor, appointment: &Appointment) -> Result<()> {
        if actor.can_act_for(appointment.user_id) || actor.is_staff() { Ok(()) } else { Err(AppError::Forbidden) }
    }
}

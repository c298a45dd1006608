//! Request and response bodies for the shared directory: services, jobs and case workers.

use crate::api::schemas::double_option;
use crate::domain::case_worker::{CaseWorker, CaseWorkerDetails, DEFAULT_MAX_CASELOAD};
use crate::domain::hours::WeeklyHours;
use crate::domain::job::{Job, JobDetails, JobFilter, JobType};
use crate::domain::requirements::Requirements;
use crate::domain::service::{Service, ServiceCategory, ServiceDetails, ServiceFilter};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

const fn default_true() -> bool {
    true
}

// Services

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResponse {
    pub id: i64,
    pub name: String,
    pub category: ServiceCategory,
    pub description: Option<String>,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub total_capacity: Option<i32>,
    pub current_capacity: i32,
    pub has_vacancy: bool,
    pub amenities: Vec<String>,
    pub operating_hours: WeeklyHours,
    pub requirements: Requirements,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Service> for ServiceResponse {
    fn from(service: Service) -> Self {
        let has_vacancy = service.details.has_vacancy();
        let d = service.details;
        Self {
            id: service.id,
            name: d.name,
            category: d.category,
            description: d.description,
            address: d.address,
            latitude: d.latitude,
            longitude: d.longitude,
            phone: d.phone,
            email: d.email,
            website: d.website,
            total_capacity: d.total_capacity,
            current_capacity: d.current_capacity,
            has_vacancy,
            amenities: d.amenities,
            operating_hours: d.operating_hours,
            requirements: d.requirements,
            is_active: d.is_active,
            created_at: service.created_at,
            updated_at: service.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateService {
    pub name: String,
    pub category: ServiceCategory,
    pub description: Option<String>,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub total_capacity: Option<i32>,
    #[serde(default)]
    pub current_capacity: i32,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub operating_hours: WeeklyHours,
    #[serde(default)]
    pub requirements: Requirements,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl From<CreateService> for ServiceDetails {
    fn from(r: CreateService) -> Self {
        Self {
            name: r.name,
            category: r.category,
            description: r.description,
            address: r.address,
            latitude: r.latitude,
            longitude: r.longitude,
            phone: r.phone,
            email: r.email,
            website: r.website,
            total_capacity: r.total_capacity,
            current_capacity: r.current_capacity,
            amenities: r.amenities,
            operating_hours: r.operating_hours,
            requirements: r.requirements,
            is_active: r.is_active,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateService {
    pub name: Option<String>,
    pub category: Option<ServiceCategory>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub address: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub latitude: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub longitude: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub website: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub total_capacity: Option<Option<i32>>,
    pub current_capacity: Option<i32>,
    pub amenities: Option<Vec<String>>,
    pub operating_hours: Option<WeeklyHours>,
    pub requirements: Option<Requirements>,
    pub is_active: Option<bool>,
}

impl UpdateService {
    pub fn apply(self, d: &mut ServiceDetails) {
        if let Some(v) = self.name {
            d.name = v;
        }
        if let Some(v) = self.category {
            d.category = v;
        }
        if let Some(v) = self.description {
            d.description = v;
        }
        if let Some(v) = self.address {
            d.address = v;
        }
        if let Some(v) = self.latitude {
            d.latitude = v;
        }
        if let Some(v) = self.longitude {
            d.longitude = v;
        }
        if let Some(v) = self.phone {
            d.phone = v;
        }
        if let Some(v) = self.email {
            d.email = v;
        }
        if let Some(v) = self.website {
            d.website = v;
        }
        if let Some(v) = self.total_capacity {
            d.total_capacity = v;
        }
        if let Some(v) = self.current_capacity {
            d.current_capacity = v;
        }
        if let Some(v) = self.amenities {
            d.amenities = v;
        }
        if let Some(v) = self.operating_hours {
            d.operating_hours = v;
        }
        if let Some(v) = self.requirements {
            d.requirements = v;
        }
        if let Some(v) = self.is_active {
            d.is_active = v;
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceQuery {
    pub category: Option<ServiceCategory>,
    pub active: Option<bool>,
}

impl From<ServiceQuery> for ServiceFilter {
    fn from(q: ServiceQuery) -> Self {
        Self { category: q.category, active: q.active }
    }
}

// Jobs

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    pub id: i64,
    pub title: String,
    pub employer: String,
    pub description: Option<String>,
    pub location: String,
    pub job_type: JobType,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub requirements: Requirements,
    pub contact_email: Option<String>,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339::option")]
    pub expires_at: Option<OffsetDateTime>,
    pub posted_by_id: Option<i64>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Job> for JobResponse {
    fn from(job: Job) -> Self {
        let d = job.details;
        Self {
            id: job.id,
            title: d.title,
            employer: d.employer,
            description: d.description,
            location: d.location,
            job_type: d.job_type,
            salary_min: d.salary_min,
            salary_max: d.salary_max,
            requirements: d.requirements,
            contact_email: d.contact_email,
            is_active: d.is_active,
            expires_at: d.expires_at,
            posted_by_id: job.posted_by_id,
            created_at: job.created_at,
            updated_at: job.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateJob {
    pub title: String,
    pub employer: String,
    pub description: Option<String>,
    pub location: String,
    pub job_type: JobType,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    #[serde(default)]
    pub requirements: Requirements,
    pub contact_email: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub expires_at: Option<OffsetDateTime>,
}

impl From<CreateJob> for JobDetails {
    fn from(r: CreateJob) -> Self {
        Self {
            title: r.title,
            employer: r.employer,
            description: r.description,
            location: r.location,
            job_type: r.job_type,
            salary_min: r.salary_min,
            salary_max: r.salary_max,
            requirements: r.requirements,
            contact_email: r.contact_email,
            is_active: r.is_active,
            expires_at: r.expires_at,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateJob {
    pub title: Option<String>,
    pub employer: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    #[serde(default, deserialize_with = "double_option")]
    pub salary_min: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub salary_max: Option<Option<i32>>,
    pub requirements: Option<Requirements>,
    #[serde(default, deserialize_with = "double_option")]
    pub contact_email: Option<Option<String>>,
    pub is_active: Option<bool>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub expires_at: Option<OffsetDateTime>,
}

impl UpdateJob {
    pub fn apply(self, d: &mut JobDetails) {
        if let Some(v) = self.title {
            d.title = v;
        }
        if let Some(v) = self.employer {
            d.employer = v;
        }
        if let Some(v) = self.description {
            d.description = v;
        }
        if let Some(v) = self.location {
            d.location = v;
        }
        if let Some(v) = self.job_type {
            d.job_type = v;
        }
        if let Some(v) = self.salary_min {
            d.salary_min = v;
        }
        if let Some(v) = self.salary_max {
            d.salary_max = v;
        }
        if let Some(v) = self.requirements {
            d.requirements = v;
        }
        if let Some(v) = self.contact_email {
            d.contact_email = v;
        }
        if let Some(v) = self.is_active {
            d.is_active = v;
        }
        if self.expires_at.is_some() {
            d.expires_at = self.expires_at;
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobQuery {
    pub job_type: Option<JobType>,
    pub active: Option<bool>,
}

impl From<JobQuery> for JobFilter {
    fn from(q: JobQuery) -> Self {
        Self { job_type: q.job_type, active: q.active }
    }
}

// Case workers

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseWorkerResponse {
    pub id: i64,
    pub user_id: Option<i64>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub organization: Option<String>,
    pub specializations: Vec<String>,
    pub languages: Vec<String>,
    pub office_location: Option<String>,
    pub max_caseload: i32,
    pub current_caseload: i32,
    pub is_available: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<CaseWorker> for CaseWorkerResponse {
    fn from(cw: CaseWorker) -> Self {
        let d = cw.details;
        Self {
            id: cw.id,
            user_id: d.user_id,
            name: d.name,
            email: d.email,
            phone: d.phone,
            organization: d.organization,
            specializations: d.specializations,
            languages: d.languages,
            office_location: d.office_location,
            max_caseload: d.max_caseload,
            current_caseload: d.current_caseload,
            is_available: d.is_available,
            created_at: cw.created_at,
            updated_at: cw.updated_at,
        }
    }
}

const fn default_max_caseload() -> i32 {
    DEFAULT_MAX_CASELOAD
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateCaseWorker {
    pub user_id: Option<i64>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub organization: Option<String>,
    #[serde(default)]
    pub specializations: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    pub office_location: Option<String>,
    #[serde(default = "default_max_caseload")]
    pub max_caseload: i32,
    #[serde(default)]
    pub current_caseload: i32,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

impl From<CreateCaseWorker> for CaseWorkerDetails {
    fn from(r: CreateCaseWorker) -> Self {
        Self {
            user_id: r.user_id,
            name: r.name,
            email: r.email,
            phone: r.phone,
            organization: r.organization,
            specializations: r.specializations,
            languages: r.languages,
            office_location: r.office_location,
            max_caseload: r.max_caseload,
            current_caseload: r.current_caseload,
            is_available: r.is_available,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateCaseWorker {
    #[serde(default, deserialize_with = "double_option")]
    pub user_id: Option<Option<i64>>,
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub organization: Option<Option<String>>,
    pub specializations: Option<Vec<String>>,
    pub languages: Option<Vec<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub office_location: Option<Option<String>>,
    pub max_caseload: Option<i32>,
    pub current_caseload: Option<i32>,
    pub is_available: Option<bool>,
}

impl UpdateCaseWorker {
    pub fn apply(self, d: &mut CaseWorkerDetails) {
        if let Some(v) = self.user_id {
            d.user_id = v;
        }
        if let Some(v) = self.name {
            d.name = v;
        }
        if let Some(v) = self.email {
            d.email = v;
        }
        if let Some(v) = self.phone {
            d.phone = v;
        }
        if let Some(v) = self.organization {
            d.organization = v;
        }
        if let Some(v) = self.specializations {
            d.specializations = v;
        }
        if let Some(v) = self.languages {
            d.languages = v;
        }
        if let Some(v) = self.office_location {
            d.office_location = v;
        }
        if let Some(v) = self.max_caseload {
            d.max_caseload = v;
        }
        if let Some(v) = self.current_caseload {
            d.current_caseload = v;
        }
        if let Some(v) = self.is_available {
            d.is_available = v;
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseWorkerQuery {
    pub available: Option<bool>,
}

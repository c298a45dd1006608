use crate::domain::case_worker::{CaseWorker, CaseWorkerDetails};
use time::OffsetDateTime;

#[derive(Debug, sqlx::FromRow)]
pub struct CaseWorkerRecord {
    pub(crate) id: i64,
    pub(crate) user_id: Option<i64>,
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) phone: Option<String>,
    pub(crate) organization: Option<String>,
    pub(crate) specializations: Vec<String>,
    pub(crate) languages: Vec<String>,
    pub(crate) office_location: Option<String>,
    pub(crate) max_caseload: i32,
    pub(crate) current_caseload: i32,
    pub(crate) is_available: bool,
    pub(crate) created_at: OffsetDateTime,
    pub(crate) updated_at: OffsetDateTime,
}

impl From<CaseWorkerRecord> for CaseWorker {
    fn from(record: CaseWorkerRecord) -> Self {
        Self {
            id: record.id,
            details: CaseWorkerDetails {
                user_id: record.user_id,
                name: record.name,
                email: record.email,
                phone: record.phone,
                organization: record.organization,
                specializations: record.specializations,
                languages: record.languages,
                office_location: record.office_location,
                max_caseload: record.max_caseload,
                current_caseload: record.current_caseload,
                is_available: record.is_available,
            },
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

use crate::domain::hours::WeeklyHours;
use crate::domain::requirements::Requirements;
use crate::domain::service::{Service, ServiceCategory, ServiceDetails};
use sqlx::types::Json;
use time::OffsetDateTime;

#[derive(Debug, sqlx::FromRow)]
pub struct ServiceRecord {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) category: ServiceCategory,
    pub(crate) description: Option<String>,
    pub(crate) address: String,
    pub(crate) latitude: Option<f64>,
    pub(crate) longitude: Option<f64>,
    pub(crate) phone: Option<String>,
    pub(crate) email: Option<String>,
    pub(crate) website: Option<String>,
    pub(crate) total_capacity: Option<i32>,
    pub(crate) current_capacity: i32,
    pub(crate) amenities: Vec<String>,
    pub(crate) operating_hours: Json<WeeklyHours>,
    pub(crate) requirements: Json<Requirements>,
    pub(crate) is_active: bool,
    pub(crate) created_at: OffsetDateTime,
    pub(crate) updated_at: OffsetDateTime,
}

impl From<ServiceRecord> for Service {
    fn from(record: ServiceRecord) -> Self {
        Self {
            id: record.id,
            details: ServiceDetails {
                name: record.name,
                category: record.category,
                description: record.description,
                address: record.address,
                latitude: record.latitude,
                longitude: record.longitude,
                phone: record.phone,
                email: record.email,
                website: record.website,
                total_capacity: record.total_capacity,
                current_capacity: record.current_capacity,
                amenities: record.amenities,
                operating_hours: record.operating_hours.0,
                requirements: record.requirements.0,
                is_active: record.is_active,
            },
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

use crate::domain::user::{Role, User, UserProfile};
use time::OffsetDateTime;

#[derive(Debug, sqlx::FromRow)]
pub struct UserRecord {
    pub(crate) id: i64,
    pub(crate) email: String,
    pub(crate) password_hash: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) phone: Option<String>,
    pub(crate) role: Role,
    pub(crate) preferred_language: String,
    pub(crate) created_at: OffsetDateTime,
    pub(crate) updated_at: OffsetDateTime,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            email: record.email,
            password_hash: record.password_hash,
            profile: UserProfile {
                first_name: record.first_name,
                last_name: record.last_name,
                phone: record.phone,
                preferred_language: record.preferred_language,
            },
            role: record.role,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

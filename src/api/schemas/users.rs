use crate::api::schemas::double_option;
use crate::domain::user::{Role, User, UserProfile};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
    pub phone: Option<String>,
    pub role: Role,
    pub preferred_language: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let display_name = user.display_name();
        Self {
            id: user.id,
            email: user.email,
            first_name: user.profile.first_name,
            last_name: user.profile.last_name,
            display_name,
            phone: user.profile.phone,
            role: user.role,
            preferred_language: user.profile.preferred_language,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub phone: Option<Option<String>>,
    pub preferred_language: Option<String>,
    pub role: Option<Role>,
}

impl UpdateUser {
    /// Splits the body into the profile patch and the admin-only role change.
    #[must_use]
    pub fn split(self) -> (impl FnOnce(&mut UserProfile) + Send, Option<Role>) {
        let Self { first_name, last_name, phone, preferred_language, role } = self;
        let patch = move |profile: &mut UserProfile| {
            if let Some(v) = first_name {
                profile.first_name = v;
            }
            if let Some(v) = last_name {
                profile.last_name = v;
            }
            if let Some(v) = phone {
                profile.phone = v;
            }
            if let Some(v) = preferred_language {
                profile.preferred_language = v;
            }
        };
        (patch, role)
    }
}

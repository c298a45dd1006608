use crate::api::schemas::users::UserResponse;
use crate::domain::auth::AuthSession;
use crate::domain::user::{NewUser, UserProfile};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub preferred_language: Option<String>,
}

impl From<Registration> for NewUser {
    fn from(r: Registration) -> Self {
        Self {
            email: r.email,
            password: r.password,
            profile: UserProfile {
                first_name: r.first_name,
                last_name: r.last_name,
                phone: r.phone,
                preferred_language: r.preferred_language.unwrap_or_else(|| "en".to_string()),
            },
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Login {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSessionResponse {
    pub token: String,
    pub expires_at: u64,
    pub user: UserResponse,
}

impl From<AuthSession> for AuthSessionResponse {
    fn from(session: AuthSession) -> Self {
        Self { token: session.token, expires_at: session.expires_at, user: session.user.into() }
    }
}

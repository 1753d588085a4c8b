use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::claims::Role;
use super::repo_types::User;
use super::services::is_valid_email;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Email and password as posted to `/auth/register` and `/auth/login`.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Lowercased, trimmed email, or `None` when it does not look like one.
    pub fn normalized_email(&self) -> Option<String> {
        let email = self.email.trim().to_lowercase();
        is_valid_email(&email).then_some(email)
    }

    pub fn password_long_enough(&self) -> bool {
        self.password.chars().count() >= MIN_PASSWORD_LEN
    }
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Token pair plus the caller's profile.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    /// Access-token lifetime in seconds.
    pub expires_in: u64,
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        PublicUser {
            id: user.id,
            email: user.email.clone(),
            role: Role::from_admin_flag(user.is_admin),
        }
    }
}

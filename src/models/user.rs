use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A row of the credential store.
#[derive(Debug, Clone)]
pub struct Credential {
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Who a successful credential check resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub role: Option<String>,
}

impl From<Credential> for Identity {
    fn from(credential: Credential) -> Self {
        let role = Some(credential.role).filter(|r| !r.is_empty());
        Identity {
            username: credential.username,
            role,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
pub struct Claims {
    pub sub: String, // Subject (username)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub exp: i64, // Expiration time
    pub iat: i64, // Issued at
}

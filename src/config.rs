use std::env;
use thiserror::Error;

pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;
pub const MAX_TOKEN_TTL_HOURS: i64 = 24;
/// Secrets shorter than this still work but are logged as weak at startup.
pub const RECOMMENDED_SECRET_LEN: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: Vec<u8>,
    pub ttl_hours: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("ttl_hours", &self.ttl_hours)
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct AdminSeed {
    pub username: String,
    pub password: String,
    pub role: String,
}

impl std::fmt::Debug for AdminSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSeed")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub db_path: String,
    pub jwt: JwtConfig,
    pub admin: Option<AdminSeed>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source. Blank values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = get("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = match get("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                key: "PORT",
                reason: e.to_string(),
            })?,
            None => 8080,
        };
        let db_path = get("DB_PATH").unwrap_or_else(|| "./data/erm.redb".to_string());

        let secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let ttl_hours = match get("JWT_TTL_HOURS") {
            Some(raw) => {
                let hours = raw.trim().parse::<i64>().map_err(|e| ConfigError::Invalid {
                    key: "JWT_TTL_HOURS",
                    reason: e.to_string(),
                })?;
                if !(1..=MAX_TOKEN_TTL_HOURS).contains(&hours) {
                    return Err(ConfigError::Invalid {
                        key: "JWT_TTL_HOURS",
                        reason: format!("must be between 1 and {MAX_TOKEN_TTL_HOURS}, got {hours}"),
                    });
                }
                hours
            }
            None => DEFAULT_TOKEN_TTL_HOURS,
        };

        let admin = get("ADMIN_PASSWORD").map(|password| AdminSeed {
            username: get("ADMIN_USERNAME").unwrap_or_else(|| "admin".to_string()),
            password,
            role: "admin".to_string(),
        });

        Ok(AppConfig {
            host,
            port,
            db_path,
            jwt: JwtConfig {
                secret: secret.into_bytes(),
                ttl_hours,
            },
            admin,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

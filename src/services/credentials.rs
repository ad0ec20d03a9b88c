use crate::db::user_repository::UserRepository;
use crate::error::AppError;
use crate::models::user::Identity;
use crate::utils::password::{verify_against_decoy, verify_password};
use async_trait::async_trait;
use tracing::debug;

/// Resolves a username/password pair to an identity. `Ok(None)` means the
/// pair does not match; it never says which half was wrong.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    async fn verify(&self, username: &str, password: &str) -> Result<Option<Identity>, AppError>;
}

#[async_trait]
impl CredentialVerifier for UserRepository {
    async fn verify(&self, username: &str, password: &str) -> Result<Option<Identity>, AppError> {
        let repo = self.clone();
        let username = username.to_owned();
        let password = password.to_owned();

        // redb reads and argon2 are both blocking
        tokio::task::spawn_blocking(move || -> Result<Option<Identity>, AppError> {
            let Some(credential) = repo.get_by_username(&username)? else {
                debug!(username = %username, "No such user");
                verify_against_decoy(&password);
                return Ok(None);
            };

            if !verify_password(&password, &credential.password_hash) {
                debug!(username = %username, "Password mismatch");
                return Ok(None);
            }

            Ok(Some(Identity::from(credential)))
        })
        .await
        .map_err(|e| AppError::Internal(format!("credential check did not complete: {e}")))?
    }
}

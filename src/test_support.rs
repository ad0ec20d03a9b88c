use crate::db::migrations::run_migrations;
use crate::db::user_repository::UserRepository;
use crate::db::{Database, StoreError};
use crate::error::AppError;
use crate::models::user::{Credential, Identity};
use crate::services::credentials::CredentialVerifier;
use crate::utils::jwt::TokenService;
use crate::utils::password::hash_password;
use actix_web::dev::{ServiceFactory, ServiceRequest};
use actix_web::{web, App, Error};
use async_trait::async_trait;
use chrono::Duration;
use std::sync::Arc;

pub const ALICE_PASSWORD: &str = "correct-horse-battery-staple";

/// App data for route tests: an in-memory store holding `alice` (role
/// `user`) and a token service with a 24 hour lifetime.
pub struct TestState {
    pub db: Database,
    pub verifier: Arc<dyn CredentialVerifier>,
    pub tokens: TokenService,
}

impl TestState {
    pub fn new() -> Self {
        let db = Database::in_memory().unwrap();
        run_migrations(&db).unwrap();
        let repo = UserRepository::new(db.clone());
        repo.create(&Credential {
            username: "alice".to_string(),
            password_hash: hash_password(ALICE_PASSWORD).unwrap(),
            role: "user".to_string(),
            created_at: chrono::Utc::now(),
        })
        .unwrap();

        TestState {
            db,
            verifier: Arc::new(repo),
            tokens: TokenService::new(b"route-test-secret-0123456789abcdef", Duration::hours(24)),
        }
    }

    pub fn with_failing_store() -> Self {
        TestState {
            verifier: Arc::new(FailingVerifier),
            ..Self::new()
        }
    }

    pub fn configure<T>(&self, app: App<T>) -> App<T>
    where
        T: ServiceFactory<ServiceRequest, Config = (), Error = Error, InitError = ()>,
    {
        app.app_data(web::Data::from(self.verifier.clone()))
            .app_data(web::Data::new(self.tokens.clone()))
            .app_data(web::Data::new(self.db.clone()))
    }
}

struct FailingVerifier;

#[async_trait]
impl CredentialVerifier for FailingVerifier {
    async fn verify(&self, username: &str, _password: &str) -> Result<Option<Identity>, AppError> {
        Err(AppError::Store(StoreError::Io(std::io::Error::other(format!(
            "store offline while looking up {username}"
        )))))
    }
}

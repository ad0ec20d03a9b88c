use crate::error::{AppError, ErrorResponse};
use crate::services::credentials::CredentialVerifier;
use crate::utils::jwt::TokenService;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

/// Exchange a username and password for a bearer token
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Malformed or incomplete body", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Credential store failure", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn login(
    verifier: web::Data<dyn CredentialVerifier>,
    tokens: web::Data<TokenService>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let LoginRequest { username, password } = payload.into_inner();

    if username.is_empty() || password.is_empty() {
        warn!("Login rejected: empty username or password");
        return Err(AppError::BadRequest(
            "username and password are required".to_string(),
        ));
    }

    info!(username = %username, "Login attempt");

    let Some(identity) = verifier.verify(&username, &password).await? else {
        warn!(username = %username, "Login failed: invalid credentials");
        return Err(AppError::InvalidCredentials);
    };

    let token = tokens
        .issue(&identity.username, identity.role.as_deref())
        .map_err(|e| {
            error!(error = %e, username = %identity.username, "Failed to generate JWT");
            AppError::Internal(e.to_string())
        })?;

    info!(username = %identity.username, role = ?identity.role, "User logged in successfully");

    Ok(HttpResponse::Ok().json(LoginResponse { token }))
}

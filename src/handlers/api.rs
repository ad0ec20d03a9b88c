use crate::db::Database;
use crate::models::user::Claims;
use actix_web::{web, HttpResponse, Responder};
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub checks: HealthChecks,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthChecks {
    pub database: bool,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ProtectedResponse {
    pub message: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub username: String,
    pub role: Option<String>,
    pub expires_at: String,
}

/// Public health check endpoint with dependency checks
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Database is unreachable", body = HealthResponse)
    ),
    tag = "Health"
)]
pub async fn health(db: web::Data<Database>) -> impl Responder {
    let database = match db.ping() {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Health check: database unavailable");
            false
        }
    };

    let response = HealthResponse {
        status: if database { "healthy" } else { "degraded" }.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks { database },
    };

    if database {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

/// Placeholder resource behind the bearer token
#[utoipa::path(
    get,
    path = "/v1/protected",
    responses(
        (status = 200, description = "Token accepted", body = ProtectedResponse),
        (status = 401, description = "Missing, invalid or expired token", body = crate::error::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Protected"
)]
pub async fn protected(claims: web::ReqData<Claims>) -> impl Responder {
    info!(username = %claims.sub, "Protected route accessed");

    HttpResponse::Ok().json(ProtectedResponse {
        message: "You have accessed a protected route!".to_string(),
    })
}

/// The caller's identity as carried by their token
#[utoipa::path(
    get,
    path = "/v1/profile",
    responses(
        (status = 200, description = "Decoded token claims", body = ProfileResponse),
        (status = 401, description = "Missing, invalid or expired token", body = crate::error::ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Protected"
)]
pub async fn profile(claims: web::ReqData<Claims>) -> impl Responder {
    let claims = claims.into_inner();
    let expires_at = DateTime::from_timestamp(claims.exp, 0)
        .map(|t| t.to_rfc3339())
        .unwrap_or_default();

    HttpResponse::Ok().json(ProfileResponse {
        username: claims.sub,
        role: claims.role,
        expires_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes;
    use crate::test_support::TestState;
    use actix_web::{http::header, http::StatusCode, test, App};
    use chrono::{Duration, Utc};

    #[actix_web::test]
    async fn test_health_reports_database() {
        let state = TestState::new();
        let app = test::init_service(state.configure(App::new()).configure(routes::configure)).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: HealthResponse = test::read_body_json(resp).await;
        assert_eq!(body.status, "healthy");
        assert!(body.checks.database);
    }

    #[actix_web::test]
    async fn test_protected_without_header_is_unauthorized() {
        let state = TestState::new();
        let app = test::init_service(state.configure(App::new()).configure(routes::configure)).await;

        let req = test::TestRequest::get().uri("/v1/protected").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Authorization token required");
    }

    #[actix_web::test]
    async fn test_protected_with_valid_token() {
        let state = TestState::new();
        let token = state.tokens.issue("alice", Some("user")).unwrap();
        let app = test::init_service(state.configure(App::new()).configure(routes::configure)).await;

        let req = test::TestRequest::get()
            .uri("/v1/protected")
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: ProtectedResponse = test::read_body_json(resp).await;
        assert_eq!(body.message, "You have accessed a protected route!");
    }

    #[actix_web::test]
    async fn test_protected_with_expired_token() {
        let state = TestState::new();
        let issued = Utc::now() - state.tokens.ttl() - Duration::minutes(1);
        let token = state.tokens.issue_at("alice", None, issued).unwrap();
        let app = test::init_service(state.configure(App::new()).configure(routes::configure)).await;

        let req = test::TestRequest::get()
            .uri("/v1/protected")
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid or expired token");
    }

    #[actix_web::test]
    async fn test_profile_echoes_claims() {
        let state = TestState::new();
        let now = Utc::now();
        let token = state.tokens.issue_at("alice", Some("admin"), now).unwrap();
        let app = test::init_service(state.configure(App::new()).configure(routes::configure)).await;

        let req = test::TestRequest::get()
            .uri("/v1/profile")
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: ProfileResponse = test::read_body_json(resp).await;
        assert_eq!(body.username, "alice");
        assert_eq!(body.role.as_deref(), Some("admin"));

        let expires_at = DateTime::parse_from_rfc3339(&body.expires_at).unwrap();
        assert_eq!(expires_at.timestamp(), (now + state.tokens.ttl()).timestamp());
    }

    #[actix_web::test]
    async fn test_login_then_access_protected_route() {
        let state = TestState::new();
        let app = test::init_service(state.configure(App::new()).configure(routes::configure)).await;

        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(serde_json::json!({
                "username": "alice",
                "password": crate::test_support::ALICE_PASSWORD,
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: crate::handlers::auth::LoginResponse = test::read_body_json(resp).await;

        let req = test::TestRequest::get()
            .uri("/v1/protected")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", body.token)))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
    }
}

use crate::error::AppError;
use crate::handlers;
use crate::middleware::auth::AuthMiddleware;
use actix_web::web;

/// Registers every route. Shared state (`TokenService`, `Database` and the
/// `CredentialVerifier`) is expected as app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        // Public routes
        .route("/health", web::get().to(handlers::api::health))
        .route("/login", web::post().to(handlers::auth::login))
        // Protected routes
        .service(
            web::scope("/v1")
                .wrap(AuthMiddleware)
                .route("/protected", web::get().to(handlers::api::protected))
                .route("/profile", web::get().to(handlers::api::profile)),
        );
}

/// Body parse failures answer 400 with the same `{"error"}` shape as every
/// other failure.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(16 * 1024)
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

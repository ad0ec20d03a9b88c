mod config;
mod db;
mod error;
mod handlers;
mod middleware;
mod models;
mod routes;
mod services;
#[cfg(test)]
mod test_support;
mod utils;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use config::{AppConfig, RECOMMENDED_SECRET_LEN};
use db::migrations::{run_migrations, seed_admin};
use db::user_repository::UserRepository;
use db::Database;
use dotenv::dotenv;
use services::credentials::CredentialVerifier;
use std::env;
use std::io;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_actix_web::TracingLogger;
use utils::jwt::TokenService;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::api::health,
        handlers::api::protected,
        handlers::api::profile,
        handlers::auth::login,
    ),
    components(
        schemas(
            handlers::api::HealthResponse,
            handlers::api::HealthChecks,
            handlers::api::ProtectedResponse,
            handlers::api::ProfileResponse,
            handlers::auth::LoginRequest,
            handlers::auth::LoginResponse,
            error::ErrorResponse,
            models::user::Claims,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Authentication", description = "Token issuance"),
        (name = "Protected", description = "Endpoints requiring a bearer token")
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token returned by POST /login"))
                        .build(),
                ),
            );
        }
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize tracing subscriber for structured logging
    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .json()
        .init();

    let config = AppConfig::from_env().map_err(|e| {
        error!(error = %e, "Invalid configuration");
        io::Error::new(io::ErrorKind::InvalidInput, e.to_string())
    })?;

    if config.jwt.secret.len() < RECOMMENDED_SECRET_LEN {
        warn!(
            length = config.jwt.secret.len(),
            recommended = RECOMMENDED_SECRET_LEN,
            "JWT_SECRET is shorter than recommended"
        );
    }

    // Initialize database
    let database = Database::new(&config.db_path).map_err(|e| {
        error!(error = %e, db_path = %config.db_path, "Could not open the database");
        io::Error::other(e.to_string())
    })?;
    info!(db_path = %config.db_path, "Database initialized");

    run_migrations(&database).map_err(|e| {
        error!(error = %e, "Migration failed");
        io::Error::other(e.to_string())
    })?;

    let user_repo = UserRepository::new(database.clone());
    match &config.admin {
        Some(seed) => {
            seed_admin(&user_repo, seed).map_err(|e| {
                error!(error = %e, "Admin user migration failed");
                io::Error::other(e.to_string())
            })?;
        }
        None => info!("ADMIN_PASSWORD not set, skipping admin account seed"),
    }

    let verifier: Arc<dyn CredentialVerifier> = Arc::new(user_repo);
    let verifier = web::Data::from(verifier);
    let tokens = web::Data::new(TokenService::from_config(&config.jwt));
    let database = web::Data::new(database);

    let bind_address = config.bind_address();

    info!(bind_address = %bind_address, ttl_hours = tokens.ttl().num_hours(), "Starting server");
    info!("Available endpoints:");
    info!("   GET  /health       - Health check (public)");
    info!("   POST /login        - Issue a bearer token (public)");
    info!("   GET  /v1/protected - Placeholder resource (protected)");
    info!("   GET  /v1/profile   - Decoded token claims (protected)");
    info!(
        swagger_url = format!("http://{}/swagger-ui/", bind_address),
        "Swagger UI available"
    );

    HttpServer::new(move || {
        // Configure CORS
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::ACCEPT,
                actix_web::http::header::CONTENT_TYPE,
            ])
            .max_age(3600);

        let openapi = ApiDoc::openapi();

        App::new()
            .app_data(verifier.clone())
            .app_data(tokens.clone())
            .app_data(database.clone())
            .wrap(TracingLogger::default())
            .wrap(cors)
            // Swagger UI
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi))
            .configure(routes::configure)
    })
    .bind(&bind_address)?
    .run()
    .await
}

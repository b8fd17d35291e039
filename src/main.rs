mod adapters;
mod application;
mod domain;
mod services;

use std::sync::Arc;

use adapters::{
    controllers::{
        department_controller::DepartmentController, health_controller::HealthController,
        user_controller::UserController,
    },
    repositories::PgDepartmentRepository,
    state::AppState,
};
use application::{
    repositories::department_repository::DepartmentRepository,
    services::{DepartmentBindingService, IdentityProvider},
};
use axum::{
    routing::{delete, get, post},
    Router,
};
use domain::config::{
    secrets::{IdentitySecrets, StorageCredentials},
    settings::{FileConstraints, UploadSettings},
};
use tower_http::cors::{Any, CorsLayer};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let database_url = std::env::var("DATABASE_URL")
        .expect("ERROR: DATABASE_URL environment variable must be set");

    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse::<u16>()
        .expect("PORT must be a valid u16");

    // Configure CORS
    let cors = if let Ok(allowed_origins) = std::env::var("CORS_ALLOWED_ORIGINS") {
        // Parse comma-separated origins
        let origins: Vec<_> = allowed_origins
            .split(',')
            .map(|s| s.trim().parse().expect("Invalid CORS origin"))
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Allow all origins if not specified (only for development)
        CorsLayer::permissive()
    };

    tracing::info!("Connecting to database...");
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(&database_url)
        .await
        .expect("ERROR: Failed to connect to PostgreSQL database. Check DATABASE_URL and network connectivity.");
    tracing::info!("Database connection established");

    // Credentials are validated here, before the server accepts traffic; a
    // missing key fails startup instead of masquerading as an outage later.
    let upload_settings = UploadSettings::from_env();
    let storage_service =
        services::create_storage_client(StorageCredentials::from_env(), &upload_settings)
            .expect("ERROR: Storage credentials are missing or malformed. Check STORAGE_* environment variables.");

    let identity_provider = Arc::new(
        services::HttpIdentityProvider::new(IdentitySecrets::from_env())
            .expect("ERROR: Identity provider is misconfigured. Check IDENTITY_* environment variables."),
    ) as Arc<dyn IdentityProvider>;

    let department_repository =
        Arc::new(PgDepartmentRepository::new(pool)) as Arc<dyn DepartmentRepository>;
    let binding_service = Arc::new(DepartmentBindingService::new(department_repository));

    match binding_service.warm_cache().await {
        Ok(count) => tracing::info!("Department cache warmed with {} records", count),
        Err(e) => tracing::warn!("Department cache warm-up failed, continuing cold: {:?}", e),
    }

    let app_state = AppState {
        binding_service,
        storage_service,
        identity_provider,
        file_constraints: Arc::new(FileConstraints::from_env()),
    };

    let router = Router::new()
        .route("/api/v1/health", get(HealthController::health_check))
        .route(
            "/api/v1/departments/{reference}",
            get(DepartmentController::get_department),
        )
        .route(
            "/api/v1/departments/{reference}/image",
            post(DepartmentController::upload_image),
        )
        .route("/api/v1/users", delete(UserController::delete_user))
        .layer(cors)
        .with_state(app_state);

    // Start the server
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .expect("Failed to bind to port");

    tracing::info!("Server listening on 0.0.0.0:{}", port);

    axum::serve(listener, router)
        .await
        .expect("Failed to start server");
}

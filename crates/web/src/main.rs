use anyhow::Context;
use axum::{Json, Router, routing::get};
use storage::Database;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

mod config;
mod error;
mod features;
mod middleware;
mod notify;
mod state;

use config::Config;
use middleware::auth::WorkerKeys;
use notify::Notifier;
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::arenaclient::handlers::lease_match,
        features::arenaclient::handlers::submit_result,
        features::rounds::handlers::generate_round,
    ),
    components(
        schemas(
            storage::dto::arenaclient::LeasedBot,
            storage::dto::arenaclient::LeaseMatchResponse,
            storage::dto::arenaclient::SubmitResultRequest,
            storage::dto::arenaclient::SubmitResultResponse,
            storage::models::OutcomeType,
            storage::models::Round,
        )
    ),
    tags(
        (name = "arenaclient", description = "Match leasing and result submission for arena clients"),
        (name = "rounds", description = "Operator round scheduling"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting ladder API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let state = AppState {
        db,
        worker_keys: WorkerKeys::from_comma_separated(&config.worker_keys),
        notifier: Notifier::new(config.result_webhook_url.clone()),
    };

    let app = Router::new()
        .nest("/api/arenaclient", features::arenaclient::routes::routes())
        .nest("/api/rounds", features::rounds::routes::routes())
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .context("Failed to bind listener")?;
    axum::serve(listener, app).await?;

    Ok(())
}

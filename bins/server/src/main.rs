//! Terralot API Server
//!
//! Main entry point for the Terralot backend service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use terralot_api::{AppState, create_router};
use terralot_core::storage::{S3Target, StorageService};
use terralot_db::connect;
use terralot_shared::config::AppConfig;
use terralot_shared::{JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "terralot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Connect to database
    let db = connect(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await?;
    info!("Connected to database");

    // Create JWT service
    let jwt_service = JwtService::new(JwtConfig {
        secret: config.jwt.secret.clone(),
        token_expires_hours: config.jwt.token_expiry_hours,
    });

    // Ensure the local upload directory exists before serving it
    tokio::fs::create_dir_all(&config.upload.dir).await?;

    // Optional S3 forwarding for admin uploads
    let storage = match &config.s3 {
        Some(s3) => match StorageService::from_s3(S3Target {
            bucket: s3.bucket.clone(),
            region: s3.region.clone(),
            access_key_id: s3.access_key_id.clone(),
            secret_access_key: s3.secret_access_key.clone(),
            endpoint: s3.endpoint.clone(),
            base_url: s3.base_url.clone(),
        }) {
            Ok(service) => {
                info!(bucket = %s3.bucket, "S3 upload forwarding enabled");
                Some(Arc::new(service))
            }
            Err(e) => {
                warn!(error = %e, "S3 configuration invalid, uploads stay local");
                None
            }
        },
        None => None,
    };

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
        storage,
        config: Arc::new(config.clone()),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own.
//!
//! ## Intended use
//! This binary is useful for development and debugging when you only want the REST server (with
//! OpenAPI/Swagger UI). The workspace's main `handover-run` binary serves the same router.

use api_rest::{router, AppState, Gateway};
use handover_core::CoreConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the handover REST API server
///
/// # Environment Variables
/// - `HANDOVER_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `HANDOVER_SNAPSHOT_DIR`, `HANDOVER_EXPORT_DIR`, `HANDOVER_PAGE_HEIGHT`: core configuration
/// - `HANDOVER_GATEWAY`: `supabase` (default) or `memory`
/// - `SUPABASE_URL`, `SUPABASE_ANON_KEY`, `SUPABASE_ACCESS_TOKEN`: hosted database
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is invalid or incomplete,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("HANDOVER_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    tracing::info!("-- Starting handover REST API on {}", addr);

    let cfg = CoreConfig::from_env_values(
        std::env::var("HANDOVER_SNAPSHOT_DIR").ok(),
        std::env::var("HANDOVER_EXPORT_DIR").ok(),
        std::env::var("HANDOVER_PAGE_HEIGHT").ok(),
    )?;
    let gateway = Gateway::from_env_values(
        std::env::var("HANDOVER_GATEWAY").ok(),
        std::env::var("SUPABASE_URL").ok(),
        std::env::var("SUPABASE_ANON_KEY").ok(),
        std::env::var("SUPABASE_ACCESS_TOKEN").ok(),
    )?;
    let state = AppState::new(&cfg, gateway)?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}

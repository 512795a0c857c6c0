use api_rest::{AppState, Gateway, router};
use handover_core::CoreConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the handover application
///
/// Resolves configuration once, then serves the REST API (with Swagger UI) until Ctrl-C.
///
/// # Environment Variables
/// - `HANDOVER_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `HANDOVER_SNAPSHOT_DIR`: local snapshot directory (default: "handover_snapshots")
/// - `HANDOVER_EXPORT_DIR`: export directory (default: "handover_exports")
/// - `HANDOVER_PAGE_HEIGHT`: rows per exported page (default: 60)
/// - `HANDOVER_GATEWAY`: `supabase` (default) or `memory`
/// - `SUPABASE_URL`, `SUPABASE_ANON_KEY`: hosted database (required for `supabase`)
/// - `SUPABASE_ACCESS_TOKEN`: signed-in user's token (optional)
///
/// # Returns
/// * `Ok(())` - If the server starts and shuts down cleanly
/// * `Err(anyhow::Error)` - If configuration, startup or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("handover=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("HANDOVER_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

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

    tracing::info!("++ Starting handover REST on {}", rest_addr);
    tracing::info!(
        "++ Snapshots in {}, exports in {}",
        cfg.snapshot_dir().display(),
        cfg.export_dir().display()
    );

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("-- Shutting down");
        })
        .await?;

    Ok(())
}

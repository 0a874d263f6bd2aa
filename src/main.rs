use anyhow::Context;
use campus::campus_config::ServerConfig;
use campus::logging::{init_tracing, shutdown_tracer};
use campus::metrics::{init_metrics, metrics_app};
use campus::router::init_router;
use campus::state::init_app_state;
use dotenvy::dotenv;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let server_config = ServerConfig::from_env();
    init_tracing(&server_config).context("Failed to initialize logging")?;

    let state = init_app_state()
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&state.db)
        .await
        .context("Failed to run migrations")?;
    info!("Migrations applied");

    if let Some(handle) = init_metrics() {
        let metrics_addr = format!("0.0.0.0:{}", server_config.metrics_port);
        let listener = tokio::net::TcpListener::bind(&metrics_addr)
            .await
            .with_context(|| format!("Failed to bind metrics listener on {metrics_addr}"))?;
        info!(addr = %metrics_addr, "Metrics available at /metrics");
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, metrics_app(handle)).await {
                tracing::error!(error = %e, "Metrics server stopped");
            }
        });
    }

    let app = init_router(state);

    let addr = format!("0.0.0.0:{}", server_config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(%addr, "Server running");
    info!("Swagger UI at http://localhost:{}/swagger-ui", server_config.port);
    info!("Scalar UI at http://localhost:{}/scalar", server_config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    shutdown_tracer();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}

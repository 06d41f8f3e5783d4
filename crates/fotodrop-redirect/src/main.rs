use anyhow::Result;
use fotodrop_core::Config;
use fotodrop_ledger::create_ledger;
use fotodrop_redirect::state::AppState;
use fotodrop_redirect::{build_router, init_tracing};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env()?;
    let ledger = create_ledger(&config).await?;
    if config.redirect_api_secret().is_none() {
        if config.is_production() {
            anyhow::bail!("REDIRECT_API_SECRET must be set in production");
        }
        tracing::warn!("REDIRECT_API_SECRET not set; /update is disabled");
    }

    let state = Arc::new(AppState::new(&config, ledger));
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.redirect_port());
    tracing::info!(addr = %addr, "Starting redirect server");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Listens for Ctrl+C (SIGINT) and SIGTERM to initiate graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal");
        },
    }
}

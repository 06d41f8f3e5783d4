//! Fotodrop Redirect Service
//!
//! Resolves short branded links (`/view/{alias}`) to the underlying storage
//! folder so outbound email links never point at the provider's domain.
//! Reads and writes the same alias ledger as the delivery pipeline, through
//! the `AliasLedger` trait; the two processes coordinate only through that
//! durable state (last write wins).

pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use state::AppState;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the service router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/view/{alias}", get(routes::view_alias))
        .route("/update", post(routes::update_alias))
        .route("/status", get(routes::status))
        .route("/linktree", get(routes::linktree))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Console tracing for the redirect binary.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "fotodrop=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().compact())
        .init();
}

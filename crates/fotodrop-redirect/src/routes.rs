//! Route handlers: alias lookup, authenticated upsert, liveness.

use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// 302 to the provider folder; the alias URL is what recipients clicked in
/// their delivery email.
pub async fn view_alias(
    Path(alias): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.ledger.get(&alias).await {
        Ok(Some(folder_id)) => {
            let location = state.folder_url(&folder_id);
            tracing::debug!(alias = %alias, folder_id = %folder_id, "Alias resolved");
            (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
        }
        Ok(None) => {
            tracing::debug!(alias = %alias, "Alias not found");
            (StatusCode::NOT_FOUND, "Model folder not found").into_response()
        }
        Err(e) => {
            tracing::error!(alias = %alias, error = %e, "Ledger lookup failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Ledger unavailable").into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub alias: Option<String>,
    pub folder_id: Option<String>,
    pub secret: Option<String>,
}

/// Upsert one alias mapping. Guarded by the shared secret; missing fields
/// are a 400, a bad secret a 401.
pub async fn update_alias(
    State(state): State<Arc<AppState>>,
    Json(body): Json<UpdateRequest>,
) -> Response {
    let authorized = match (&state.update_secret, &body.secret) {
        (Some(expected), Some(provided)) => {
            bool::from(expected.as_bytes().ct_eq(provided.as_bytes()))
        }
        _ => false,
    };
    if !authorized {
        return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    }

    let (alias, folder_id) = match (body.alias, body.folder_id) {
        (Some(alias), Some(folder_id)) if !alias.is_empty() && !folder_id.is_empty() => {
            (alias, folder_id)
        }
        _ => return (StatusCode::BAD_REQUEST, "Missing alias or folder_id").into_response(),
    };

    match state.ledger.put(&alias, &folder_id).await {
        Ok(()) => {
            tracing::info!(alias = %alias, folder_id = %folder_id, "Alias updated");
            (StatusCode::OK, "Redirect updated").into_response()
        }
        Err(e) => {
            tracing::error!(alias = %alias, error = %e, "Alias update failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Ledger unavailable").into_response()
        }
    }
}

/// Liveness probe - process is running.
pub async fn status() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Promo redirect, kept out of the way of the alias namespace.
pub async fn linktree(State(state): State<Arc<AppState>>) -> Response {
    match &state.linktree_url {
        Some(url) => (StatusCode::FOUND, [(header::LOCATION, url.clone())]).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

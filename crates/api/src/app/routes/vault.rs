use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/state", get(get_state))
        .route("/history", get(get_history))
        .route("/toggle", post(toggle_state))
        .route("/seed", post(seed_history))
}

pub async fn get_state(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.vault.latest() {
        Ok(Some(state)) => (StatusCode::OK, Json(dto::vault_state_to_json(&state))).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "no vault state recorded"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_history(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.vault.history() {
        Ok(states) => {
            let items = states
                .iter()
                .map(dto::vault_state_to_json)
                .collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn toggle_state(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.vault.toggle() {
        Ok(Some(state)) => (StatusCode::OK, Json(dto::vault_state_to_json(&state))).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "no vault state to toggle"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn seed_history(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.vault.seed() {
        Ok(inserted) => (StatusCode::OK, Json(serde_json::json!({ "inserted": inserted }))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

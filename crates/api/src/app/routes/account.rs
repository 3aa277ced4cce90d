use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use aurum_vault::TransactionKind;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::UserContext;

pub async fn get_account(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
) -> axum::response::Response {
    match services.recorder.account(user.user_id()) {
        Ok(account) => (StatusCode::OK, Json(dto::account_to_json(&account))).into_response(),
        Err(e) => errors::recorder_error_to_response(e),
    }
}

pub async fn list_transactions(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
) -> axum::response::Response {
    match services.recorder.recent_transactions(user.user_id()) {
        Ok(records) => {
            let items = records
                .iter()
                .map(dto::transaction_to_json)
                .collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::recorder_error_to_response(e),
    }
}

pub async fn create_transaction(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    body: Result<Json<dto::CreateTransactionRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => return errors::transaction_body_rejection(rejection),
    };
    let kind = match body.kind.parse::<TransactionKind>() {
        Ok(k) => k,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    match services.recorder.record(user.user_id(), kind, body.amount) {
        Ok(recorded) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "transaction": dto::transaction_to_json(&recorded.record),
                "balances": dto::account_to_json(&recorded.balances),
            })),
        )
            .into_response(),
        Err(e) => errors::recorder_error_to_response(e),
    }
}

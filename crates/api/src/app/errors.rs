use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use aurum_infra::RecorderError;
use aurum_infra::store::StoreError;
use aurum_vault::LedgerError;

pub fn recorder_error_to_response(err: RecorderError) -> axum::response::Response {
    match err {
        RecorderError::Ledger(e) => ledger_error_to_response(e),
        RecorderError::Store(e) => store_error_to_response(e),
    }
}

pub fn ledger_error_to_response(err: LedgerError) -> axum::response::Response {
    let message = err.to_string();
    match err {
        LedgerError::InsufficientFunds { .. } => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "insufficient_funds", message)
        }
        LedgerError::InvalidAmount(_) => json_error(StatusCode::BAD_REQUEST, "invalid_amount", message),
        LedgerError::InvalidQuote(_) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invalid_quote", message)
        }
        LedgerError::UnknownKind(_) => json_error(StatusCode::BAD_REQUEST, "unknown_kind", message),
    }
}

/// Body of `POST /transactions` that could not be read as a transaction
/// request. Failures located at the `amount` field keep the ledger's
/// `invalid_amount` code; anything else is a malformed request.
pub fn transaction_body_rejection(rejection: JsonRejection) -> axum::response::Response {
    let message = rejection.body_text();
    tracing::debug!(status = %rejection.status(), "transaction body rejected: {message}");
    if message.contains("amount") {
        json_error(StatusCode::BAD_REQUEST, "invalid_amount", message)
    } else {
        json_error(StatusCode::BAD_REQUEST, "invalid_request", message)
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    tracing::error!("store failure: {err}");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", err.to_string())
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

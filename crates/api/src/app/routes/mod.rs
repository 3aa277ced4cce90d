use axum::{Router, routing::get};

pub mod account;
pub mod system;
pub mod vault;

/// Router for all caller-scoped endpoints (user context required).
pub fn account_router() -> Router {
    Router::new()
        .route("/account", get(account::get_account))
        .route(
            "/transactions",
            get(account::list_transactions).post(account::create_transaction),
        )
}

use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use aurum_core::UserId;

use crate::app::errors::json_error;
use crate::context::UserContext;

/// Header carrying the caller's user id. Sign-in happens upstream; this
/// service trusts whatever identity the gateway forwards.
pub const USER_ID_HEADER: &str = "x-user-id";

pub async fn user_middleware(mut req: Request, next: Next) -> Result<Response, Response> {
    let user_id = extract_user_id(req.headers())?;
    req.extensions_mut().insert(UserContext::new(user_id));
    Ok(next.run(req).await)
}

fn extract_user_id(headers: &HeaderMap) -> Result<UserId, Response> {
    let value = headers
        .get(USER_ID_HEADER)
        .ok_or_else(|| json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "missing x-user-id"))?;

    let value = value
        .to_str()
        .map_err(|_| json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "malformed x-user-id"))?;

    value
        .parse::<UserId>()
        .map_err(|e| json_error(StatusCode::UNAUTHORIZED, "unauthenticated", e.to_string()))
}

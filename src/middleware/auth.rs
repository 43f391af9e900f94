use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::app::AppState;
use crate::error::ApiError;

const MISSING_TOKEN: &str = "Missing authorization token on request";

/// Verify the request token and expose its [`crate::auth::Principal`] to handlers.
///
/// Invalid or expired tokens are 401; a valid token whose user has since
/// disappeared is 403.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(request.headers())?;

    let principal = state
        .tokens
        .extract_token_details(&token)
        .ok_or_else(|| ApiError::unauthorized("Invalid or expired authorization token"))?;

    if !state.users.exists(principal.auth_user_id).await? {
        warn!("Token presented for missing user {}", principal.auth_user_id);
        return Err(ApiError::forbidden("The user for this token no longer exists"));
    }

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

/// The token as issued, or wrapped as `Bearer <token>`.
fn extract_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthorized(MISSING_TOKEN))?
        .to_str()
        .map_err(|_| ApiError::unauthorized("Invalid Authorization header format"))?
        .trim();

    let token = value.strip_prefix("Bearer ").map(str::trim).unwrap_or(value);
    if token.is_empty() {
        return Err(ApiError::unauthorized(MISSING_TOKEN));
    }
    Ok(token.to_string())
}

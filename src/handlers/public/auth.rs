use axum::{
    extract::{rejection::JsonRejection, State},
    http::header::AUTHORIZATION,
    response::IntoResponse,
    Json,
};

use crate::api::AuthRequest;
use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::ApiResponse;

/// POST /auth
///
/// Body is the authenticated principal; the token travels in the
/// `Authorization` response header.
pub async fn auth_post(
    State(state): State<AppState>,
    body: Result<Json<AuthRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = body?;
    let (principal, token) = state.auth.login(request).await?;
    Ok(([(AUTHORIZATION, token)], ApiResponse::success(principal)))
}

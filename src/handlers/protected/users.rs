use std::collections::HashMap;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use uuid::Uuid;

use super::search_params;
use crate::api::{NewUserRequest, RecordCreationResponse, UserResponse};
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /users
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<UserResponse>> {
    Ok(ApiResponse::success(state.users.find_all().await?))
}

/// GET /users/id/:id
pub async fn get(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<UserResponse> {
    let Path(id) = path?;
    Ok(ApiResponse::success(state.users.find_one(id).await?))
}

/// GET /users/search?<attribute>=<value>
pub async fn search(
    State(state): State<AppState>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> ApiResult<Vec<UserResponse>> {
    let params = search_params(query)?;
    Ok(ApiResponse::success(state.users.search(&params).await?))
}

/// POST /users
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<NewUserRequest>, JsonRejection>,
) -> ApiResult<RecordCreationResponse> {
    let Json(request) = body?;
    Ok(ApiResponse::created(state.users.create(request).await?))
}

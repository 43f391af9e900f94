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
use crate::api::{NewResourceRequest, RecordCreationResponse, ResourceResponse, ResourceResponseDetailed};
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<ResourceResponse>> {
    Ok(ApiResponse::success(state.resources.find_all().await?))
}

pub async fn get(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<ResourceResponseDetailed> {
    let Path(id) = path?;
    Ok(ApiResponse::success(state.resources.find_one(id).await?))
}

pub async fn search(
    State(state): State<AppState>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> ApiResult<Vec<ResourceResponse>> {
    let params = search_params(query)?;
    Ok(ApiResponse::success(state.resources.search(&params).await?))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<NewResourceRequest>, JsonRejection>,
) -> ApiResult<RecordCreationResponse> {
    let Json(request) = body?;
    Ok(ApiResponse::created(state.resources.create(request).await?))
}

pub async fn update(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<NewResourceRequest>, JsonRejection>,
) -> ApiResult<ResourceResponse> {
    let Path(id) = path?;
    let Json(request) = body?;
    Ok(ApiResponse::success(state.resources.update(id, request).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = path?;
    state.resources.delete(id).await?;
    Ok(ApiResponse::no_content())
}

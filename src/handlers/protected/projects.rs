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
use crate::api::{NewProjectRequest, ProjectAssignment, ProjectResponseDetailed, RecordCreationResponse};
use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<ProjectResponseDetailed>> {
    Ok(ApiResponse::success(state.projects.find_all().await?))
}

pub async fn get(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<ProjectResponseDetailed> {
    let Path(id) = path?;
    Ok(ApiResponse::success(state.projects.find_one(id).await?))
}

pub async fn search(
    State(state): State<AppState>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> ApiResult<Vec<ProjectResponseDetailed>> {
    let params = search_params(query)?;
    Ok(ApiResponse::success(state.projects.search(&params).await?))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<NewProjectRequest>, JsonRejection>,
) -> ApiResult<RecordCreationResponse> {
    let Json(request) = body?;
    Ok(ApiResponse::created(state.projects.create(request).await?))
}

pub async fn update(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<NewProjectRequest>, JsonRejection>,
) -> ApiResult<ProjectResponseDetailed> {
    let Path(id) = path?;
    let Json(request) = body?;
    Ok(ApiResponse::success(state.projects.update(id, request).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<()> {
    let Path(id) = path?;
    state.projects.delete(id).await?;
    Ok(ApiResponse::no_content())
}

/// PATCH /projects/assign
pub async fn assign(
    State(state): State<AppState>,
    body: Result<Json<ProjectAssignment>, JsonRejection>,
) -> ApiResult<ProjectResponseDetailed> {
    let Json(assignment) = body?;
    Ok(ApiResponse::success(state.projects.assign_owner(assignment).await?))
}

use std::collections::HashMap;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use super::search_params;
use crate::api::{NewTaskRequest, RecordCreationResponse, TaskAssignment, TaskResponse};
use crate::app::AppState;
use crate::auth::Principal;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct TaskIdQuery {
    pub id: Uuid,
}

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<TaskResponse>> {
    Ok(ApiResponse::success(state.tasks.find_all().await?))
}

pub async fn get(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<TaskResponse> {
    let Path(id) = path?;
    Ok(ApiResponse::success(state.tasks.find_one(id).await?))
}

pub async fn search(
    State(state): State<AppState>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> ApiResult<Vec<TaskResponse>> {
    let params = search_params(query)?;
    Ok(ApiResponse::success(state.tasks.search(&params).await?))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<NewTaskRequest>, JsonRejection>,
) -> ApiResult<RecordCreationResponse> {
    let Json(request) = body?;
    Ok(ApiResponse::created(state.tasks.create(request).await?))
}

pub async fn update(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<NewTaskRequest>, JsonRejection>,
) -> ApiResult<TaskResponse> {
    let Path(id) = path?;
    let Json(request) = body?;
    Ok(ApiResponse::success(state.tasks.update(id, request).await?))
}

/// DELETE /tasks?id=<uuid>
pub async fn delete(
    State(state): State<AppState>,
    query: Result<Query<TaskIdQuery>, QueryRejection>,
) -> ApiResult<()> {
    let Query(TaskIdQuery { id }) = query?;
    state.tasks.delete(id).await?;
    Ok(ApiResponse::no_content())
}

/// PATCH /tasks/assign; the caller becomes the assigner.
pub async fn assign(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    body: Result<Json<TaskAssignment>, JsonRejection>,
) -> ApiResult<TaskResponse> {
    let Json(assignment) = body?;
    Ok(ApiResponse::success(state.tasks.assign(&principal, assignment).await?))
}

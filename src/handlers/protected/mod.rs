// handlers/protected/mod.rs - token-protected CRUD endpoints
//
// Each submodule exposes list/get/search/create (and update/delete/assign
// where the resource supports it) for one entity.

pub mod projects;
pub mod resources;
pub mod tasks;
pub mod users;

use std::collections::HashMap;

use axum::extract::{rejection::QueryRejection, Query};

use crate::error::ApiError;

/// Search criteria from the query string; every key must be an entity attribute.
pub(crate) fn search_params(
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<HashMap<String, String>, ApiError> {
    let Query(params) = query?;
    Ok(params)
}

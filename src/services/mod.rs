pub mod auth_service;
pub mod project_service;
pub mod resource_service;
pub mod task_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use project_service::ProjectService;
pub use resource_service::ResourceService;
pub use task_service::TaskService;
pub use user_service::UserService;

use std::collections::HashMap;

use crate::error::ApiError;
use crate::search::{EntitySearcher, SearchQuery, Searchable};

/// Query-string criteria as received, e.g. `firstName=Urist`.
pub type SearchParams = HashMap<String, String>;

/// Resolve `params` for `T`; `None` means "no criteria, list everything".
pub(crate) fn search_query<T: Searchable>(
    searcher: &EntitySearcher,
    params: &SearchParams,
) -> Result<Option<SearchQuery>, ApiError> {
    if params.is_empty() {
        return Ok(None);
    }
    Ok(Some(searcher.search::<T>(params)?))
}

pub(crate) fn non_empty<T>(found: Vec<T>, entity: &str) -> Result<Vec<T>, ApiError> {
    if found.is_empty() {
        return Err(ApiError::not_found(format!("No {} matches the search criteria", entity)));
    }
    Ok(found)
}

pub(crate) fn not_found(entity: &str, id: impl std::fmt::Display) -> ApiError {
    ApiError::not_found(format!("{} with id {} not found", entity, id))
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::projects::ProjectResponse;
use super::tasks::TaskResponseWithProject;
use crate::database::models::Resource;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&Resource> for ResourceResponse {
    fn from(resource: &Resource) -> Self {
        Self {
            id: resource.id,
            email: resource.email.clone(),
            first_name: resource.first_name.clone(),
            last_name: resource.last_name.clone(),
        }
    }
}

/// A resource with the projects it owns and the tasks assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceResponseDetailed {
    #[serde(flatten)]
    pub resource: ResourceResponse,
    pub projects: Vec<ProjectResponse>,
    pub assigned_tasks: Vec<TaskResponseWithProject>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewResourceRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

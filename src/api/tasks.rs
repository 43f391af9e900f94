use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::projects::ProjectResponse;
use super::resources::ResourceResponse;
use super::users::UserResponse;
use crate::database::models::Task;

/// Task fields shared by every task representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummary {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_date: NaiveDate,
}

impl From<&Task> for TaskSummary {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            name: task.name.clone(),
            description: task.description.clone(),
            start_date: task.start_date,
            end_date: task.end_date,
            created_date: task.created_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    #[serde(flatten)]
    pub task: TaskSummary,
    pub assignee: Option<ResourceResponse>,
    pub assigner: Option<UserResponse>,
    pub project: ProjectResponse,
}

impl From<&Task> for TaskResponse {
    fn from(task: &Task) -> Self {
        Self {
            task: TaskSummary::from(task),
            assignee: task.assignee.as_ref().map(ResourceResponse::from),
            assigner: task.assigner.as_ref().map(UserResponse::from),
            project: ProjectResponse::from(&task.project),
        }
    }
}

/// Used inside a project response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResponseWithResource {
    #[serde(flatten)]
    pub task: TaskSummary,
    pub assignee: Option<ResourceResponse>,
}

impl From<&Task> for TaskResponseWithResource {
    fn from(task: &Task) -> Self {
        Self {
            task: TaskSummary::from(task),
            assignee: task.assignee.as_ref().map(ResourceResponse::from),
        }
    }
}

/// Used inside a resource response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResponseWithProject {
    #[serde(flatten)]
    pub task: TaskSummary,
    pub project: ProjectResponse,
}

impl From<&Task> for TaskResponseWithProject {
    fn from(task: &Task) -> Self {
        Self {
            task: TaskSummary::from(task),
            project: ProjectResponse::from(&task.project),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewTaskRequest {
    pub name: String,
    pub description: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Required on create, ignored on update
    pub project_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAssignment {
    pub task_id: Uuid,
    pub resource_id: Uuid,
}

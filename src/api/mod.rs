//! Request and response bodies. All field names are camelCase on the wire.

pub mod projects;
pub mod resources;
pub mod tasks;
pub mod users;
pub mod validate;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use projects::{NewProjectRequest, ProjectAssignment, ProjectResponse, ProjectResponseDetailed};
pub use resources::{NewResourceRequest, ResourceResponse, ResourceResponseDetailed};
pub use tasks::{NewTaskRequest, TaskAssignment, TaskResponse, TaskResponseWithProject, TaskResponseWithResource, TaskSummary};
pub use users::{AuthRequest, NewUserRequest, UserResponse, UserRoleResponse};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordCreationResponse {
    pub id: Uuid,
}

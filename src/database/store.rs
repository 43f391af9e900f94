//! Persistence seams used by the services.
//!
//! Reads return hydrated aggregates. Writes take flat rows; `update_*` and
//! `delete_*` report whether a row was touched.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{Project, ProjectRow, Resource, Task, TaskRow, User, UserRole, UserRow};
use crate::search::SearchQuery;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list_users(&self) -> Result<Vec<User>, DatabaseError>;
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;
    async fn search_users(&self, query: &SearchQuery) -> Result<Vec<User>, DatabaseError>;
    async fn find_role_by_name(&self, role_name: &str) -> Result<Option<UserRole>, DatabaseError>;
    async fn insert_user(&self, row: UserRow) -> Result<(), DatabaseError>;
}

#[async_trait]
pub trait ResourceStore: Send + Sync {
    async fn list_resources(&self) -> Result<Vec<Resource>, DatabaseError>;
    async fn get_resource(&self, id: Uuid) -> Result<Option<Resource>, DatabaseError>;
    async fn find_resource_by_email(&self, email: &str) -> Result<Option<Resource>, DatabaseError>;
    async fn search_resources(&self, query: &SearchQuery) -> Result<Vec<Resource>, DatabaseError>;
    async fn insert_resource(&self, resource: Resource) -> Result<(), DatabaseError>;
    async fn update_resource(&self, resource: Resource) -> Result<bool, DatabaseError>;
    async fn delete_resource(&self, id: Uuid) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn list_projects(&self) -> Result<Vec<Project>, DatabaseError>;
    async fn get_project(&self, id: Uuid) -> Result<Option<Project>, DatabaseError>;
    async fn find_project_by_name(&self, name: &str) -> Result<Option<Project>, DatabaseError>;
    async fn search_projects(&self, query: &SearchQuery) -> Result<Vec<Project>, DatabaseError>;
    async fn projects_owned_by(&self, resource_id: Uuid) -> Result<Vec<Project>, DatabaseError>;
    async fn insert_project(&self, row: ProjectRow) -> Result<(), DatabaseError>;
    /// Updates name and dates; the owner is changed only through `set_project_owner`
    async fn update_project(&self, row: ProjectRow) -> Result<bool, DatabaseError>;
    async fn set_project_owner(&self, project_id: Uuid, resource_id: Uuid) -> Result<bool, DatabaseError>;
    async fn delete_project(&self, id: Uuid) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn list_tasks(&self) -> Result<Vec<Task>, DatabaseError>;
    async fn get_task(&self, id: Uuid) -> Result<Option<Task>, DatabaseError>;
    async fn search_tasks(&self, query: &SearchQuery) -> Result<Vec<Task>, DatabaseError>;
    /// Tasks of every project in `project_ids`, loaded in one batch.
    async fn tasks_in_projects(&self, project_ids: &[Uuid]) -> Result<Vec<Task>, DatabaseError>;
    async fn tasks_assigned_to(&self, resource_id: Uuid) -> Result<Vec<Task>, DatabaseError>;
    async fn insert_task(&self, row: TaskRow) -> Result<(), DatabaseError>;
    async fn update_task(&self, id: Uuid, changes: TaskChanges) -> Result<bool, DatabaseError>;
    async fn assign_task(&self, task_id: Uuid, resource_id: Uuid, user_id: Uuid) -> Result<bool, DatabaseError>;
    async fn delete_task(&self, id: Uuid) -> Result<bool, DatabaseError>;
}

/// Editable task columns. A task never moves between projects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskChanges {
    pub name: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn ping(&self) -> Result<(), DatabaseError>;
}

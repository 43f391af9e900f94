//! In-memory stores and fixtures for unit and router tests.

pub mod fixtures;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::hydrate;
use crate::database::manager::DatabaseError;
use crate::database::models::{Project, ProjectRow, Resource, Task, TaskRow, User, UserRole, UserRow};
use crate::database::store::{HealthCheck, ProjectStore, ResourceStore, TaskChanges, TaskStore, UserStore};
use crate::search::SearchQuery;

#[derive(Default)]
struct Tables {
    roles: Vec<UserRole>,
    users: Vec<UserRow>,
    resources: Vec<Resource>,
    projects: Vec<ProjectRow>,
    tasks: Vec<TaskRow>,
}

impl Tables {
    fn users(&self) -> Vec<User> {
        let mut users = hydrate::users(self.users.clone(), &self.roles);
        users.sort_by(|a, b| a.username.cmp(&b.username));
        users
    }

    fn resources(&self) -> Vec<Resource> {
        let mut resources = self.resources.clone();
        resources.sort_by(|a, b| {
            (&a.last_name, &a.first_name, a.id).cmp(&(&b.last_name, &b.first_name, b.id))
        });
        resources
    }

    fn projects(&self) -> Vec<Project> {
        let mut projects = hydrate::projects(self.projects.clone(), &self.resources);
        projects.sort_by(|a, b| (a.start_date, &a.name).cmp(&(b.start_date, &b.name)));
        projects
    }

    fn tasks(&self) -> Vec<Task> {
        let mut tasks = hydrate::tasks(self.tasks.clone(), &self.resources, &self.users(), &self.projects());
        tasks.sort_by(|a, b| (a.start_date, &a.name, a.id).cmp(&(b.start_date, &b.name, b.id)));
        tasks
    }
}

fn conflict(what: &str) -> DatabaseError {
    DatabaseError::Conflict(format!("{} conflicts with an existing record", what))
}

/// Mirrors the constraints of the PostgreSQL schema closely enough for service tests.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    offline: AtomicBool,
    batch_reads: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The admin role plus the development user (`test` / `P@ssword1`).
    pub async fn seeded() -> Self {
        let store = Self::new();
        store.add_user(&fixtures::mock_user()).await;
        store
    }

    pub async fn add_user(&self, user: &User) {
        let mut tables = self.tables.write().await;
        if !tables.roles.iter().any(|r| r.id == user.role.id) {
            tables.roles.push(user.role.clone());
        }
        tables.users.push(fixtures::user_row(user));
    }

    pub async fn add_resource(&self, resource: &Resource) {
        self.tables.write().await.resources.push(resource.clone());
    }

    pub async fn add_project(&self, project: &Project) {
        let mut tables = self.tables.write().await;
        if let Some(owner) = &project.owner {
            if !tables.resources.iter().any(|r| r.id == owner.id) {
                tables.resources.push(owner.clone());
            }
        }
        tables.projects.push(fixtures::project_row(project));
    }

    pub async fn add_task(&self, task: &Task) {
        self.tables.write().await.tasks.push(fixtures::task_row(task));
    }

    /// Make `ping` fail, as an unreachable database would.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// How many batched task reads have been served.
    pub fn batch_reads(&self) -> usize {
        self.batch_reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        Ok(self.tables.read().await.users())
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        Ok(self.tables.read().await.users().into_iter().find(|u| u.id == id))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        Ok(self.tables.read().await.users().into_iter().find(|u| u.username == username))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        Ok(self.tables.read().await.users().into_iter().find(|u| u.email == email))
    }

    async fn search_users(&self, query: &SearchQuery) -> Result<Vec<User>, DatabaseError> {
        Ok(self.tables.read().await.users().into_iter().filter(|u| query.matches(u)).collect())
    }

    async fn find_role_by_name(&self, role_name: &str) -> Result<Option<UserRole>, DatabaseError> {
        Ok(self.tables.read().await.roles.iter().find(|r| r.role_name == role_name).cloned())
    }

    async fn insert_user(&self, row: UserRow) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.username == row.username || u.email == row.email) {
            return Err(conflict("User"));
        }
        if !tables.roles.iter().any(|r| r.id == row.role) {
            return Err(conflict("User role"));
        }
        tables.users.push(row);
        Ok(())
    }
}

#[async_trait]
impl ResourceStore for MemoryStore {
    async fn list_resources(&self) -> Result<Vec<Resource>, DatabaseError> {
        Ok(self.tables.read().await.resources())
    }

    async fn get_resource(&self, id: Uuid) -> Result<Option<Resource>, DatabaseError> {
        Ok(self.tables.read().await.resources.iter().find(|r| r.id == id).cloned())
    }

    async fn find_resource_by_email(&self, email: &str) -> Result<Option<Resource>, DatabaseError> {
        Ok(self.tables.read().await.resources.iter().find(|r| r.email == email).cloned())
    }

    async fn search_resources(&self, query: &SearchQuery) -> Result<Vec<Resource>, DatabaseError> {
        Ok(self.tables.read().await.resources().into_iter().filter(|r| query.matches(r)).collect())
    }

    async fn insert_resource(&self, resource: Resource) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.resources.iter().any(|r| r.email == resource.email) {
            return Err(conflict("Resource"));
        }
        tables.resources.push(resource);
        Ok(())
    }

    async fn update_resource(&self, resource: Resource) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.resources.iter().any(|r| r.email == resource.email && r.id != resource.id) {
            return Err(conflict("Resource"));
        }
        match tables.resources.iter_mut().find(|r| r.id == resource.id) {
            Some(existing) => {
                *existing = resource;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_resource(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        let before = tables.resources.len();
        tables.resources.retain(|r| r.id != id);
        if tables.resources.len() == before {
            return Ok(false);
        }
        for project in tables.projects.iter_mut().filter(|p| p.owner == Some(id)) {
            project.owner = None;
        }
        for task in tables.tasks.iter_mut().filter(|t| t.assigned_to == Some(id)) {
            task.assigned_to = None;
        }
        Ok(true)
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn list_projects(&self) -> Result<Vec<Project>, DatabaseError> {
        Ok(self.tables.read().await.projects())
    }

    async fn get_project(&self, id: Uuid) -> Result<Option<Project>, DatabaseError> {
        Ok(self.tables.read().await.projects().into_iter().find(|p| p.id == id))
    }

    async fn find_project_by_name(&self, name: &str) -> Result<Option<Project>, DatabaseError> {
        Ok(self.tables.read().await.projects().into_iter().find(|p| p.name == name))
    }

    async fn search_projects(&self, query: &SearchQuery) -> Result<Vec<Project>, DatabaseError> {
        Ok(self.tables.read().await.projects().into_iter().filter(|p| query.matches(p)).collect())
    }

    async fn projects_owned_by(&self, resource_id: Uuid) -> Result<Vec<Project>, DatabaseError> {
        Ok(self
            .tables
            .read()
            .await
            .projects()
            .into_iter()
            .filter(|p| p.owner.as_ref().map(|o| o.id) == Some(resource_id))
            .collect())
    }

    async fn insert_project(&self, row: ProjectRow) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.projects.iter().any(|p| p.name == row.name) {
            return Err(conflict("Project"));
        }
        tables.projects.push(row);
        Ok(())
    }

    async fn update_project(&self, row: ProjectRow) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.projects.iter().any(|p| p.name == row.name && p.id != row.id) {
            return Err(conflict("Project"));
        }
        match tables.projects.iter_mut().find(|p| p.id == row.id) {
            Some(existing) => {
                existing.name = row.name;
                existing.start_date = row.start_date;
                existing.end_date = row.end_date;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_project_owner(&self, project_id: Uuid, resource_id: Uuid) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.resources.iter().any(|r| r.id == resource_id) {
            return Err(conflict("Project owner"));
        }
        match tables.projects.iter_mut().find(|p| p.id == project_id) {
            Some(project) => {
                project.owner = Some(resource_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_project(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        let before = tables.projects.len();
        tables.projects.retain(|p| p.id != id);
        tables.tasks.retain(|t| t.project != id);
        Ok(tables.projects.len() != before)
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn list_tasks(&self) -> Result<Vec<Task>, DatabaseError> {
        Ok(self.tables.read().await.tasks())
    }

    async fn get_task(&self, id: Uuid) -> Result<Option<Task>, DatabaseError> {
        Ok(self.tables.read().await.tasks().into_iter().find(|t| t.id == id))
    }

    async fn search_tasks(&self, query: &SearchQuery) -> Result<Vec<Task>, DatabaseError> {
        Ok(self.tables.read().await.tasks().into_iter().filter(|t| query.matches(t)).collect())
    }

    async fn tasks_in_projects(&self, project_ids: &[Uuid]) -> Result<Vec<Task>, DatabaseError> {
        self.batch_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .tables
            .read()
            .await
            .tasks()
            .into_iter()
            .filter(|t| project_ids.contains(&t.project.id))
            .collect())
    }

    async fn tasks_assigned_to(&self, resource_id: Uuid) -> Result<Vec<Task>, DatabaseError> {
        Ok(self
            .tables
            .read()
            .await
            .tasks()
            .into_iter()
            .filter(|t| t.assignee.as_ref().map(|a| a.id) == Some(resource_id))
            .collect())
    }

    async fn insert_task(&self, row: TaskRow) -> Result<(), DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.projects.iter().any(|p| p.id == row.project) {
            return Err(conflict("Task project"));
        }
        tables.tasks.push(row);
        Ok(())
    }

    async fn update_task(&self, id: Uuid, changes: TaskChanges) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        match tables.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.name = changes.name;
                task.description = changes.description;
                task.start_date = changes.start_date;
                task.end_date = changes.end_date;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn assign_task(&self, task_id: Uuid, resource_id: Uuid, user_id: Uuid) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        match tables.tasks.iter_mut().find(|t| t.id == task_id) {
            Some(task) => {
                task.assigned_to = Some(resource_id);
                task.assigned_by = Some(user_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_task(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        let before = tables.tasks.len();
        tables.tasks.retain(|t| t.id != id);
        Ok(tables.tasks.len() != before)
    }
}

#[async_trait]
impl HealthCheck for MemoryStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(DatabaseError::Unavailable("store is offline".to_string()));
        }
        Ok(())
    }
}

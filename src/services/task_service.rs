use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use super::{non_empty, not_found, search_query, SearchParams};
use crate::api::validate::FieldErrors;
use crate::api::{NewTaskRequest, RecordCreationResponse, TaskAssignment, TaskResponse};
use crate::auth::Principal;
use crate::database::models::{Task, TaskRow};
use crate::database::store::{ProjectStore, ResourceStore, TaskChanges, TaskStore, UserStore};
use crate::error::ApiError;
use crate::search::EntitySearcher;

#[derive(Clone)]
pub struct TaskService {
    tasks: Arc<dyn TaskStore>,
    projects: Arc<dyn ProjectStore>,
    resources: Arc<dyn ResourceStore>,
    users: Arc<dyn UserStore>,
    searcher: EntitySearcher,
}

fn validate(request: &NewTaskRequest) -> Result<(NaiveDate, NaiveDate), ApiError> {
    FieldErrors::new()
        .required("name", &request.name)
        .required_date("startDate", request.start_date)
        .required_date("endDate", request.end_date)
        .date_order(request.start_date, request.end_date)
        .into_result()?;

    match (request.start_date, request.end_date) {
        (Some(start), Some(end)) => Ok((start, end)),
        _ => Err(ApiError::bad_request("Task dates are required")),
    }
}

impl TaskService {
    pub fn new(
        tasks: Arc<dyn TaskStore>,
        projects: Arc<dyn ProjectStore>,
        resources: Arc<dyn ResourceStore>,
        users: Arc<dyn UserStore>,
        searcher: EntitySearcher,
    ) -> Self {
        Self { tasks, projects, resources, users, searcher }
    }

    pub async fn find_all(&self) -> Result<Vec<TaskResponse>, ApiError> {
        debug!("Listing tasks");
        let tasks = self.tasks.list_tasks().await?;
        Ok(tasks.iter().map(TaskResponse::from).collect())
    }

    pub async fn find_one(&self, id: Uuid) -> Result<TaskResponse, ApiError> {
        debug!("Fetching task {}", id);
        let task = self.tasks.get_task(id).await?.ok_or_else(|| not_found("Task", id))?;
        Ok(TaskResponse::from(&task))
    }

    pub async fn search(&self, params: &SearchParams) -> Result<Vec<TaskResponse>, ApiError> {
        debug!("Searching tasks by {:?}", params.keys().collect::<Vec<_>>());
        let tasks = match search_query::<Task>(&self.searcher, params)? {
            None => return self.find_all().await,
            Some(query) => self.tasks.search_tasks(&query).await?,
        };
        Ok(non_empty(tasks, "task")?.iter().map(TaskResponse::from).collect())
    }

    pub async fn create(&self, request: NewTaskRequest) -> Result<RecordCreationResponse, ApiError> {
        let (start_date, end_date) = validate(&request)?;
        let project_id = request
            .project_id
            .ok_or_else(|| ApiError::validation_error("projectId: This field is required", None))?;
        if self.projects.get_project(project_id).await?.is_none() {
            return Err(not_found("Project", project_id));
        }

        let id = Uuid::new_v4();
        self.tasks
            .insert_task(TaskRow {
                id,
                name: request.name,
                description: request.description,
                assigned_to: None,
                assigned_by: None,
                start_date,
                end_date,
                project: project_id,
                created_date: Utc::now().date_naive(),
            })
            .await?;

        info!("Created task {} in project {}", id, project_id);
        Ok(RecordCreationResponse { id })
    }

    pub async fn update(&self, id: Uuid, request: NewTaskRequest) -> Result<TaskResponse, ApiError> {
        let (start_date, end_date) = validate(&request)?;
        let changes = TaskChanges {
            name: request.name,
            description: request.description,
            start_date,
            end_date,
        };
        if !self.tasks.update_task(id, changes).await? {
            return Err(not_found("Task", id));
        }

        info!("Updated task {}", id);
        self.find_one(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        if !self.tasks.delete_task(id).await? {
            return Err(not_found("Task", id));
        }
        info!("Deleted task {}", id);
        Ok(())
    }

    /// Assign the task to a resource, recording the caller as the assigner.
    pub async fn assign(&self, principal: &Principal, assignment: TaskAssignment) -> Result<TaskResponse, ApiError> {
        let TaskAssignment { task_id, resource_id } = assignment;
        let user_id = principal.auth_user_id;

        if self.tasks.get_task(task_id).await?.is_none() {
            return Err(not_found("Task", task_id));
        }
        if self.resources.get_resource(resource_id).await?.is_none() {
            return Err(not_found("Resource", resource_id));
        }
        if self.users.get_user(user_id).await?.is_none() {
            return Err(not_found("User", user_id));
        }

        if !self.tasks.assign_task(task_id, resource_id, user_id).await? {
            return Err(not_found("Task", task_id));
        }

        info!("Task {} assigned to resource {} by user {}", task_id, resource_id, user_id);
        self.find_one(task_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::Project;
    use crate::testing::{fixtures, MemoryStore};

    fn service(store: &Arc<MemoryStore>) -> TaskService {
        TaskService::new(store.clone(), store.clone(), store.clone(), store.clone(), EntitySearcher::new(10))
    }

    async fn with_project() -> (Arc<MemoryStore>, Project) {
        let store = Arc::new(MemoryStore::seeded().await);
        let project = fixtures::project("Apollo", None);
        store.add_project(&project).await;
        (store, project)
    }

    fn request(name: &str, project_id: Option<Uuid>) -> NewTaskRequest {
        NewTaskRequest {
            name: name.to_string(),
            description: String::new(),
            start_date: Some(fixtures::date(2024, 2, 1)),
            end_date: Some(fixtures::date(2024, 2, 14)),
            project_id,
        }
    }

    #[tokio::test]
    async fn create_requires_an_existing_project() {
        let (store, project) = with_project().await;
        let tasks = service(&store);

        let created = tasks.create(request("Launch", Some(project.id))).await.unwrap();
        let task = tasks.find_one(created.id).await.unwrap();
        assert_eq!(task.project.name, "Apollo");
        assert_eq!(task.task.description, "");
        assert_eq!(task.task.created_date, Utc::now().date_naive());

        let err = tasks.create(request("Launch", Some(Uuid::new_v4()))).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert_eq!(tasks.create(request("Launch", None)).await.unwrap_err().status_code(), 400);
        assert_eq!(tasks.create(request("", Some(project.id))).await.unwrap_err().status_code(), 400);
    }

    #[tokio::test]
    async fn update_changes_fields_but_not_project() {
        let (store, project) = with_project().await;
        let tasks = service(&store);
        let created = tasks.create(request("Launch", Some(project.id))).await.unwrap();

        let mut changes = request("Liftoff", Some(Uuid::new_v4()));
        changes.description = "T minus ten".to_string();
        let updated = tasks.update(created.id, changes).await.unwrap();
        assert_eq!(updated.task.name, "Liftoff");
        assert_eq!(updated.task.description, "T minus ten");
        assert_eq!(updated.project.id, project.id);

        let err = tasks.update(Uuid::new_v4(), request("Ghost", None)).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn assign_records_assignee_and_assigner() {
        let (store, project) = with_project().await;
        let assigner = store.find_user_by_username("test").await.unwrap().unwrap();
        let resource = fixtures::resource("dev@example.com", "Grace", "Hopper");
        store.add_resource(&resource).await;
        let tasks = service(&store);
        let created = tasks.create(request("Launch", Some(project.id))).await.unwrap();

        let principal = Principal::from(&assigner);
        let assigned = tasks
            .assign(&principal, TaskAssignment { task_id: created.id, resource_id: resource.id })
            .await
            .unwrap();
        assert_eq!(assigned.assignee.unwrap().email, "dev@example.com");
        assert_eq!(assigned.assigner.unwrap().username, "test");

        let ghost = Principal { auth_user_id: Uuid::new_v4(), auth_user_role: "admin".into() };
        let err = tasks
            .assign(&ghost, TaskAssignment { task_id: created.id, resource_id: resource.id })
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn delete_and_search() {
        let (store, project) = with_project().await;
        let tasks = service(&store);
        let created = tasks.create(request("Launch", Some(project.id))).await.unwrap();
        tasks.create(request("Splashdown", Some(project.id))).await.unwrap();

        let params: SearchParams = [("project.name".to_string(), "Apollo".to_string())].into();
        assert_eq!(tasks.search(&params).await.unwrap().len(), 2);

        let params: SearchParams = [("name".to_string(), "Launch".to_string())].into();
        assert_eq!(tasks.search(&params).await.unwrap()[0].task.id, created.id);

        tasks.delete(created.id).await.unwrap();
        assert_eq!(tasks.delete(created.id).await.unwrap_err().status_code(), 404);
        assert_eq!(tasks.search(&params).await.unwrap_err().status_code(), 404);
    }
}

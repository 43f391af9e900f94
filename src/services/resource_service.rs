use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use super::{non_empty, not_found, search_query, SearchParams};
use crate::api::validate::{is_plausible_email, FieldErrors};
use crate::api::{
    NewResourceRequest, ProjectResponse, RecordCreationResponse, ResourceResponse, ResourceResponseDetailed,
    TaskResponseWithProject,
};
use crate::database::models::Resource;
use crate::database::store::{ProjectStore, ResourceStore, TaskStore};
use crate::error::ApiError;
use crate::search::EntitySearcher;

const EMAIL_TAKEN: &str = "That email address is already associated with another resource";

#[derive(Clone)]
pub struct ResourceService {
    resources: Arc<dyn ResourceStore>,
    projects: Arc<dyn ProjectStore>,
    tasks: Arc<dyn TaskStore>,
    searcher: EntitySearcher,
}

fn validate(request: &NewResourceRequest) -> Result<(), ApiError> {
    FieldErrors::new()
        .required("email", &request.email)
        .check("email", is_plausible_email(&request.email), "Must be a valid email address")
        .required("firstName", &request.first_name)
        .required("lastName", &request.last_name)
        .into_result()
}

impl ResourceService {
    pub fn new(
        resources: Arc<dyn ResourceStore>,
        projects: Arc<dyn ProjectStore>,
        tasks: Arc<dyn TaskStore>,
        searcher: EntitySearcher,
    ) -> Self {
        Self { resources, projects, tasks, searcher }
    }

    pub async fn find_all(&self) -> Result<Vec<ResourceResponse>, ApiError> {
        debug!("Listing resources");
        let resources = self.resources.list_resources().await?;
        Ok(resources.iter().map(ResourceResponse::from).collect())
    }

    pub async fn find_one(&self, id: Uuid) -> Result<ResourceResponseDetailed, ApiError> {
        debug!("Fetching resource {}", id);
        let resource = self.resources.get_resource(id).await?.ok_or_else(|| not_found("Resource", id))?;
        let projects = self.projects.projects_owned_by(id).await?;
        let tasks = self.tasks.tasks_assigned_to(id).await?;

        Ok(ResourceResponseDetailed {
            resource: ResourceResponse::from(&resource),
            projects: projects.iter().map(ProjectResponse::from).collect(),
            assigned_tasks: tasks.iter().map(TaskResponseWithProject::from).collect(),
        })
    }

    pub async fn search(&self, params: &SearchParams) -> Result<Vec<ResourceResponse>, ApiError> {
        debug!("Searching resources by {:?}", params.keys().collect::<Vec<_>>());
        let resources = match search_query::<Resource>(&self.searcher, params)? {
            None => return self.find_all().await,
            Some(query) => self.resources.search_resources(&query).await?,
        };
        Ok(non_empty(resources, "resource")?.iter().map(ResourceResponse::from).collect())
    }

    pub async fn create(&self, request: NewResourceRequest) -> Result<RecordCreationResponse, ApiError> {
        validate(&request)?;
        if self.resources.find_resource_by_email(&request.email).await?.is_some() {
            return Err(ApiError::conflict(EMAIL_TAKEN));
        }

        let id = Uuid::new_v4();
        self.resources
            .insert_resource(Resource {
                id,
                email: request.email,
                first_name: request.first_name,
                last_name: request.last_name,
            })
            .await?;

        info!("Created resource {}", id);
        Ok(RecordCreationResponse { id })
    }

    pub async fn update(&self, id: Uuid, request: NewResourceRequest) -> Result<ResourceResponse, ApiError> {
        validate(&request)?;
        if self.resources.get_resource(id).await?.is_none() {
            return Err(not_found("Resource", id));
        }
        if let Some(other) = self.resources.find_resource_by_email(&request.email).await? {
            if other.id != id {
                return Err(ApiError::conflict(EMAIL_TAKEN));
            }
        }

        let updated = Resource {
            id,
            email: request.email,
            first_name: request.first_name,
            last_name: request.last_name,
        };
        if !self.resources.update_resource(updated.clone()).await? {
            return Err(not_found("Resource", id));
        }

        info!("Updated resource {}", id);
        Ok(ResourceResponse::from(&updated))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        if !self.resources.delete_resource(id).await? {
            return Err(not_found("Resource", id));
        }
        info!("Deleted resource {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, MemoryStore};

    fn service(store: &Arc<MemoryStore>) -> ResourceService {
        ResourceService::new(store.clone(), store.clone(), store.clone(), EntitySearcher::new(10))
    }

    fn request(email: &str) -> NewResourceRequest {
        NewResourceRequest {
            email: email.to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
        }
    }

    #[tokio::test]
    async fn create_rejects_duplicates_and_bad_emails() {
        let store = Arc::new(MemoryStore::new());
        let resources = service(&store);

        resources.create(request("ada@example.com")).await.unwrap();
        let err = resources.create(request("ada@example.com")).await.unwrap_err();
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.message(), EMAIL_TAKEN);

        assert_eq!(resources.create(request("not-an-email")).await.unwrap_err().status_code(), 400);
    }

    #[tokio::test]
    async fn detailed_view_lists_owned_projects_and_assigned_tasks() {
        let store = Arc::new(MemoryStore::new());
        let lead = fixtures::resource("lead@example.com", "Ada", "Lovelace");
        let project = fixtures::project("Apollo", Some(lead.clone()));
        let task = fixtures::task("Launch", &project, Some(lead.clone()));
        store.add_project(&project).await;
        store.add_task(&task).await;

        let detailed = service(&store).find_one(lead.id).await.unwrap();
        assert_eq!(detailed.projects.len(), 1);
        assert_eq!(detailed.assigned_tasks[0].project.name, "Apollo");
    }

    #[tokio::test]
    async fn update_checks_existence_and_email_ownership() {
        let store = Arc::new(MemoryStore::new());
        let resources = service(&store);
        let first = resources.create(request("first@example.com")).await.unwrap();
        resources.create(request("second@example.com")).await.unwrap();

        let err = resources.update(first.id, request("second@example.com")).await.unwrap_err();
        assert_eq!(err.status_code(), 409);

        let updated = resources.update(first.id, request("first@example.com")).await.unwrap();
        assert_eq!(updated.id, first.id);

        let err = resources.update(Uuid::new_v4(), request("third@example.com")).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn delete_releases_projects_and_tasks() {
        let store = Arc::new(MemoryStore::new());
        let lead = fixtures::resource("lead@example.com", "Ada", "Lovelace");
        let project = fixtures::project("Apollo", Some(lead.clone()));
        let task = fixtures::task("Launch", &project, Some(lead.clone()));
        store.add_project(&project).await;
        store.add_task(&task).await;

        let resources = service(&store);
        resources.delete(lead.id).await.unwrap();
        assert_eq!(resources.delete(lead.id).await.unwrap_err().status_code(), 404);

        let project = store.get_project(project.id).await.unwrap().unwrap();
        assert!(project.owner.is_none());
        let task = store.get_task(task.id).await.unwrap().unwrap();
        assert!(task.assignee.is_none());
    }

    #[tokio::test]
    async fn search_by_name() {
        let store = Arc::new(MemoryStore::new());
        store.add_resource(&fixtures::resource("a@example.com", "Ada", "Lovelace")).await;
        store.add_resource(&fixtures::resource("g@example.com", "Grace", "Hopper")).await;

        let params: SearchParams = [("firstName".to_string(), "Grace".to_string())].into();
        let found = service(&store).search(&params).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].email, "g@example.com");
    }
}

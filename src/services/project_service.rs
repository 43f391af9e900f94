use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use super::{non_empty, not_found, search_query, SearchParams};
use crate::api::validate::FieldErrors;
use crate::api::{NewProjectRequest, ProjectAssignment, ProjectResponseDetailed, RecordCreationResponse};
use crate::database::models::{Project, ProjectRow, Task};
use crate::database::store::{ProjectStore, ResourceStore, TaskStore};
use crate::error::ApiError;
use crate::search::EntitySearcher;

pub const PROJECT_NAME_MIN_LENGTH: usize = 3;
const NAME_TAKEN: &str = "A project with that name already exists";

#[derive(Clone)]
pub struct ProjectService {
    projects: Arc<dyn ProjectStore>,
    resources: Arc<dyn ResourceStore>,
    tasks: Arc<dyn TaskStore>,
    searcher: EntitySearcher,
}

impl ProjectService {
    pub fn new(
        projects: Arc<dyn ProjectStore>,
        resources: Arc<dyn ResourceStore>,
        tasks: Arc<dyn TaskStore>,
        searcher: EntitySearcher,
    ) -> Self {
        Self { projects, resources, tasks, searcher }
    }

    async fn detailed(&self, project: &Project) -> Result<ProjectResponseDetailed, ApiError> {
        let tasks = self.tasks.tasks_in_projects(&[project.id]).await?;
        Ok(ProjectResponseDetailed::new(project, &tasks))
    }

    /// One task read for the whole page, grouped back onto each project.
    async fn detailed_all(&self, projects: Vec<Project>) -> Result<Vec<ProjectResponseDetailed>, ApiError> {
        let ids: Vec<Uuid> = projects.iter().map(|p| p.id).collect();
        let mut by_project: HashMap<Uuid, Vec<Task>> = HashMap::new();
        for task in self.tasks.tasks_in_projects(&ids).await? {
            by_project.entry(task.project.id).or_default().push(task);
        }

        Ok(projects
            .iter()
            .map(|p| ProjectResponseDetailed::new(p, by_project.get(&p.id).map_or(&[][..], Vec::as_slice)))
            .collect())
    }

    pub async fn find_all(&self) -> Result<Vec<ProjectResponseDetailed>, ApiError> {
        debug!("Listing projects");
        let projects = self.projects.list_projects().await?;
        self.detailed_all(projects).await
    }

    pub async fn find_one(&self, id: Uuid) -> Result<ProjectResponseDetailed, ApiError> {
        debug!("Fetching project {}", id);
        let project = self.projects.get_project(id).await?.ok_or_else(|| not_found("Project", id))?;
        self.detailed(&project).await
    }

    pub async fn search(&self, params: &SearchParams) -> Result<Vec<ProjectResponseDetailed>, ApiError> {
        debug!("Searching projects by {:?}", params.keys().collect::<Vec<_>>());
        let projects = match search_query::<Project>(&self.searcher, params)? {
            None => return self.find_all().await,
            Some(query) => self.projects.search_projects(&query).await?,
        };
        self.detailed_all(non_empty(projects, "project")?).await
    }

    pub async fn create(&self, request: NewProjectRequest) -> Result<RecordCreationResponse, ApiError> {
        let (start_date, end_date) = validate(&request)?;
        if self.projects.find_project_by_name(&request.name).await?.is_some() {
            return Err(ApiError::conflict(NAME_TAKEN));
        }

        let id = Uuid::new_v4();
        self.projects
            .insert_project(ProjectRow { id, name: request.name, start_date, end_date, owner: None })
            .await?;

        info!("Created project {}", id);
        Ok(RecordCreationResponse { id })
    }

    pub async fn update(&self, id: Uuid, request: NewProjectRequest) -> Result<ProjectResponseDetailed, ApiError> {
        let (start_date, end_date) = validate(&request)?;
        let existing = self.projects.get_project(id).await?.ok_or_else(|| not_found("Project", id))?;
        if let Some(other) = self.projects.find_project_by_name(&request.name).await? {
            if other.id != id {
                return Err(ApiError::conflict(NAME_TAKEN));
            }
        }

        let row = ProjectRow {
            id,
            name: request.name,
            start_date,
            end_date,
            owner: existing.owner.as_ref().map(|o| o.id),
        };
        if !self.projects.update_project(row).await? {
            return Err(not_found("Project", id));
        }

        info!("Updated project {}", id);
        self.find_one(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        if !self.projects.delete_project(id).await? {
            return Err(not_found("Project", id));
        }
        info!("Deleted project {} and its tasks", id);
        Ok(())
    }

    pub async fn assign_owner(&self, assignment: ProjectAssignment) -> Result<ProjectResponseDetailed, ApiError> {
        let ProjectAssignment { project_id, resource_id } = assignment;
        if self.projects.get_project(project_id).await?.is_none() {
            return Err(not_found("Project", project_id));
        }
        if self.resources.get_resource(resource_id).await?.is_none() {
            return Err(not_found("Resource", resource_id));
        }

        if !self.projects.set_project_owner(project_id, resource_id).await? {
            return Err(not_found("Project", project_id));
        }

        info!("Resource {} now owns project {}", resource_id, project_id);
        self.find_one(project_id).await
    }
}

fn validate(request: &NewProjectRequest) -> Result<(chrono::NaiveDate, chrono::NaiveDate), ApiError> {
    FieldErrors::new()
        .min_length("name", request.name.trim(), PROJECT_NAME_MIN_LENGTH)
        .required_date("startDate", request.start_date)
        .required_date("endDate", request.end_date)
        .date_order(request.start_date, request.end_date)
        .into_result()?;

    match (request.start_date, request.end_date) {
        (Some(start), Some(end)) => Ok((start, end)),
        _ => Err(ApiError::bad_request("Project dates are required")),
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::resources::ResourceResponse;
use super::tasks::TaskResponseWithResource;
use crate::database::models::{Project, Task};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub id: Uuid,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl From<&Project> for ProjectResponse {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id,
            name: project.name.clone(),
            start_date: project.start_date,
            end_date: project.end_date,
        }
    }
}

/// A project with its owner and tasks; tasks do not repeat the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponseDetailed {
    #[serde(flatten)]
    pub project: ProjectResponse,
    pub owner: Option<ResourceResponse>,
    pub tasks: Vec<TaskResponseWithResource>,
}

impl ProjectResponseDetailed {
    pub fn new(project: &Project, tasks: &[Task]) -> Self {
        Self {
            project: ProjectResponse::from(project),
            owner: project.owner.as_ref().map(ResourceResponse::from),
            tasks: tasks.iter().map(TaskResponseWithResource::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewProjectRequest {
    pub name: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectAssignment {
    pub project_id: Uuid,
    pub resource_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[test]
    fn detailed_project_flattens_and_nests_one_level() {
        let owner = fixtures::resource("lead@example.com", "Ada", "Lovelace");
        let project = fixtures::project("Apollo", Some(owner.clone()));
        let task = fixtures::task("Launch", &project, Some(owner));

        let body = serde_json::to_value(ProjectResponseDetailed::new(&project, &[task])).unwrap();
        assert_eq!(body["name"], "Apollo");
        assert_eq!(body["owner"]["email"], "lead@example.com");
        assert_eq!(body["tasks"][0]["name"], "Launch");
        assert_eq!(body["tasks"][0]["assignee"]["firstName"], "Ada");
        assert!(body["tasks"][0].get("project").is_none());
    }
}

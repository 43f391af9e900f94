use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::project::{Project, PROJECT_FIELDS};
use super::resource::{Resource, RESOURCE_FIELDS};
use super::user::{User, USER_FIELDS};
use crate::database::repository::Entity;
use crate::filter::SqlParam;
use crate::search::{FieldKind, FieldValues, Relation, SearchField, Searchable};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TaskRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub assigned_to: Option<Uuid>,
    pub assigned_by: Option<Uuid>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub project: Uuid,
    pub created_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub assignee: Option<Resource>,
    pub assigner: Option<User>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub project: Project,
    pub created_date: NaiveDate,
}

pub const TASK_FIELDS: &[SearchField] = &[
    SearchField { key: "id", column: "id", kind: FieldKind::Uuid },
    SearchField { key: "name", column: "name", kind: FieldKind::Text },
    SearchField { key: "description", column: "description", kind: FieldKind::Text },
    SearchField { key: "startDate", column: "start_date", kind: FieldKind::Date },
    SearchField { key: "endDate", column: "end_date", kind: FieldKind::Date },
    SearchField { key: "createdDate", column: "created_date", kind: FieldKind::Date },
];

const TASK_RELATIONS: &[Relation] = &[
    Relation { key: "assignee", column: "assigned_to", entity: "Resource", table: "resources", fields: RESOURCE_FIELDS },
    Relation { key: "assigner", column: "assigned_by", entity: "User", table: "users", fields: USER_FIELDS },
    Relation { key: "project", column: "project", entity: "Project", table: "projects", fields: PROJECT_FIELDS },
];

impl FieldValues for Task {
    fn field_value(&self, key: &str) -> Option<SqlParam> {
        match key {
            "id" => Some(SqlParam::Uuid(self.id)),
            "name" => Some(SqlParam::Text(self.name.clone())),
            "description" => Some(SqlParam::Text(self.description.clone())),
            "startDate" => Some(SqlParam::Date(self.start_date)),
            "endDate" => Some(SqlParam::Date(self.end_date)),
            "createdDate" => Some(SqlParam::Date(self.created_date)),
            _ => None,
        }
    }
}

impl Searchable for Task {
    const ENTITY: &'static str = "Task";
    const TABLE: &'static str = "tasks";

    fn fields() -> &'static [SearchField] {
        TASK_FIELDS
    }

    fn relations() -> &'static [Relation] {
        TASK_RELATIONS
    }

    fn related(&self, key: &str) -> Option<&dyn FieldValues> {
        match key {
            "assignee" => self.assignee.as_ref().map(|r| r as &dyn FieldValues),
            "assigner" => self.assigner.as_ref().map(|u| u as &dyn FieldValues),
            "project" => Some(&self.project),
            _ => None,
        }
    }
}

impl Entity for TaskRow {
    const TABLE: &'static str = "tasks";
    const DEFAULT_ORDER: &'static str = "start_date, name, id";
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::resource::{Resource, RESOURCE_FIELDS};
use crate::database::repository::Entity;
use crate::filter::SqlParam;
use crate::search::{FieldKind, FieldValues, Relation, SearchField, Searchable};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProjectRow {
    pub id: Uuid,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub owner: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub owner: Option<Resource>,
}

impl Project {
    pub fn from_row(row: ProjectRow, owner: Option<Resource>) -> Self {
        Self {
            id: row.id,
            name: row.name,
            start_date: row.start_date,
            end_date: row.end_date,
            owner,
        }
    }
}

pub const PROJECT_FIELDS: &[SearchField] = &[
    SearchField { key: "id", column: "id", kind: FieldKind::Uuid },
    SearchField { key: "name", column: "name", kind: FieldKind::Text },
    SearchField { key: "startDate", column: "start_date", kind: FieldKind::Date },
    SearchField { key: "endDate", column: "end_date", kind: FieldKind::Date },
];

const PROJECT_RELATIONS: &[Relation] = &[Relation {
    key: "owner",
    column: "owner",
    entity: "Resource",
    table: "resources",
    fields: RESOURCE_FIELDS,
}];

impl FieldValues for Project {
    fn field_value(&self, key: &str) -> Option<SqlParam> {
        match key {
            "id" => Some(SqlParam::Uuid(self.id)),
            "name" => Some(SqlParam::Text(self.name.clone())),
            "startDate" => Some(SqlParam::Date(self.start_date)),
            "endDate" => Some(SqlParam::Date(self.end_date)),
            _ => None,
        }
    }
}

impl Searchable for Project {
    const ENTITY: &'static str = "Project";
    const TABLE: &'static str = "projects";

    fn fields() -> &'static [SearchField] {
        PROJECT_FIELDS
    }

    fn relations() -> &'static [Relation] {
        PROJECT_RELATIONS
    }

    fn related(&self, key: &str) -> Option<&dyn FieldValues> {
        match key {
            "owner" => self.owner.as_ref().map(|o| o as &dyn FieldValues),
            _ => None,
        }
    }
}

impl Entity for ProjectRow {
    const TABLE: &'static str = "projects";
    const DEFAULT_ORDER: &'static str = "start_date, name";
}

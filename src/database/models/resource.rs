use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::repository::Entity;
use crate::filter::SqlParam;
use crate::search::{FieldKind, FieldValues, SearchField, Searchable};

/// A person who can own projects and be assigned tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Resource {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

pub const RESOURCE_FIELDS: &[SearchField] = &[
    SearchField { key: "id", column: "id", kind: FieldKind::Uuid },
    SearchField { key: "email", column: "email", kind: FieldKind::Text },
    SearchField { key: "firstName", column: "first_name", kind: FieldKind::Text },
    SearchField { key: "lastName", column: "last_name", kind: FieldKind::Text },
];

impl FieldValues for Resource {
    fn field_value(&self, key: &str) -> Option<SqlParam> {
        match key {
            "id" => Some(SqlParam::Uuid(self.id)),
            "email" => Some(SqlParam::Text(self.email.clone())),
            "firstName" => Some(SqlParam::Text(self.first_name.clone())),
            "lastName" => Some(SqlParam::Text(self.last_name.clone())),
            _ => None,
        }
    }
}

impl Searchable for Resource {
    const ENTITY: &'static str = "Resource";
    const TABLE: &'static str = "resources";

    fn fields() -> &'static [SearchField] {
        RESOURCE_FIELDS
    }
}

impl Entity for Resource {
    const TABLE: &'static str = "resources";
    const DEFAULT_ORDER: &'static str = "last_name, first_name, id";
}

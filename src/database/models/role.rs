use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::repository::Entity;
use crate::filter::SqlParam;
use crate::search::{FieldKind, FieldValues, SearchField, Searchable};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserRole {
    pub id: i32,
    pub role_name: String,
    pub priority: i32,
}

pub const ROLE_FIELDS: &[SearchField] = &[
    SearchField { key: "id", column: "id", kind: FieldKind::Integer },
    SearchField { key: "roleName", column: "role_name", kind: FieldKind::Text },
    SearchField { key: "priority", column: "priority", kind: FieldKind::Integer },
];

impl FieldValues for UserRole {
    fn field_value(&self, key: &str) -> Option<SqlParam> {
        match key {
            "id" => Some(SqlParam::Int(self.id.into())),
            "roleName" => Some(SqlParam::Text(self.role_name.clone())),
            "priority" => Some(SqlParam::Int(self.priority.into())),
            _ => None,
        }
    }
}

impl Searchable for UserRole {
    const ENTITY: &'static str = "UserRole";
    const TABLE: &'static str = "user_roles";

    fn fields() -> &'static [SearchField] {
        ROLE_FIELDS
    }
}

impl Entity for UserRole {
    const TABLE: &'static str = "user_roles";
    const DEFAULT_ORDER: &'static str = "priority, id";
}

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::{UserRole, ROLE_FIELDS};
use crate::database::repository::Entity;
use crate::filter::SqlParam;
use crate::search::{FieldKind, FieldValues, Relation, SearchField, Searchable};

/// `users` row as stored; `role` references `user_roles.id`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub role: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// bcrypt hash, never the plain password
    pub password_hash: String,
    pub role: UserRole,
}

impl User {
    pub fn from_row(row: UserRow, role: UserRole) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            password_hash: row.password,
            role,
        }
    }
}

pub const USER_FIELDS: &[SearchField] = &[
    SearchField { key: "id", column: "id", kind: FieldKind::Uuid },
    SearchField { key: "username", column: "username", kind: FieldKind::Text },
    SearchField { key: "email", column: "email", kind: FieldKind::Text },
    SearchField { key: "firstName", column: "first_name", kind: FieldKind::Text },
    SearchField { key: "lastName", column: "last_name", kind: FieldKind::Text },
];

const USER_RELATIONS: &[Relation] = &[Relation {
    key: "role",
    column: "role",
    entity: "UserRole",
    table: "user_roles",
    fields: ROLE_FIELDS,
}];

impl FieldValues for User {
    fn field_value(&self, key: &str) -> Option<SqlParam> {
        match key {
            "id" => Some(SqlParam::Uuid(self.id)),
            "username" => Some(SqlParam::Text(self.username.clone())),
            "email" => Some(SqlParam::Text(self.email.clone())),
            "firstName" => Some(SqlParam::Text(self.first_name.clone())),
            "lastName" => Some(SqlParam::Text(self.last_name.clone())),
            _ => None,
        }
    }
}

impl Searchable for User {
    const ENTITY: &'static str = "User";
    const TABLE: &'static str = "users";

    fn fields() -> &'static [SearchField] {
        USER_FIELDS
    }

    fn relations() -> &'static [Relation] {
        USER_RELATIONS
    }

    fn related(&self, key: &str) -> Option<&dyn FieldValues> {
        match key {
            "role" => Some(&self.role),
            _ => None,
        }
    }
}

impl Entity for UserRow {
    const TABLE: &'static str = "users";
    const DEFAULT_ORDER: &'static str = "username";
}

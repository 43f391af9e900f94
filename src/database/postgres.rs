use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::hydrate::{self, related_ids};
use super::manager::{DatabaseError, DatabaseManager};
use super::models::{Project, ProjectRow, Resource, Task, TaskRow, User, UserRole, UserRow};
use super::repository::Repository;
use super::store::{HealthCheck, ProjectStore, ResourceStore, TaskChanges, TaskStore, UserStore};
use crate::filter::{FilterData, FilterWhereInfo, SqlParam};
use crate::search::SearchQuery;

/// PostgreSQL implementation of every store trait.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

fn by_id(id: Uuid) -> FilterData {
    FilterData::conditions(vec![FilterWhereInfo::eq("id", SqlParam::Uuid(id))])
}

fn by_column(column: &str, value: impl Into<SqlParam>) -> FilterData {
    FilterData::conditions(vec![FilterWhereInfo::eq(column, value.into())])
}

fn by_ids(ids: Vec<Uuid>) -> FilterData {
    FilterData::conditions(vec![FilterWhereInfo::in_list("id", ids.into_iter().map(SqlParam::Uuid).collect())])
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn repo<T: super::repository::Entity>(&self) -> Repository<T> {
        Repository::new(self.pool.clone())
    }

    async fn load_users(&self, filter: FilterData) -> Result<Vec<User>, DatabaseError> {
        let rows = self.repo::<UserRow>().select_any(filter).await?;
        let roles = self
            .repo::<UserRole>()
            .select_ids(related_ids(&rows, |r| Some(r.role)))
            .await?;
        Ok(hydrate::users(rows, &roles))
    }

    async fn load_projects(&self, filter: FilterData) -> Result<Vec<Project>, DatabaseError> {
        let rows = self.repo::<ProjectRow>().select_any(filter).await?;
        let owners = self
            .repo::<Resource>()
            .select_ids(related_ids(&rows, |r| r.owner))
            .await?;
        Ok(hydrate::projects(rows, &owners))
    }

    async fn load_tasks(&self, filter: FilterData) -> Result<Vec<Task>, DatabaseError> {
        let rows = self.repo::<TaskRow>().select_any(filter).await?;
        if rows.is_empty() {
            return Ok(vec![]);
        }

        let resources = self
            .repo::<Resource>()
            .select_ids(related_ids(&rows, |r| r.assigned_to))
            .await?;

        let assigner_ids = related_ids(&rows, |r| r.assigned_by);
        let users = if assigner_ids.is_empty() {
            vec![]
        } else {
            self.load_users(by_ids(assigner_ids)).await?
        };

        let projects = self
            .load_projects(by_ids(related_ids(&rows, |r| Some(r.project))))
            .await?;

        Ok(hydrate::tasks(rows, &resources, &users, &projects))
    }

    async fn execute(&self, query: sqlx::query::Query<'_, sqlx::Postgres, sqlx::postgres::PgArguments>) -> Result<bool, DatabaseError> {
        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        self.load_users(FilterData::default()).await
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        Ok(self.load_users(by_id(id)).await?.into_iter().next())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        Ok(self.load_users(by_column("username", username.to_string())).await?.into_iter().next())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        Ok(self.load_users(by_column("email", email.to_string())).await?.into_iter().next())
    }

    async fn search_users(&self, query: &SearchQuery) -> Result<Vec<User>, DatabaseError> {
        self.load_users(FilterData::conditions(query.to_filter())).await
    }

    async fn find_role_by_name(&self, role_name: &str) -> Result<Option<UserRole>, DatabaseError> {
        self.repo::<UserRole>()
            .select_one(by_column("role_name", role_name.to_string()))
            .await
    }

    async fn insert_user(&self, row: UserRow) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO users (id, username, email, first_name, last_name, password, role) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(row.id)
        .bind(row.username)
        .bind(row.email)
        .bind(row.first_name)
        .bind(row.last_name)
        .bind(row.password)
        .bind(row.role)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl ResourceStore for PgStore {
    async fn list_resources(&self) -> Result<Vec<Resource>, DatabaseError> {
        self.repo::<Resource>().select_any(FilterData::default()).await
    }

    async fn get_resource(&self, id: Uuid) -> Result<Option<Resource>, DatabaseError> {
        self.repo::<Resource>().select_one(by_id(id)).await
    }

    async fn find_resource_by_email(&self, email: &str) -> Result<Option<Resource>, DatabaseError> {
        self.repo::<Resource>()
            .select_one(by_column("email", email.to_string()))
            .await
    }

    async fn search_resources(&self, query: &SearchQuery) -> Result<Vec<Resource>, DatabaseError> {
        self.repo::<Resource>()
            .select_any(FilterData::conditions(query.to_filter()))
            .await
    }

    async fn insert_resource(&self, resource: Resource) -> Result<(), DatabaseError> {
        sqlx::query("INSERT INTO resources (id, email, first_name, last_name) VALUES ($1, $2, $3, $4)")
            .bind(resource.id)
            .bind(resource.email)
            .bind(resource.first_name)
            .bind(resource.last_name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_resource(&self, resource: Resource) -> Result<bool, DatabaseError> {
        self.execute(
            sqlx::query("UPDATE resources SET email = $2, first_name = $3, last_name = $4 WHERE id = $1")
                .bind(resource.id)
                .bind(resource.email)
                .bind(resource.first_name)
                .bind(resource.last_name),
        )
        .await
    }

    async fn delete_resource(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.execute(sqlx::query("DELETE FROM resources WHERE id = $1").bind(id)).await
    }
}

#[async_trait]
impl ProjectStore for PgStore {
    async fn list_projects(&self) -> Result<Vec<Project>, DatabaseError> {
        self.load_projects(FilterData::default()).await
    }

    async fn get_project(&self, id: Uuid) -> Result<Option<Project>, DatabaseError> {
        Ok(self.load_projects(by_id(id)).await?.into_iter().next())
    }

    async fn find_project_by_name(&self, name: &str) -> Result<Option<Project>, DatabaseError> {
        Ok(self.load_projects(by_column("name", name.to_string())).await?.into_iter().next())
    }

    async fn search_projects(&self, query: &SearchQuery) -> Result<Vec<Project>, DatabaseError> {
        self.load_projects(FilterData::conditions(query.to_filter())).await
    }

    async fn projects_owned_by(&self, resource_id: Uuid) -> Result<Vec<Project>, DatabaseError> {
        self.load_projects(by_column("owner", resource_id)).await
    }

    async fn insert_project(&self, row: ProjectRow) -> Result<(), DatabaseError> {
        sqlx::query("INSERT INTO projects (id, name, start_date, end_date, owner) VALUES ($1, $2, $3, $4, $5)")
            .bind(row.id)
            .bind(row.name)
            .bind(row.start_date)
            .bind(row.end_date)
            .bind(row.owner)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_project(&self, row: ProjectRow) -> Result<bool, DatabaseError> {
        self.execute(
            sqlx::query("UPDATE projects SET name = $2, start_date = $3, end_date = $4 WHERE id = $1")
                .bind(row.id)
                .bind(row.name)
                .bind(row.start_date)
                .bind(row.end_date),
        )
        .await
    }

    async fn set_project_owner(&self, project_id: Uuid, resource_id: Uuid) -> Result<bool, DatabaseError> {
        self.execute(
            sqlx::query("UPDATE projects SET owner = $2 WHERE id = $1")
                .bind(project_id)
                .bind(resource_id),
        )
        .await
    }

    async fn delete_project(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.execute(sqlx::query("DELETE FROM projects WHERE id = $1").bind(id)).await
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn list_tasks(&self) -> Result<Vec<Task>, DatabaseError> {
        self.load_tasks(FilterData::default()).await
    }

    async fn get_task(&self, id: Uuid) -> Result<Option<Task>, DatabaseError> {
        Ok(self.load_tasks(by_id(id)).await?.into_iter().next())
    }

    async fn search_tasks(&self, query: &SearchQuery) -> Result<Vec<Task>, DatabaseError> {
        self.load_tasks(FilterData::conditions(query.to_filter())).await
    }

    async fn tasks_in_projects(&self, project_ids: &[Uuid]) -> Result<Vec<Task>, DatabaseError> {
        if project_ids.is_empty() {
            return Ok(vec![]);
        }
        let ids = project_ids.iter().copied().map(SqlParam::Uuid).collect();
        self.load_tasks(FilterData::conditions(vec![FilterWhereInfo::in_list("project", ids)]))
            .await
    }

    async fn tasks_assigned_to(&self, resource_id: Uuid) -> Result<Vec<Task>, DatabaseError> {
        self.load_tasks(by_column("assigned_to", resource_id)).await
    }

    async fn insert_task(&self, row: TaskRow) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO tasks (id, name, description, assigned_to, assigned_by, start_date, end_date, project, created_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(row.id)
        .bind(row.name)
        .bind(row.description)
        .bind(row.assigned_to)
        .bind(row.assigned_by)
        .bind(row.start_date)
        .bind(row.end_date)
        .bind(row.project)
        .bind(row.created_date)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_task(&self, id: Uuid, changes: TaskChanges) -> Result<bool, DatabaseError> {
        self.execute(
            sqlx::query(
                "UPDATE tasks SET name = $2, description = $3, start_date = $4, end_date = $5 WHERE id = $1",
            )
            .bind(id)
            .bind(changes.name)
            .bind(changes.description)
            .bind(changes.start_date)
            .bind(changes.end_date),
        )
        .await
    }

    async fn assign_task(&self, task_id: Uuid, resource_id: Uuid, user_id: Uuid) -> Result<bool, DatabaseError> {
        self.execute(
            sqlx::query("UPDATE tasks SET assigned_to = $2, assigned_by = $3 WHERE id = $1")
                .bind(task_id)
                .bind(resource_id)
                .bind(user_id),
        )
        .await
    }

    async fn delete_task(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.execute(sqlx::query("DELETE FROM tasks WHERE id = $1").bind(id)).await
    }
}

#[async_trait]
impl HealthCheck for PgStore {
    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}

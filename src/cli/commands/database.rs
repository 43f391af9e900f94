use serde_json::json;

use crate::cli::utils::{connect, output_success};
use crate::cli::OutputFormat;
use crate::database::manager::MOCK_USER;
use crate::database::models::{ProjectRow, Resource, UserRow};
use crate::database::{DatabaseManager, Repository};
use crate::filter::{FilterData, FilterWhereInfo, SqlParam};

pub async fn migrate(output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = connect().await?;
    DatabaseManager::migrate(&pool).await?;
    output_success(&output_format, "Migrations applied", None)
}

pub async fn seed(output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = connect().await?;
    DatabaseManager::seed_mock_data(&pool).await?;

    let mock_user = Repository::<UserRow>::new(pool.clone())
        .select_404(FilterData::conditions(vec![FilterWhereInfo::eq(
            "username",
            SqlParam::Text(MOCK_USER.username.to_string()),
        )]))
        .await?;
    let users = Repository::<UserRow>::new(pool.clone()).count(FilterData::default()).await?;
    let resources = Repository::<Resource>::new(pool.clone()).count(FilterData::default()).await?;
    let projects = Repository::<ProjectRow>::new(pool).count(FilterData::default()).await?;

    output_success(
        &output_format,
        &format!(
            "Mock data present (user '{}'): {} users, {} resources, {} projects",
            MOCK_USER.username, users, resources, projects
        ),
        Some(json!({
            "username": MOCK_USER.username,
            "userId": mock_user.id,
            "counts": { "users": users, "resources": resources, "projects": projects },
        })),
    )
}

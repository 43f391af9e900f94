use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::DatabaseConfig;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Query error: {0}")]
    QueryError(String),

    /// Unique or foreign key constraint rejected the write
    #[error("{0}")]
    Conflict(String),

    #[error("Database unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => {
                    return DatabaseError::Conflict("Record conflicts with an existing record".to_string())
                }
                Some(FOREIGN_KEY_VIOLATION) => {
                    return DatabaseError::Conflict("Record references a missing or dependent record".to_string())
                }
                _ => {}
            }
        }
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
                DatabaseError::Unavailable(err.to_string())
            }
            sqlx::Error::RowNotFound => DatabaseError::NotFound("Record not found".to_string()),
            other => DatabaseError::Sqlx(other),
        }
    }
}

impl From<crate::filter::FilterError> for DatabaseError {
    fn from(err: crate::filter::FilterError) -> Self {
        DatabaseError::QueryError(err.to_string())
    }
}

/// What happened to one startup step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupStep {
    Skipped,
    Done,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartupReport {
    pub migrations: StartupStep,
    pub mock_data: StartupStep,
}

/// Pool construction, migrations and seeding for the scheduler database
pub struct DatabaseManager;

impl DatabaseManager {
    /// Build the pool without connecting; connections are opened on first use
    /// so the server can come up while the database is still starting.
    pub fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        url::Url::parse(&config.url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect_lazy(&config.url)?;
        Ok(pool)
    }

    pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::migrate!("./migrations").run(pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    /// Run the migrations and seeding `config` asks for. Failures are logged,
    /// not returned, so the server still starts and `/health` reports the outage.
    pub async fn prepare(pool: &PgPool, config: &DatabaseConfig) -> StartupReport {
        let migrations = if !config.run_migrations {
            StartupStep::Skipped
        } else {
            match Self::migrate(pool).await {
                Ok(()) => StartupStep::Done,
                Err(e) => {
                    warn!("Skipping migrations: {}", e);
                    StartupStep::Failed
                }
            }
        };

        // With migrations off the schema is assumed to exist already
        let mock_data = if !config.seed_mock_data {
            StartupStep::Skipped
        } else if migrations == StartupStep::Failed {
            warn!("Skipping mock data: migrations did not apply");
            StartupStep::Skipped
        } else {
            match Self::seed_mock_data(pool).await {
                Ok(()) => StartupStep::Done,
                Err(e) => {
                    warn!("Skipping mock data: {}", e);
                    StartupStep::Failed
                }
            }
        };

        StartupReport { migrations, mock_data }
    }

    /// Insert the development role and user. Safe to run repeatedly.
    pub async fn seed_mock_data(pool: &PgPool) -> Result<(), DatabaseError> {
        let password = crate::auth::password::hash_password(MOCK_USER.password)
            .await
            .map_err(|e| DatabaseError::QueryError(e.to_string()))?;

        let mut tx = pool.begin().await?;

        sqlx::query(
            "INSERT INTO user_roles (id, role_name, priority) VALUES ($1, $2, $3) ON CONFLICT DO NOTHING",
        )
        .bind(MOCK_ROLE.0)
        .bind(MOCK_ROLE.1)
        .bind(MOCK_ROLE.2)
        .execute(&mut *tx)
        .await?;

        let inserted = sqlx::query(
            "INSERT INTO users (id, username, email, first_name, last_name, password, role) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) ON CONFLICT DO NOTHING",
        )
        .bind(uuid::Uuid::new_v4())
        .bind(MOCK_USER.username)
        .bind(MOCK_USER.email)
        .bind(MOCK_USER.first_name)
        .bind(MOCK_USER.last_name)
        .bind(password)
        .bind(MOCK_ROLE.0)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;

        if inserted == 0 {
            warn!("Mock user '{}' already present, skipping", MOCK_USER.username);
        } else {
            info!("Seeded mock user '{}'", MOCK_USER.username);
        }
        Ok(())
    }
}

/// (id, role_name, priority)
pub const MOCK_ROLE: (i32, &str, i32) = (1, "admin", 1);

pub struct MockUser {
    pub username: &'static str,
    pub password: &'static str,
    pub email: &'static str,
    pub first_name: &'static str,
    pub last_name: &'static str,
}

pub const MOCK_USER: MockUser = MockUser {
    username: "test",
    password: "P@ssword1",
    email: "test@test.com",
    first_name: "Urist",
    last_name: "McTester",
};

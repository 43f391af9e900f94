use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::config::config;
use crate::database::DatabaseManager;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                target.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Pool for the configured database, connected eagerly so CLI failures surface at once
pub async fn connect() -> anyhow::Result<sqlx::PgPool> {
    let config = config();
    let pool = DatabaseManager::connect(&config.database)?;
    DatabaseManager::health_check(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Cannot reach {}: {}", config.redacted_database_url(), e))?;
    Ok(pool)
}

use serde_json::json;

use crate::auth::{Principal, TokenService};
use crate::cli::utils::{connect, output_success};
use crate::cli::OutputFormat;
use crate::config::config;
use crate::database::{PgStore, UserStore};

pub async fn issue(username: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let store = PgStore::new(connect().await?);
    let user = store
        .find_user_by_username(username)
        .await?
        .ok_or_else(|| anyhow::anyhow!("No user named '{}'", username))?;

    let tokens = TokenService::from_config(&config().security)?;
    let principal = Principal::from(&user);
    let token = tokens.generate_token(&principal)?;

    match output_format {
        OutputFormat::Json => output_success(
            &output_format,
            "Token issued",
            Some(json!({ "token": token, "principal": principal })),
        ),
        OutputFormat::Text => {
            println!("{}", token);
            Ok(())
        }
    }
}

mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn root_describes_the_service() -> Result<()> {
    let server = common::ensure_server().await?;
    let resp = reqwest::get(server.url("/")).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Project Scheduler API");
    Ok(())
}

#[tokio::test]
async fn health_reports_database_state() -> Result<()> {
    let server = common::ensure_server().await?;
    let resp = reqwest::get(server.url("/health")).await?;
    let status = resp.status();
    assert!(
        status == StatusCode::OK || status == StatusCode::SERVICE_UNAVAILABLE,
        "unexpected status {}",
        status
    );

    let body: Value = resp.json().await?;
    assert!(body["data"]["status"].is_string());
    Ok(())
}

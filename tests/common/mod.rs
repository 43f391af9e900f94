use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{header::AUTHORIZATION, StatusCode};
use serde_json::{json, Value};

static SERVER: OnceLock<TestServer> = OnceLock::new();
static DATABASE_SERVER: OnceLock<TestServer> = OnceLock::new();

pub const TEST_JWT_SECRET: &str = "integration-test-secret";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    #[allow(dead_code)]
    child: Child,
}

impl TestServer {
    fn spawn(database: &[(&str, String)]) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_scheduler-api"));
        cmd.env("PORT", port.to_string())
            .env("APP_ENV", "development")
            .env("JWT_SECRET", TEST_JWT_SECRET)
            .env("DATABASE_CONNECTION_TIMEOUT", "2")
            .envs(database.iter().map(|(k, v)| (*k, v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Server with no usable database: migrations and seeding are off and the pool
/// connects lazily, so only paths that fail before touching storage work.
#[allow(dead_code)]
pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| {
        TestServer::spawn(&[
            ("DATABASE_RUN_MIGRATIONS", "false".to_string()),
            ("DATABASE_SEED_MOCK_DATA", "false".to_string()),
        ])
        .expect("failed to spawn server binary")
    });
    server.wait_ready(Duration::from_secs(15)).await?;
    Ok(server)
}

/// Server against `DATABASE_URL` with migrations and mock data applied.
/// `None` when `DATABASE_URL` is unset, so callers can skip.
#[allow(dead_code)]
pub async fn ensure_database_server() -> Result<Option<&'static TestServer>> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping database-backed test");
        return Ok(None);
    };
    let server = DATABASE_SERVER.get_or_init(|| {
        TestServer::spawn(&[
            ("DATABASE_URL", database_url),
            ("DATABASE_RUN_MIGRATIONS", "true".to_string()),
            ("DATABASE_SEED_MOCK_DATA", "true".to_string()),
        ])
        .expect("failed to spawn server binary")
    });
    // Migrations and seeding finish before the listener binds
    server.wait_ready(Duration::from_secs(30)).await?;
    Ok(Some(server))
}

/// Token for the seeded development user.
#[allow(dead_code)]
pub async fn login(server: &TestServer) -> Result<String> {
    let resp = reqwest::Client::new()
        .post(server.url("/auth"))
        .json(&json!({ "username": "test", "password": "P@ssword1" }))
        .send()
        .await?;
    anyhow::ensure!(resp.status() == StatusCode::OK, "login failed: {}", resp.status());
    let token = resp
        .headers()
        .get(AUTHORIZATION)
        .context("login response carries no token")?
        .to_str()?
        .to_string();
    Ok(token)
}

/// The `data` member of a success envelope.
#[allow(dead_code)]
pub async fn data(resp: reqwest::Response) -> Result<Value> {
    let body: Value = resp.json().await?;
    anyhow::ensure!(body["success"] == true, "unexpected envelope: {}", body);
    Ok(body["data"].clone())
}

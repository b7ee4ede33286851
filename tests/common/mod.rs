#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_todo-api-rust"));
        cmd.env("API_PORT", port.to_string())
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
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                // Ready on any health answer; the database may be absent
                if resp.status() == StatusCode::OK || resp.status() == StatusCode::SERVICE_UNAVAILABLE {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Single-connection pool so session-scoped temp tables stay visible to
/// every query. `None` when `DATABASE_URL` is not set.
pub async fn test_pool() -> Option<PgPool> {
    let _ = dotenvy::dotenv();
    let url = std::env::var("DATABASE_URL").ok()?;
    match PgPoolOptions::new().max_connections(1).connect(&url).await {
        Ok(pool) => Some(pool),
        Err(e) => {
            eprintln!("skipping: cannot connect to DATABASE_URL: {e}");
            None
        }
    }
}

/// Ids whose uuid order matches their numeric order.
pub fn id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

/// Temp `todos` table shadowing any real one for this session, seeded with
/// ids 1..=count. Even ids are "done", odd ids "open".
pub async fn seed_todos(pool: &PgPool, count: u128) -> Result<()> {
    sqlx::query(
        "CREATE TEMP TABLE todos (
            id uuid PRIMARY KEY,
            list_id uuid NOT NULL,
            user_id uuid,
            title text NOT NULL,
            status text NOT NULL,
            priority text NOT NULL,
            due_date date,
            created_at timestamptz NOT NULL DEFAULT now(),
            updated_at timestamptz NOT NULL DEFAULT now()
        )",
    )
    .execute(pool)
    .await?;

    for n in 1..=count {
        sqlx::query("INSERT INTO todos (id, list_id, title, status, priority) VALUES ($1, $2, $3, $4, 'normal')")
            .bind(id(n))
            .bind(id(1000))
            .bind(format!("todo {n}"))
            .bind(if n % 2 == 0 { "done" } else { "open" })
            .execute(pool)
            .await?;
    }
    Ok(())
}

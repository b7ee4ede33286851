use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::info;

/// Errors from the store layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Postgres rejected a bound value for its column type (SQLSTATE 22P02),
    /// e.g. a cursor that is not a uuid.
    pub fn is_invalid_input(&self) -> bool {
        match self {
            DatabaseError::Sqlx(sqlx::Error::Database(db)) => db.code().as_deref() == Some("22P02"),
            _ => false,
        }
    }
}

/// Owner of the process-wide connection pool
pub struct DatabaseManager {
    pool: OnceCell<PgPool>,
}

impl DatabaseManager {
    fn instance() -> &'static DatabaseManager {
        use std::sync::OnceLock;
        static INSTANCE: OnceLock<DatabaseManager> = OnceLock::new();
        INSTANCE.get_or_init(|| DatabaseManager { pool: OnceCell::new() })
    }

    /// Shared pool, connected on first use from `DATABASE_URL`
    pub async fn pool() -> Result<PgPool, DatabaseError> {
        let pool = Self::instance().pool.get_or_try_init(Self::connect).await?;
        Ok(pool.clone())
    }

    async fn connect() -> Result<PgPool, DatabaseError> {
        let url = std::env::var("DATABASE_URL").map_err(|_| DatabaseError::ConfigMissing("DATABASE_URL"))?;
        let settings = &crate::config::config().database;

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(Duration::from_secs(settings.connection_timeout))
            .connect(&url)
            .await?;

        info!("Created database pool with {} max connections", settings.max_connections);
        Ok(pool)
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check() -> Result<(), DatabaseError> {
        let pool = Self::pool().await?;
        sqlx::query("SELECT 1").execute(&pool).await?;
        Ok(())
    }

    /// Close the pool if it was ever opened (e.g., on shutdown)
    pub async fn close() {
        if let Some(pool) = Self::instance().pool.get() {
            pool.close().await;
            info!("Closed database pool");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_sqlx_database_errors_count_as_invalid_input() {
        assert!(!DatabaseError::QueryError("syntax".into()).is_invalid_input());
        assert!(!DatabaseError::Sqlx(sqlx::Error::RowNotFound).is_invalid_input());
        assert!(!DatabaseError::NotFound("lists 1".into()).is_invalid_input());
    }

    #[test]
    fn errors_render_their_context() {
        assert_eq!(
            DatabaseError::ConfigMissing("DATABASE_URL").to_string(),
            "Missing configuration: DATABASE_URL"
        );
    }
}

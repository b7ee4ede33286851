use serde::Serialize;
use sqlx::{self, postgres::PgRow, FromRow, PgPool};
use std::time::Instant;
use uuid::Uuid;

use crate::api::page::Page;
use crate::database::manager::DatabaseError;
use crate::database::models::Identifiable;
use crate::database::pagination::PaginationSource;
use crate::database::params;
use crate::filter::{PageDirection, SqlResult};
use crate::query::{Clause, QueryNode, SortOrder};

/// Executes rendered query nodes against one source table.
pub struct Repository<T> {
    table_name: &'static str,
    pool: PgPool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Repository<T>
where
    T: for<'r> FromRow<'r, PgRow> + Identifiable + Send + Unpin + Serialize,
{
    pub fn new(table_name: &'static str, pool: PgPool) -> Self {
        Self {
            table_name,
            pool,
            _phantom: std::marker::PhantomData,
        }
    }

    /// Every row the node selects, in the order the node renders.
    pub async fn select_all(&self, node: &QueryNode) -> Result<Vec<T>, DatabaseError> {
        self.fetch(&node.render()).await
    }

    /// One page plus metadata over the node's full filtered set. The page
    /// query and the pagination aggregate run concurrently.
    ///
    /// Page edges are only meaningful in id order, so a node without an
    /// explicit order (a bare `limit`) is sorted by `direction` here.
    pub async fn select_page(&self, node: &QueryNode, direction: PageDirection) -> Result<Page<T>, DatabaseError> {
        let ordered = node.clauses().iter().any(|c| matches!(c, Clause::OrderBy(_)));
        let page_sql = if ordered {
            node.render()
        } else {
            node.clone().with(Clause::OrderBy(SortOrder::from(direction))).render()
        };
        let filter = node.render_predicate();

        let (rows, info) = futures::try_join!(
            self.fetch(&page_sql),
            self.pool
                .compute_pagination_info(self.table_name, &filter.query, &filter.params),
        )?;

        Ok(Page::assemble(rows, info, direction))
    }

    /// `NotFound` unless a row with `id` exists in this table.
    pub async fn require(&self, id: Uuid) -> Result<(), DatabaseError> {
        let sql = format!("SELECT EXISTS (SELECT 1 FROM {} WHERE id = $1)", self.table_name);
        let exists: bool = sqlx::query_scalar(&sql).bind(id).fetch_one(&self.pool).await?;
        if exists {
            Ok(())
        } else {
            Err(DatabaseError::NotFound(format!("{} {}", self.table_name, id)))
        }
    }

    async fn fetch(&self, sql: &SqlResult) -> Result<Vec<T>, DatabaseError> {
        let settings = &crate::config::config().database;
        if settings.enable_query_logging {
            tracing::debug!("{}: {}", self.table_name, sql.inline());
        }

        let started = Instant::now();
        let rows = params::query_as::<T>(sql).fetch_all(&self.pool).await.map_err(|e| {
            tracing::error!("Query on {} failed: {}", self.table_name, e);
            DatabaseError::from(e)
        })?;

        let elapsed = started.elapsed().as_millis() as u64;
        if elapsed > settings.slow_query_threshold_ms {
            tracing::warn!("Slow query on {} ({} ms): {}", self.table_name, elapsed, sql.query);
        }
        Ok(rows)
    }
}

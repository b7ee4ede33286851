use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::filter::{FilterError, SqlResult};

/// Bounds and size of the full filtered set, ignoring cursor and limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct PaginationInfo {
    pub first_id: Option<Uuid>,
    pub last_id: Option<Uuid>,
    pub total_count: i64,
}

/// Anything that can aggregate pagination bounds for a filtered table.
#[async_trait]
pub trait PaginationSource: Send + Sync {
    /// `Ok(None)` when the filter matches no rows. Store failures propagate
    /// unchanged.
    async fn compute_pagination_info(
        &self,
        source: &str,
        filter: &str,
        params: &[Value],
    ) -> Result<Option<PaginationInfo>, DatabaseError>;
}

#[async_trait]
impl PaginationSource for PgPool {
    async fn compute_pagination_info(
        &self,
        source: &str,
        filter: &str,
        params: &[Value],
    ) -> Result<Option<PaginationInfo>, DatabaseError> {
        let query = pagination_sql(source, filter).map_err(|e| DatabaseError::QueryError(e.to_string()))?;
        let sql = SqlResult { query, params: params.to_vec() };

        let info: PaginationInfo = crate::database::params::query_as(&sql).fetch_one(self).await?;
        tracing::debug!("Pagination for {}: {} rows", source, info.total_count);

        Ok((info.total_count > 0).then_some(info))
    }
}

/// Aggregate over the filtered id set. The filter fragment is inserted after
/// `WHERE` as is; an empty fragment selects everything.
pub fn pagination_sql(source: &str, filter: &str) -> Result<String, FilterError> {
    validate_table_name(source)?;
    let filter = if filter.trim().is_empty() { "TRUE" } else { filter };

    Ok(format!(
        "WITH filtered AS (SELECT id FROM {source} WHERE {filter}) \
         SELECT (SELECT id FROM filtered ORDER BY id ASC LIMIT 1) AS first_id, \
         (SELECT id FROM filtered ORDER BY id DESC LIMIT 1) AS last_id, \
         COUNT(*) AS total_count FROM filtered"
    ))
}

fn validate_table_name(name: &str) -> Result<(), FilterError> {
    let mut chars = name.chars();
    match chars.next() {
        None => Err(FilterError::InvalidTableName("Table name cannot be empty".to_string())),
        Some(first) if !(first.is_ascii_alphabetic() || first == '_') => {
            Err(FilterError::InvalidTableName(format!("Invalid table name format: {}", name)))
        }
        Some(_) if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') => {
            Err(FilterError::InvalidTableName(format!("Invalid table name format: {}", name)))
        }
        Some(_) => Ok(()),
    }
}

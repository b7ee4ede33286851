use axum::extract::Query;
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::Page;
use crate::database::models::TodoList;
use crate::database::{DatabaseError, DatabaseManager, Repository};
use crate::filter::ListFilters;
use crate::middleware::{ApiResponse, ApiResult};
use crate::query::{BaseQuery, ListQueryFactory};

/// GET /api/lists
///
/// `participant_id` selects lists shared with a user and `owner_id` lists
/// they own; how the two combine follows `QUERY_DEFAULT_OWNER_JOIN`.
pub async fn list(Query(filters): Query<ListFilters>) -> ApiResult<Page<TodoList>> {
    let node = ListQueryFactory::global().build_query(BaseQuery::new(ListQueryFactory::BASE_SQL), Some(&filters))?;

    let pool = DatabaseManager::pool().await?;
    let page = Repository::<TodoList>::new(ListQueryFactory::SOURCE_TABLE, pool)
        .select_page(&node, filters.base.direction())
        .await?;
    Ok(ApiResponse::success(page))
}

/// Pool for a route nested under `/api/lists/:id`, once that list exists.
pub(crate) async fn pool_for_list(list_id: Uuid) -> Result<PgPool, DatabaseError> {
    let pool = DatabaseManager::pool().await?;
    Repository::<TodoList>::new(ListQueryFactory::SOURCE_TABLE, pool.clone())
        .require(list_id)
        .await?;
    Ok(pool)
}

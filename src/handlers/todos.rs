use axum::extract::{Path, Query};
use sqlx::PgPool;
use uuid::Uuid;

use super::lists;
use crate::api::Page;
use crate::database::models::Todo;
use crate::database::{DatabaseManager, Repository};
use crate::filter::TodoFilters;
use crate::middleware::{ApiResponse, ApiResult};
use crate::query::{BaseQuery, QueryNode, TodoQueryFactory};

/// GET /api/todos
pub async fn list(Query(filters): Query<TodoFilters>) -> ApiResult<Page<Todo>> {
    let node = TodoQueryFactory::global().build_query(BaseQuery::new(TodoQueryFactory::BASE_SQL), Some(&filters))?;
    page(node, &filters).await
}

/// GET /api/lists/:id/todos
pub async fn list_for_list(Path(list_id): Path<Uuid>, Query(filters): Query<TodoFilters>) -> ApiResult<Page<Todo>> {
    let base = TodoQueryFactory::list_base(&list_id.to_string());
    let node = TodoQueryFactory::global().build_query(base, Some(&filters))?;
    let pool = lists::pool_for_list(list_id).await?;
    page_from(pool, node, &filters).await
}

async fn page(node: QueryNode, filters: &TodoFilters) -> ApiResult<Page<Todo>> {
    let pool = DatabaseManager::pool().await?;
    page_from(pool, node, filters).await
}

async fn page_from(pool: PgPool, node: QueryNode, filters: &TodoFilters) -> ApiResult<Page<Todo>> {
    let page = Repository::<Todo>::new(TodoQueryFactory::SOURCE_TABLE, pool)
        .select_page(&node, filters.base.direction())
        .await?;
    Ok(ApiResponse::success(page))
}

use axum::extract::{Path, Query};
use sqlx::PgPool;
use uuid::Uuid;

use super::lists;
use crate::api::Page;
use crate::database::models::User;
use crate::database::{DatabaseManager, Repository};
use crate::filter::UserFilters;
use crate::middleware::{ApiResponse, ApiResult};
use crate::query::{BaseQuery, QueryNode, UserQueryFactory};

/// GET /api/users
pub async fn list(Query(filters): Query<UserFilters>) -> ApiResult<Page<User>> {
    let node = UserQueryFactory::global().build_query(BaseQuery::new(UserQueryFactory::BASE_SQL), Some(&filters))?;
    page(node, &filters).await
}

/// GET /api/lists/:id/collaborators
pub async fn collaborators(Path(list_id): Path<Uuid>, Query(filters): Query<UserFilters>) -> ApiResult<Page<User>> {
    let base = UserQueryFactory::collaborators_base(&list_id.to_string());
    let node = UserQueryFactory::global().build_query(base, Some(&filters))?;
    let pool = lists::pool_for_list(list_id).await?;
    page_from(pool, node, &filters).await
}

async fn page(node: QueryNode, filters: &UserFilters) -> ApiResult<Page<User>> {
    let pool = DatabaseManager::pool().await?;
    page_from(pool, node, filters).await
}

async fn page_from(pool: PgPool, node: QueryNode, filters: &UserFilters) -> ApiResult<Page<User>> {
    let page = Repository::<User>::new(UserQueryFactory::SOURCE_TABLE, pool)
        .select_page(&node, filters.base.direction())
        .await?;
    Ok(ApiResponse::success(page))
}

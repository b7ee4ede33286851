mod common;

use anyhow::Result;
use serde_json::json;
use todo_api_rust::database::models::Todo;
use todo_api_rust::database::{DatabaseError, PaginationSource, Repository};
use todo_api_rust::error::ApiError;
use todo_api_rust::filter::{FilterMap, TodoFilters};
use todo_api_rust::query::{BaseQuery, DecoratorRegistry, TodoQueryFactory};

use common::id;

fn todo_filters(pairs: &[(&str, &str)]) -> TodoFilters {
    let map: FilterMap = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    TodoFilters::from_filter_map(&map)
}

fn ids(page: &todo_api_rust::api::Page<Todo>) -> Vec<uuid::Uuid> {
    page.items.iter().map(|t| t.id).collect()
}

#[tokio::test]
async fn empty_set_has_no_pagination_info() -> Result<()> {
    let Some(pool) = common::test_pool().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    };
    common::seed_todos(&pool, 3).await?;

    let info = pool
        .compute_pagination_info("todos", "status = $1", &[json!("archived")])
        .await?;
    assert_eq!(info, None);
    Ok(())
}

#[tokio::test]
async fn bounds_cover_the_whole_filtered_set() -> Result<()> {
    let Some(pool) = common::test_pool().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    };
    common::seed_todos(&pool, 3).await?;

    let info = pool.compute_pagination_info("todos", "", &[]).await?.expect("rows exist");
    assert_eq!(info.first_id, Some(id(1)));
    assert_eq!(info.last_id, Some(id(3)));
    assert_eq!(info.total_count, 3);
    Ok(())
}

#[tokio::test]
async fn repeated_pagination_without_writes_is_stable() -> Result<()> {
    let Some(pool) = common::test_pool().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    };
    common::seed_todos(&pool, 6).await?;

    let registry = DecoratorRegistry::default();
    let node = TodoQueryFactory::new(&registry).build_query(
        BaseQuery::new(TodoQueryFactory::BASE_SQL),
        Some(&todo_filters(&[("status", "done"), ("first", "2")])),
    )?;
    let predicate = node.render_predicate();

    let first = pool
        .compute_pagination_info("todos", &predicate.query, &predicate.params)
        .await?;
    let second = pool
        .compute_pagination_info("todos", &predicate.query, &predicate.params)
        .await?;

    assert_eq!(first, second);
    let info = first.expect("done rows exist");
    assert_eq!(info.first_id, Some(id(2)));
    assert_eq!(info.last_id, Some(id(6)));
    assert_eq!(info.total_count, 3);
    Ok(())
}

#[tokio::test]
async fn forward_pages_walk_the_keyset() -> Result<()> {
    let Some(pool) = common::test_pool().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    };
    common::seed_todos(&pool, 5).await?;

    let registry = DecoratorRegistry::default();
    let factory = TodoQueryFactory::new(&registry);
    let repository = Repository::<Todo>::new(TodoQueryFactory::SOURCE_TABLE, pool);

    let filters = todo_filters(&[("first", "2")]);
    let node = factory.build_query(BaseQuery::new(TodoQueryFactory::BASE_SQL), Some(&filters))?;
    let first = repository.select_page(&node, filters.base.direction()).await?;
    assert_eq!(ids(&first), vec![id(1), id(2)]);
    assert!(!first.page_info.has_prev_page);
    assert!(first.page_info.has_next_page);
    assert_eq!(first.page_info.total_count, 5);

    let cursor = first.page_info.end_cursor.expect("page has rows").to_string();
    let filters = todo_filters(&[("first", "2"), ("after", &cursor)]);
    let node = factory.build_query(BaseQuery::new(TodoQueryFactory::BASE_SQL), Some(&filters))?;
    let second = repository.select_page(&node, filters.base.direction()).await?;
    assert_eq!(ids(&second), vec![id(3), id(4)]);
    assert!(second.page_info.has_prev_page);
    assert!(second.page_info.has_next_page);
    assert_eq!(second.page_info.total_count, 5);
    Ok(())
}

#[tokio::test]
async fn backward_pages_come_back_ascending() -> Result<()> {
    let Some(pool) = common::test_pool().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    };
    common::seed_todos(&pool, 5).await?;

    let registry = DecoratorRegistry::default();
    let factory = TodoQueryFactory::new(&registry);
    let repository = Repository::<Todo>::new(TodoQueryFactory::SOURCE_TABLE, pool);

    let filters = todo_filters(&[("last", "2")]);
    let node = factory.build_query(BaseQuery::new(TodoQueryFactory::BASE_SQL), Some(&filters))?;
    let tail = repository.select_page(&node, filters.base.direction()).await?;
    assert_eq!(ids(&tail), vec![id(4), id(5)]);
    assert!(tail.page_info.has_prev_page);
    assert!(!tail.page_info.has_next_page);

    let cursor = id(4).to_string();
    let filters = todo_filters(&[("last", "2"), ("before", &cursor)]);
    let node = factory.build_query(BaseQuery::new(TodoQueryFactory::BASE_SQL), Some(&filters))?;
    let previous = repository.select_page(&node, filters.base.direction()).await?;
    assert_eq!(ids(&previous), vec![id(2), id(3)]);
    Ok(())
}

#[tokio::test]
async fn pagination_ignores_cursor_but_keeps_criteria() -> Result<()> {
    let Some(pool) = common::test_pool().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    };
    common::seed_todos(&pool, 6).await?;

    let registry = DecoratorRegistry::default();
    let filters = todo_filters(&[("status", "done"), ("after", &id(2).to_string()), ("first", "1")]);
    let node = TodoQueryFactory::new(&registry)
        .build_query(BaseQuery::new(TodoQueryFactory::BASE_SQL), Some(&filters))?;
    let page = Repository::<Todo>::new(TodoQueryFactory::SOURCE_TABLE, pool)
        .select_page(&node, filters.base.direction())
        .await?;

    assert_eq!(ids(&page), vec![id(4)]);
    assert_eq!(page.page_info.total_count, 3);
    assert!(page.page_info.has_prev_page);
    assert!(page.page_info.has_next_page);
    Ok(())
}

#[tokio::test]
async fn malformed_cursor_is_invalid_input() -> Result<()> {
    let Some(pool) = common::test_pool().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    };
    common::seed_todos(&pool, 1).await?;

    let registry = DecoratorRegistry::default();
    let filters = todo_filters(&[("after", "not-a-uuid")]);
    let node = TodoQueryFactory::new(&registry)
        .build_query(BaseQuery::new(TodoQueryFactory::BASE_SQL), Some(&filters))?;
    let err = Repository::<Todo>::new(TodoQueryFactory::SOURCE_TABLE, pool)
        .select_all(&node)
        .await
        .unwrap_err();

    assert!(err.is_invalid_input(), "{err}");
    Ok(())
}

#[tokio::test]
async fn missing_parent_row_is_not_found() -> Result<()> {
    let Some(pool) = common::test_pool().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(());
    };
    common::seed_todos(&pool, 2).await?;

    let repo = Repository::<Todo>::new("todos", pool);
    repo.require(id(2)).await?;

    let err = repo.require(id(99)).await.unwrap_err();
    assert!(matches!(err, DatabaseError::NotFound(_)), "{err}");
    assert_eq!(ApiError::from(err).status_code(), 404);
    Ok(())
}

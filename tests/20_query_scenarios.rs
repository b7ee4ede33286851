use serde_json::json;
use todo_api_rust::filter::{FilterError, FilterMap, TodoFilters};
use todo_api_rust::query::{BaseQuery, DecoratorRegistry, TodoQueryFactory};

fn filters(pairs: &[(&str, &str)]) -> FilterMap {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[test]
fn status_filter_starts_the_where_section() {
    let registry = DecoratorRegistry::default();
    let node = registry
        .create_sql_decorator(&filters(&[("status", "done")]), BaseQuery::new("SELECT * FROM todos"))
        .unwrap();
    let sql = node.render();

    assert_eq!(sql.query, "SELECT * FROM todos WHERE status = $1");
    assert_eq!(sql.params, vec![json!("done")]);
    assert_eq!(sql.inline(), "SELECT * FROM todos WHERE status = 'done'");
}

#[test]
fn limit_is_the_final_fragment() {
    let registry = DecoratorRegistry::default();
    let node = registry
        .create_sql_decorator(
            &filters(&[("limit", "5"), ("status", "done")]),
            BaseQuery::new("SELECT * FROM todos"),
        )
        .unwrap();

    assert_eq!(node.render().inline(), "SELECT * FROM todos WHERE status = 'done' LIMIT 5");
}

#[test]
fn base_with_predicate_continues_with_and() {
    let registry = DecoratorRegistry::default();
    let base = BaseQuery::new("SELECT * FROM todos").with_predicate("list_id = $1", vec![json!("l1")]);
    let sql = registry
        .create_sql_decorator(&filters(&[("priority", "high")]), base)
        .unwrap()
        .render();

    assert_eq!(sql.query, "SELECT * FROM todos WHERE list_id = $1 AND priority = $2");
    assert_eq!(sql.query.matches("WHERE").count(), 1);
    assert_eq!(sql.params, vec![json!("l1"), json!("high")]);
}

#[test]
fn unparsable_limit_returns_no_query() {
    let registry = DecoratorRegistry::default();
    let result = registry.create_sql_decorator(&filters(&[("limit", "abc")]), BaseQuery::new("SELECT * FROM todos"));

    let err = result.unwrap_err();
    assert_eq!(err, FilterError::InvalidLimit("abc".into()));
    assert_eq!(err.to_string(), "invalid limit provided abc");
}

#[test]
fn rendering_twice_is_identical() {
    let registry = DecoratorRegistry::default();
    let todo_filters = TodoFilters::from_filter_map(&filters(&[
        ("status", "open"),
        ("overdue", "false"),
        ("before", "c"),
        ("last", "3"),
    ]));
    let node = TodoQueryFactory::new(&registry)
        .build_query(BaseQuery::new(TodoQueryFactory::BASE_SQL), Some(&todo_filters))
        .unwrap();

    assert_eq!(node.render(), node.render());
    assert_eq!(
        node.render().query,
        "SELECT * FROM todos WHERE status = $1 AND (due_date IS NULL OR current_date < due_date) \
         AND id < $2::uuid ORDER BY id DESC LIMIT 3"
    );
}

#[test]
fn where_appears_once_for_every_filter_subset() {
    let registry = DecoratorRegistry::default();
    let all = [
        ("status", "open"),
        ("priority", "high"),
        ("list_id", "l"),
        ("user_id", "u"),
        ("overdue", "true"),
        ("after", "a"),
        ("limit", "4"),
    ];

    for mask in 0u32..(1 << all.len()) {
        let subset: Vec<_> = all
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, pair)| *pair)
            .collect();
        let sql = registry
            .create_sql_decorator(&filters(&subset), BaseQuery::new("SELECT * FROM todos"))
            .unwrap()
            .render()
            .query;

        let restricting = subset.iter().any(|(k, _)| *k != "limit");
        assert_eq!(sql.matches(" WHERE ").count(), usize::from(restricting), "{sql}");
        assert!(!sql.contains("WHERE AND") && !sql.contains("AND AND"), "{sql}");
        if subset.iter().any(|(k, _)| *k == "limit") {
            assert!(sql.ends_with(" LIMIT 4"), "{sql}");
        }
        if let (Some(order), Some(limit)) = (sql.find(" ORDER BY "), sql.find(" LIMIT ")) {
            assert!(order < limit, "{sql}");
        }
    }
}

#[test]
fn missing_filters_fail_fast() {
    let registry = DecoratorRegistry::default();
    let err = TodoQueryFactory::new(&registry)
        .build_sql(BaseQuery::new(TodoQueryFactory::BASE_SQL), None)
        .unwrap_err();
    assert_eq!(err.to_string(), "invalid filters provided");
}

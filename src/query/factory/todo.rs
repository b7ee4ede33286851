use serde_json::Value;

use crate::filter::{keys, FilterError, FilterMap, SqlResult, TodoFilters};
use crate::query::creators::{CriteriaCreator, DecoratorCreator, OverdueCreator};
use crate::query::node::{BaseQuery, QueryNode};
use crate::query::registry::DecoratorRegistry;

use super::{apply_base_filters, require};

pub struct TodoQueryFactory<'a> {
    registry: &'a DecoratorRegistry,
}

impl TodoQueryFactory<'static> {
    pub fn global() -> Self {
        Self::new(DecoratorRegistry::global())
    }
}

impl<'a> TodoQueryFactory<'a> {
    pub const SOURCE_TABLE: &'static str = "todos";
    pub const BASE_SQL: &'static str = "SELECT * FROM todos";

    pub fn new(registry: &'a DecoratorRegistry) -> Self {
        Self { registry }
    }

    /// Base query for the todos of one list.
    pub fn list_base(list_id: &str) -> BaseQuery {
        BaseQuery::new(Self::BASE_SQL).with_predicate("list_id = $1::uuid", vec![Value::String(list_id.to_string())])
    }

    pub fn build_query(&self, base: BaseQuery, filters: Option<&TodoFilters>) -> Result<QueryNode, FilterError> {
        let filters = require(filters)?;

        let mut node = QueryNode::new(base);
        for (creator, value) in [
            (CriteriaCreator::status(), &filters.status),
            (CriteriaCreator::priority_level(), &filters.priority),
            (CriteriaCreator::list_id(), &filters.list_id),
            (CriteriaCreator::user_id(), &filters.user_id),
        ] {
            if !value.is_empty() {
                node = node.with(creator.clause(value));
            }
        }

        if !filters.overdue.is_empty() {
            let overdue = FilterMap::from([(keys::OVERDUE.to_string(), filters.overdue.clone())]);
            node = OverdueCreator::active().create(node, &overdue)?;
            node = OverdueCreator::expired().create(node, &overdue)?;
        }

        let node = apply_base_filters(self.registry, node, &filters.base)?;
        tracing::debug!("Built todo query with {} clauses", node.clauses().len());
        Ok(node)
    }

    pub fn build_sql(&self, base: BaseQuery, filters: Option<&TodoFilters>) -> Result<SqlResult, FilterError> {
        Ok(self.build_query(base, filters)?.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::BaseFilters;
    use serde_json::json;

    fn registry() -> DecoratorRegistry {
        DecoratorRegistry::default()
    }

    #[test]
    fn missing_filters_is_a_configuration_error() {
        let registry = registry();
        let err = TodoQueryFactory::new(&registry)
            .build_query(BaseQuery::new(TodoQueryFactory::BASE_SQL), None)
            .unwrap_err();
        assert_eq!(err, FilterError::InvalidFilters);
        assert_eq!(err.to_string(), "invalid filters provided");
    }

    #[test]
    fn entity_criteria_then_paging() {
        let registry = registry();
        let filters = TodoFilters {
            status: "open".into(),
            priority: "high".into(),
            overdue: "true".into(),
            base: BaseFilters { first: "10".into(), after: "c".into(), ..Default::default() },
            ..Default::default()
        };
        let sql = TodoQueryFactory::new(&registry)
            .build_sql(BaseQuery::new(TodoQueryFactory::BASE_SQL), Some(&filters))
            .unwrap();
        assert_eq!(
            sql.query,
            "SELECT * FROM todos WHERE status = $1 AND priority = $2 \
             AND (due_date IS NOT NULL AND current_date > due_date) \
             AND id > $3::uuid ORDER BY id ASC LIMIT 10"
        );
        assert_eq!(sql.params, vec![json!("open"), json!("high"), json!("c")]);
    }

    #[test]
    fn paging_fields_do_not_leak_into_predicate() {
        let registry = registry();
        let filters = TodoFilters {
            status: "open".into(),
            base: BaseFilters { limit: "2".into(), before: "c".into(), ..Default::default() },
            ..Default::default()
        };
        let node = TodoQueryFactory::new(&registry)
            .build_query(BaseQuery::new(TodoQueryFactory::BASE_SQL), Some(&filters))
            .unwrap();
        assert_eq!(node.render_predicate().query, "status = $1");
    }

    #[test]
    fn list_scoped_todos_continue_numbering() {
        let registry = registry();
        let filters = TodoFilters { status: "done".into(), ..Default::default() };
        let sql = TodoQueryFactory::new(&registry)
            .build_sql(TodoQueryFactory::list_base("l1"), Some(&filters))
            .unwrap();
        assert_eq!(sql.query, "SELECT * FROM todos WHERE list_id = $1::uuid AND status = $2");
        assert_eq!(sql.params, vec![json!("l1"), json!("done")]);
    }

    #[test]
    fn invalid_limit_propagates() {
        let registry = registry();
        let filters = TodoFilters {
            base: BaseFilters { limit: "abc".into(), ..Default::default() },
            ..Default::default()
        };
        let err = TodoQueryFactory::new(&registry)
            .build_query(BaseQuery::new(TodoQueryFactory::BASE_SQL), Some(&filters))
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid limit provided abc");
    }
}

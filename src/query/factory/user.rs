use serde_json::Value;

use crate::filter::{FilterError, SqlResult, UserFilters};
use crate::query::creators::CriteriaCreator;
use crate::query::node::{BaseQuery, QueryNode};
use crate::query::registry::DecoratorRegistry;

use super::{apply_base_filters, require};

pub struct UserQueryFactory<'a> {
    registry: &'a DecoratorRegistry,
}

impl UserQueryFactory<'static> {
    pub fn global() -> Self {
        Self::new(DecoratorRegistry::global())
    }
}

impl<'a> UserQueryFactory<'a> {
    pub const SOURCE_TABLE: &'static str = "users";
    pub const BASE_SQL: &'static str = "SELECT * FROM users";

    pub fn new(registry: &'a DecoratorRegistry) -> Self {
        Self { registry }
    }

    /// Base query for the collaborators of one list.
    pub fn collaborators_base(list_id: &str) -> BaseQuery {
        BaseQuery::new(Self::BASE_SQL).with_predicate(
            "id IN (SELECT user_id FROM list_collaborators WHERE list_id = $1::uuid)",
            vec![Value::String(list_id.to_string())],
        )
    }

    pub fn build_query(&self, base: BaseQuery, filters: Option<&UserFilters>) -> Result<QueryNode, FilterError> {
        let filters = require(filters)?;

        let mut node = QueryNode::new(base);
        if !filters.status.is_empty() {
            node = node.with(CriteriaCreator::status().clause(&filters.status));
        }

        apply_base_filters(self.registry, node, &filters.base)
    }

    pub fn build_sql(&self, base: BaseQuery, filters: Option<&UserFilters>) -> Result<SqlResult, FilterError> {
        Ok(self.build_query(base, filters)?.render())
    }
}

use crate::filter::{FilterError, ListFilters, SqlResult};
use crate::query::clause::{Clause, OwnerJoin};
use crate::query::node::{BaseQuery, QueryNode};
use crate::query::registry::DecoratorRegistry;

use super::{apply_base_filters, require};

/// Lists a user can see. With [`OwnerJoin::Or`] and both ids set, this is
/// "lists shared with the user, or owned by them".
pub struct ListQueryFactory<'a> {
    registry: &'a DecoratorRegistry,
    owner_join: OwnerJoin,
}

impl ListQueryFactory<'static> {
    pub fn global() -> Self {
        Self::new(DecoratorRegistry::global(), crate::config::config().query.owner_join)
    }
}

impl<'a> ListQueryFactory<'a> {
    pub const SOURCE_TABLE: &'static str = "lists";
    pub const BASE_SQL: &'static str = "SELECT * FROM lists";

    pub fn new(registry: &'a DecoratorRegistry, owner_join: OwnerJoin) -> Self {
        Self { registry, owner_join }
    }

    pub fn build_query(&self, base: BaseQuery, filters: Option<&ListFilters>) -> Result<QueryNode, FilterError> {
        let filters = require(filters)?;

        let mut node = QueryNode::new(base);
        if !filters.participant_id.is_empty() {
            node = node.with(Clause::Participant { user_id: filters.participant_id.clone() });
        }
        if !filters.owner_id.is_empty() {
            node = node.with(Clause::Owner { owner_id: filters.owner_id.clone(), join: self.owner_join });
        }

        apply_base_filters(self.registry, node, &filters.base)
    }

    pub fn build_sql(&self, base: BaseQuery, filters: Option<&ListFilters>) -> Result<SqlResult, FilterError> {
        Ok(self.build_query(base, filters)?.render())
    }
}

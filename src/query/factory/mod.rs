//! Per-entity query factories. Each applies its entity criteria directly and
//! hands the shared paging fields to the registry.

pub mod list;
pub mod todo;
pub mod user;

pub use list::ListQueryFactory;
pub use todo::TodoQueryFactory;
pub use user::UserQueryFactory;

use crate::filter::{BaseFilters, FilterError};

use super::node::QueryNode;
use super::registry::DecoratorRegistry;

/// Apply cursor, order and limit from the shared paging fields.
pub(crate) fn apply_base_filters(
    registry: &DecoratorRegistry,
    node: QueryNode,
    base: &BaseFilters,
) -> Result<QueryNode, FilterError> {
    registry.decorate(node, &base.to_filter_map())
}

/// Missing filters are a wiring bug on the caller's side.
pub(crate) fn require<T>(filters: Option<&T>) -> Result<&T, FilterError> {
    filters.ok_or(FilterError::InvalidFilters)
}

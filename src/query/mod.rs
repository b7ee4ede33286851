//! SQL construction for list endpoints.
//!
//! A [`QueryNode`] wraps a [`BaseQuery`] and carries an ordered list of
//! [`Clause`]s. Creators decide from a filter map which clauses to stack, the
//! [`DecoratorRegistry`] runs them in priority order, and the per-entity
//! factories tie the typed filters to both.

pub mod clause;
pub mod creators;
pub mod factory;
pub mod node;
pub mod registry;

pub use clause::{Clause, ClauseStage, ColumnType, CursorEdge, OverdueState, OwnerJoin, SortOrder};
pub use creators::{default_creators, DecoratorCreator};
pub use factory::{ListQueryFactory, TodoQueryFactory, UserQueryFactory};
pub use node::{BaseQuery, QueryNode};
pub use registry::DecoratorRegistry;

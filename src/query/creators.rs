//! Decorator creators: each one inspects a single filter key and, when it is
//! present, stacks the matching clause onto the node.

use crate::config::QueryConfig;
use crate::filter::{filter_value, keys, FilterError, FilterMap, PageDirection};

use super::clause::{Clause, ClauseStage, ColumnType, CursorEdge, OverdueState, OwnerJoin, SortOrder};
use super::node::QueryNode;

/// Decides whether to apply one clause for a given filter map.
///
/// Creators must leave the node untouched when their key is absent or empty.
pub trait DecoratorCreator: Send + Sync {
    /// Creator name for logging and debugging
    fn name(&self) -> &'static str;

    /// Lower priorities are applied first and render closer to the base query
    fn priority(&self) -> u8 {
        ClauseStage::Predicate.priority()
    }

    fn create(&self, node: QueryNode, filters: &FilterMap) -> Result<QueryNode, FilterError>;
}

/// Equality on one column, keyed by the filter of the same name.
pub struct CriteriaCreator {
    name: &'static str,
    key: &'static str,
    column: &'static str,
    column_type: ColumnType,
}

impl CriteriaCreator {
    pub const fn new(name: &'static str, key: &'static str, column: &'static str, column_type: ColumnType) -> Self {
        Self { name, key, column, column_type }
    }

    pub const fn status() -> Self {
        Self::new("StatusCriteria", keys::STATUS, "status", ColumnType::Text)
    }

    pub const fn priority_level() -> Self {
        Self::new("PriorityCriteria", keys::PRIORITY, "priority", ColumnType::Text)
    }

    pub const fn list_id() -> Self {
        Self::new("ListIdCriteria", keys::LIST_ID, "list_id", ColumnType::Uuid)
    }

    pub const fn user_id() -> Self {
        Self::new("UserIdCriteria", keys::USER_ID, "user_id", ColumnType::Uuid)
    }

    /// The clause this creator would stack for `value`.
    pub fn clause(&self, value: &str) -> Clause {
        Clause::Criteria {
            column: self.column.to_string(),
            value: value.to_string(),
            column_type: self.column_type,
        }
    }
}

impl DecoratorCreator for CriteriaCreator {
    fn name(&self) -> &'static str {
        self.name
    }

    fn create(&self, node: QueryNode, filters: &FilterMap) -> Result<QueryNode, FilterError> {
        Ok(match filter_value(filters, self.key) {
            Some(value) => node.with(self.clause(value)),
            None => node,
        })
    }
}

pub struct OwnerCreator {
    join: OwnerJoin,
}

impl OwnerCreator {
    pub fn new(join: OwnerJoin) -> Self {
        Self { join }
    }
}

impl DecoratorCreator for OwnerCreator {
    fn name(&self) -> &'static str {
        "OwnerCreator"
    }

    fn create(&self, node: QueryNode, filters: &FilterMap) -> Result<QueryNode, FilterError> {
        Ok(match filter_value(filters, keys::OWNER_ID) {
            Some(owner_id) => node.with(Clause::Owner { owner_id: owner_id.to_string(), join: self.join }),
            None => node,
        })
    }
}

pub struct ParticipantCreator;

impl DecoratorCreator for ParticipantCreator {
    fn name(&self) -> &'static str {
        "ParticipantCreator"
    }

    fn create(&self, node: QueryNode, filters: &FilterMap) -> Result<QueryNode, FilterError> {
        Ok(match filter_value(filters, keys::PARTICIPANT_ID) {
            Some(user_id) => node.with(Clause::Participant { user_id: user_id.to_string() }),
            None => node,
        })
    }
}

/// `overdue=false` selects active todos, `overdue=true` expired ones. Any
/// other value leaves the node alone.
pub struct OverdueCreator {
    state: OverdueState,
}

impl OverdueCreator {
    pub fn active() -> Self {
        Self { state: OverdueState::Active }
    }

    pub fn expired() -> Self {
        Self { state: OverdueState::Expired }
    }

    fn trigger(&self) -> &'static str {
        match self.state {
            OverdueState::Active => "false",
            OverdueState::Expired => "true",
        }
    }
}

impl DecoratorCreator for OverdueCreator {
    fn name(&self) -> &'static str {
        match self.state {
            OverdueState::Active => "OverdueActiveCreator",
            OverdueState::Expired => "OverdueExpiredCreator",
        }
    }

    fn create(&self, node: QueryNode, filters: &FilterMap) -> Result<QueryNode, FilterError> {
        match filter_value(filters, keys::OVERDUE) {
            Some(v) if v.eq_ignore_ascii_case(self.trigger()) => Ok(node.with(Clause::Overdue(self.state))),
            _ => Ok(node),
        }
    }
}

pub struct CursorCreator {
    edge: CursorEdge,
}

impl CursorCreator {
    pub fn after() -> Self {
        Self { edge: CursorEdge::After }
    }

    pub fn before() -> Self {
        Self { edge: CursorEdge::Before }
    }

    fn key(&self) -> &'static str {
        match self.edge {
            CursorEdge::After => keys::AFTER,
            CursorEdge::Before => keys::BEFORE,
        }
    }
}

impl DecoratorCreator for CursorCreator {
    fn name(&self) -> &'static str {
        match self.edge {
            CursorEdge::After => "AfterCursorCreator",
            CursorEdge::Before => "BeforeCursorCreator",
        }
    }

    fn priority(&self) -> u8 {
        ClauseStage::Cursor.priority()
    }

    fn create(&self, node: QueryNode, filters: &FilterMap) -> Result<QueryNode, FilterError> {
        Ok(match filter_value(filters, self.key()) {
            Some(cursor) => node.with(Clause::Cursor { edge: self.edge, cursor: cursor.to_string() }),
            None => node,
        })
    }
}

/// Orders by id whenever the request asks for a keyset page; backward pages
/// sort descending so the rows nearest the cursor come first.
pub struct OrderByCreator;

impl DecoratorCreator for OrderByCreator {
    fn name(&self) -> &'static str {
        "OrderByCreator"
    }

    fn priority(&self) -> u8 {
        ClauseStage::Order.priority()
    }

    fn create(&self, node: QueryNode, filters: &FilterMap) -> Result<QueryNode, FilterError> {
        if keys::KEYSET.iter().all(|key| filter_value(filters, key).is_none()) {
            return Ok(node);
        }
        let order = SortOrder::from(PageDirection::from_filters(filters));
        Ok(node.with(Clause::OrderBy(order)))
    }
}

/// Row limit from `limit`, falling back to the `first`/`last` page sizes.
pub struct LimitCreator {
    max_limit: Option<u32>,
}

impl LimitCreator {
    pub fn new(max_limit: Option<u32>) -> Self {
        Self { max_limit }
    }
}

impl DecoratorCreator for LimitCreator {
    fn name(&self) -> &'static str {
        "LimitCreator"
    }

    fn priority(&self) -> u8 {
        ClauseStage::Limit.priority()
    }

    fn create(&self, node: QueryNode, filters: &FilterMap) -> Result<QueryNode, FilterError> {
        let raw = [keys::LIMIT, keys::FIRST, keys::LAST]
            .into_iter()
            .find_map(|key| filter_value(filters, key));
        let Some(raw) = raw else {
            return Ok(node);
        };

        let limit: u32 = raw
            .trim()
            .parse()
            .map_err(|_| FilterError::InvalidLimit(raw.to_string()))?;

        let applied = match self.max_limit {
            Some(max) if limit > max => {
                tracing::warn!("Limit {} exceeds max {}, capping to max", limit, max);
                max
            }
            _ => limit,
        };
        Ok(node.with(Clause::Limit(applied)))
    }
}

/// The full creator set, in wiring order. The registry sorts it by priority.
pub fn default_creators(config: &QueryConfig) -> Vec<Box<dyn DecoratorCreator>> {
    vec![
        Box::new(CriteriaCreator::status()),
        Box::new(CriteriaCreator::priority_level()),
        Box::new(CriteriaCreator::list_id()),
        Box::new(CriteriaCreator::user_id()),
        Box::new(ParticipantCreator),
        Box::new(OwnerCreator::new(config.owner_join)),
        Box::new(OverdueCreator::active()),
        Box::new(OverdueCreator::expired()),
        Box::new(CursorCreator::after()),
        Box::new(CursorCreator::before()),
        Box::new(OrderByCreator),
        Box::new(LimitCreator::new(config.max_limit)),
    ]
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::filter::PageDirection;

/// Render stage of a clause. The discriminant doubles as the priority of the
/// creator that produces clauses of this stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ClauseStage {
    Predicate = 10,
    Cursor = 15,
    Order = 18,
    Limit = 20,
}

impl ClauseStage {
    pub fn priority(self) -> u8 {
        self as u8
    }
}

/// SQL type of a bound value, used to cast text parameters where the column
/// is not text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Uuid,
}

impl ColumnType {
    fn placeholder(self, index: usize) -> String {
        match self {
            ColumnType::Text => format!("${index}"),
            ColumnType::Uuid => format!("${index}::uuid"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorEdge {
    After,
    Before,
}

impl CursorEdge {
    fn operator(self) -> &'static str {
        match self {
            CursorEdge::After => ">",
            CursorEdge::Before => "<",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn to_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl From<PageDirection> for SortOrder {
    fn from(direction: PageDirection) -> Self {
        match direction {
            PageDirection::Forward => SortOrder::Asc,
            PageDirection::Backward => SortOrder::Desc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverdueState {
    /// Due in the future, or no due date at all.
    Active,
    /// Due date set and already in the past.
    Expired,
}

/// How the owner predicate attaches to predicates rendered before it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerJoin {
    /// `AND owner = ...`: the row must match everything else and be owned.
    #[default]
    And,
    /// `OR owner = ...`: the row matches everything else, or is owned.
    Or,
}

impl FromStr for OwnerJoin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "and" => Ok(OwnerJoin::And),
            "or" => Ok(OwnerJoin::Or),
            other => Err(format!("unknown owner join: {other}")),
        }
    }
}

impl fmt::Display for OwnerJoin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnerJoin::And => f.write_str("and"),
            OwnerJoin::Or => f.write_str("or"),
        }
    }
}

/// Connective used between two predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Connective {
    And,
    Or,
}

impl Connective {
    pub(crate) fn to_sql(self) -> &'static str {
        match self {
            Connective::And => " AND ",
            Connective::Or => " OR ",
        }
    }
}

/// Output of a single clause: either a predicate that joins the WHERE
/// section, or a suffix appended verbatim.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ClauseSql {
    Predicate { connective: Connective, sql: String },
    Suffix(String),
}

/// One SQL fragment kind. Clauses are rendered grouped by [`ClauseStage`],
/// in insertion order within a stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    Criteria {
        column: String,
        value: String,
        column_type: ColumnType,
    },
    Cursor {
        edge: CursorEdge,
        cursor: String,
    },
    Limit(u32),
    OrderBy(SortOrder),
    Overdue(OverdueState),
    Owner {
        owner_id: String,
        join: OwnerJoin,
    },
    Participant {
        user_id: String,
    },
}

impl Clause {
    pub fn criteria(column: impl Into<String>, value: impl Into<String>) -> Self {
        Clause::Criteria {
            column: column.into(),
            value: value.into(),
            column_type: ColumnType::Text,
        }
    }

    pub fn uuid_criteria(column: impl Into<String>, value: impl Into<String>) -> Self {
        Clause::Criteria {
            column: column.into(),
            value: value.into(),
            column_type: ColumnType::Uuid,
        }
    }

    pub fn stage(&self) -> ClauseStage {
        match self {
            Clause::Criteria { .. }
            | Clause::Overdue(_)
            | Clause::Owner { .. }
            | Clause::Participant { .. } => ClauseStage::Predicate,
            Clause::Cursor { .. } => ClauseStage::Cursor,
            Clause::OrderBy(_) => ClauseStage::Order,
            Clause::Limit(_) => ClauseStage::Limit,
        }
    }

    /// Limit and order may appear at most once in a chain.
    pub(crate) fn is_singular(&self) -> bool {
        matches!(self, Clause::Limit(_) | Clause::OrderBy(_))
    }

    /// Render this clause, pushing any bound values onto `params`.
    pub(crate) fn render(&self, params: &mut Vec<Value>) -> ClauseSql {
        match self {
            Clause::Criteria { column, value, column_type } => {
                let placeholder = bind(params, value, *column_type);
                predicate(format!("{column} = {placeholder}"))
            }
            Clause::Cursor { edge, cursor } => {
                let placeholder = bind(params, cursor, ColumnType::Uuid);
                predicate(format!("id {} {placeholder}", edge.operator()))
            }
            Clause::Overdue(OverdueState::Active) => {
                predicate("(due_date IS NULL OR current_date < due_date)".to_string())
            }
            Clause::Overdue(OverdueState::Expired) => {
                predicate("(due_date IS NOT NULL AND current_date > due_date)".to_string())
            }
            Clause::Owner { owner_id, join } => {
                let placeholder = bind(params, owner_id, ColumnType::Uuid);
                let connective = match join {
                    OwnerJoin::And => Connective::And,
                    OwnerJoin::Or => Connective::Or,
                };
                ClauseSql::Predicate { connective, sql: format!("owner = {placeholder}") }
            }
            Clause::Participant { user_id } => {
                let placeholder = bind(params, user_id, ColumnType::Uuid);
                predicate(format!(
                    "id IN (SELECT list_id FROM list_collaborators WHERE user_id = {placeholder})"
                ))
            }
            Clause::OrderBy(order) => ClauseSql::Suffix(format!(" ORDER BY id {}", order.to_sql())),
            Clause::Limit(n) => ClauseSql::Suffix(format!(" LIMIT {n}")),
        }
    }
}

fn predicate(sql: String) -> ClauseSql {
    ClauseSql::Predicate { connective: Connective::And, sql }
}

fn bind(params: &mut Vec<Value>, value: &str, column_type: ColumnType) -> String {
    params.push(Value::String(value.to_string()));
    column_type.placeholder(params.len())
}

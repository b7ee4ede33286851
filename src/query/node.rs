use serde_json::Value;

use super::clause::{Clause, ClauseSql, ClauseStage, Connective};
use crate::filter::SqlResult;

/// The fixed initial statement of a query, e.g. `SELECT * FROM todos`.
///
/// A base that restricts rows must declare that restriction through
/// [`BaseQuery::with_predicate`] rather than embedding `WHERE` in the SQL, so
/// the node knows a predicate already exists and keeps the parameter
/// numbering in step.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseQuery {
    sql: String,
    predicate: Option<String>,
    params: Vec<Value>,
}

impl BaseQuery {
    pub fn new(sql: impl Into<String>) -> Self {
        Self { sql: sql.into(), predicate: None, params: vec![] }
    }

    /// Attach a predicate using placeholders `$1..$n` for `params`.
    pub fn with_predicate(mut self, predicate: impl Into<String>, params: Vec<Value>) -> Self {
        self.predicate = Some(predicate.into());
        self.params = params;
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn predicate(&self) -> Option<&str> {
        self.predicate.as_deref()
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }
}

impl From<&str> for BaseQuery {
    fn from(sql: &str) -> Self {
        BaseQuery::new(sql)
    }
}

/// A base query plus the clauses stacked on it.
///
/// Rendering is pure: the node is never mutated by [`QueryNode::render`], so
/// rendering twice yields the same SQL.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryNode {
    base: BaseQuery,
    clauses: Vec<Clause>,
}

impl QueryNode {
    pub fn new(base: impl Into<BaseQuery>) -> Self {
        Self { base: base.into(), clauses: vec![] }
    }

    /// Stack one more clause. A second limit or order clause replaces the
    /// first instead of rendering twice.
    pub fn with(mut self, clause: Clause) -> Self {
        if clause.is_singular() {
            let kind = std::mem::discriminant(&clause);
            self.clauses.retain(|c| std::mem::discriminant(c) != kind);
        }
        self.clauses.push(clause);
        self
    }

    pub fn base(&self) -> &BaseQuery {
        &self.base
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// True once the base or any clause restricts rows.
    pub fn has_predicate(&self) -> bool {
        self.base.predicate.is_some()
            || self
                .clauses
                .iter()
                .any(|c| matches!(c.stage(), ClauseStage::Predicate | ClauseStage::Cursor))
    }

    /// Clauses grouped by stage; the sort is stable so insertion order holds
    /// within a stage.
    fn staged(&self) -> Vec<&Clause> {
        let mut staged: Vec<&Clause> = self.clauses.iter().collect();
        staged.sort_by_key(|c| c.stage());
        staged
    }

    /// Full statement: base, WHERE section, ORDER BY, LIMIT.
    ///
    /// An `AND`-joined clause following an `OR`-joined group wraps that group
    /// in parentheses, so later predicates and the keyset bound apply to
    /// every row the group matches.
    pub fn render(&self) -> SqlResult {
        let mut params = self.base.params.clone();
        let mut section = PredicateSection::default();
        let mut suffix = String::new();

        if let Some(predicate) = &self.base.predicate {
            section.push(Connective::And, predicate);
        }

        for clause in self.staged() {
            match clause.render(&mut params) {
                ClauseSql::Predicate { connective, sql } => section.push(connective, &sql),
                ClauseSql::Suffix(sql) => suffix.push_str(&sql),
            }
        }

        let mut query = self.base.sql.clone();
        if !section.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&section.sql);
        }
        query.push_str(&suffix);

        SqlResult { query, params }
    }

    /// Just the row-restricting part of the statement, without the `WHERE`
    /// keyword and without cursor, order or limit. This is what pagination
    /// metadata is computed over. Renders `TRUE` when nothing restricts rows.
    pub fn render_predicate(&self) -> SqlResult {
        let mut params = self.base.params.clone();
        let mut section = PredicateSection::default();

        if let Some(predicate) = &self.base.predicate {
            section.push(Connective::And, predicate);
        }

        for clause in self.staged().into_iter().filter(|c| c.stage() == ClauseStage::Predicate) {
            if let ClauseSql::Predicate { connective, sql } = clause.render(&mut params) {
                section.push(connective, &sql);
            }
        }

        let query = if section.is_empty() { "TRUE".to_string() } else { section.sql };
        SqlResult { query, params }
    }
}

/// The text after `WHERE`, built one predicate at a time.
#[derive(Default)]
struct PredicateSection {
    sql: String,
    disjunctive: bool,
}

impl PredicateSection {
    fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    /// The connective of the first predicate is dropped.
    fn push(&mut self, connective: Connective, predicate: &str) {
        if !self.is_empty() {
            if self.disjunctive && connective == Connective::And {
                self.sql = format!("({})", self.sql);
                self.disjunctive = false;
            }
            self.sql.push_str(connective.to_sql());
            self.disjunctive |= connective == Connective::Or;
        }
        self.sql.push_str(predicate);
    }
}

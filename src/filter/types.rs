use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw filter map as it arrives from query parameters. An empty value is
/// treated exactly like a missing key.
pub type FilterMap = HashMap<String, String>;

/// Filter keys understood by the decorator creators.
pub mod keys {
    pub const LIMIT: &str = "limit";
    pub const AFTER: &str = "after";
    pub const BEFORE: &str = "before";
    pub const FIRST: &str = "first";
    pub const LAST: &str = "last";

    pub const STATUS: &str = "status";
    pub const PRIORITY: &str = "priority";
    pub const LIST_ID: &str = "list_id";
    pub const USER_ID: &str = "user_id";
    pub const OVERDUE: &str = "overdue";
    pub const OWNER_ID: &str = "owner_id";
    pub const PARTICIPANT_ID: &str = "participant_id";

    /// Keys that request a keyset page. A bare `limit` only caps rows.
    pub const KEYSET: [&str; 4] = [AFTER, BEFORE, FIRST, LAST];
}

/// Look up a filter value, treating the empty string as absent.
pub fn filter_value<'a>(filters: &'a FilterMap, key: &str) -> Option<&'a str> {
    filters
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
}

fn insert_present(map: &mut FilterMap, key: &str, value: &str) {
    if !value.is_empty() {
        map.insert(key.to_string(), value.to_string());
    }
}

fn take(map: &FilterMap, key: &str) -> String {
    filter_value(map, key).unwrap_or_default().to_string()
}

/// Which edge of the keyset a request pages from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageDirection {
    #[default]
    Forward,
    Backward,
}

impl PageDirection {
    /// `last` always pages backward; a lone `before` cursor does too.
    pub fn from_filters(filters: &FilterMap) -> Self {
        let last = filter_value(filters, keys::LAST).is_some();
        let before_only = filter_value(filters, keys::BEFORE).is_some()
            && filter_value(filters, keys::AFTER).is_none();
        if last || before_only {
            PageDirection::Backward
        } else {
            PageDirection::Forward
        }
    }
}

/// Paging fields shared by every list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseFilters {
    pub limit: String,
    pub after: String,
    pub before: String,
    pub first: String,
    pub last: String,
}

impl BaseFilters {
    pub fn from_filter_map(map: &FilterMap) -> Self {
        Self {
            limit: take(map, keys::LIMIT),
            after: take(map, keys::AFTER),
            before: take(map, keys::BEFORE),
            first: take(map, keys::FIRST),
            last: take(map, keys::LAST),
        }
    }

    pub fn to_filter_map(&self) -> FilterMap {
        let mut map = FilterMap::new();
        insert_present(&mut map, keys::LIMIT, &self.limit);
        insert_present(&mut map, keys::AFTER, &self.after);
        insert_present(&mut map, keys::BEFORE, &self.before);
        insert_present(&mut map, keys::FIRST, &self.first);
        insert_present(&mut map, keys::LAST, &self.last);
        map
    }

    pub fn direction(&self) -> PageDirection {
        PageDirection::from_filters(&self.to_filter_map())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TodoFilters {
    #[serde(flatten)]
    pub base: BaseFilters,
    pub status: String,
    pub priority: String,
    pub list_id: String,
    pub user_id: String,
    /// `"true"` selects expired todos, `"false"` selects active ones.
    pub overdue: String,
}

impl TodoFilters {
    pub fn from_filter_map(map: &FilterMap) -> Self {
        Self {
            base: BaseFilters::from_filter_map(map),
            status: take(map, keys::STATUS),
            priority: take(map, keys::PRIORITY),
            list_id: take(map, keys::LIST_ID),
            user_id: take(map, keys::USER_ID),
            overdue: take(map, keys::OVERDUE),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListFilters {
    #[serde(flatten)]
    pub base: BaseFilters,
    pub owner_id: String,
    pub participant_id: String,
}

impl ListFilters {
    pub fn from_filter_map(map: &FilterMap) -> Self {
        Self {
            base: BaseFilters::from_filter_map(map),
            owner_id: take(map, keys::OWNER_ID),
            participant_id: take(map, keys::PARTICIPANT_ID),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserFilters {
    #[serde(flatten)]
    pub base: BaseFilters,
    pub status: String,
}

impl UserFilters {
    pub fn from_filter_map(map: &FilterMap) -> Self {
        Self {
            base: BaseFilters::from_filter_map(map),
            status: take(map, keys::STATUS),
        }
    }
}

/// Rendered SQL with its positional parameters (`$1`, `$2`, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Value>,
}

impl SqlResult {
    /// Debug rendering with every placeholder replaced by a quoted literal.
    /// Used for logs and the CLI only; never executed.
    pub fn inline(&self) -> String {
        let mut out = String::with_capacity(self.query.len());
        let mut chars = self.query.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '$' {
                out.push(c);
                continue;
            }
            let mut digits = String::new();
            while let Some(d) = chars.peek().copied().filter(char::is_ascii_digit) {
                digits.push(d);
                chars.next();
            }
            let param = digits
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| self.params.get(i));
            match param {
                Some(value) => {
                    out.push_str(&literal(value));
                    // Casts such as `$1::uuid` only make sense on placeholders.
                    if chars.peek() == Some(&':') {
                        let rest: String = chars.clone().take(2).collect();
                        if rest == "::" {
                            chars.next();
                            chars.next();
                            while chars.peek().is_some_and(|c| c.is_ascii_alphanumeric() || *c == '_') {
                                chars.next();
                            }
                        }
                    }
                }
                None => {
                    out.push('$');
                    out.push_str(&digits);
                }
            }
        }
        out
    }
}

fn literal(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("'{}'", s.replace('\'', "''")),
        other => format!("'{}'", other.to_string().replace('\'', "''")),
    }
}

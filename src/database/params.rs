//! Binding of rendered `serde_json::Value` parameters onto sqlx queries.

use serde_json::Value;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::QueryAs;
use sqlx::{FromRow, Postgres};

use crate::filter::SqlResult;

pub fn bind_param_query_as<'q, O>(
    q: QueryAs<'q, Postgres, O, PgArguments>,
    v: &'q Value,
) -> QueryAs<'q, Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s),
        Value::Array(_) | Value::Object(_) => q.bind(v.clone()),
    }
}

/// `query_as` over a rendered statement with every parameter bound in order.
pub fn query_as<'q, O>(sql: &'q SqlResult) -> QueryAs<'q, Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    sql.params
        .iter()
        .fold(sqlx::query_as::<_, O>(&sql.query), |q, p| bind_param_query_as(q, p))
}

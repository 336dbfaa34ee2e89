use serde_json::Value;
use sqlx::{postgres::PgArguments, FromRow};

use crate::database::manager::DatabaseError;
use crate::types::{ColumnMap, UpdateMap};

/// Compiled `SET` clause of a partial update.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialUpdate {
    /// `"col_a"=$1, "col_b"=$2`
    pub set_cols: String,
    /// Values in placeholder order.
    pub values: Vec<Value>,
}

impl PartialUpdate {
    /// Placeholder index following the compiled values, e.g. for a `WHERE` key.
    pub fn next_placeholder(&self) -> String {
        format!("${}", self.values.len() + 1)
    }
}

/// Compile `data` into a parameterized `SET` clause.
///
/// Columns come from `columns`, or the field name itself when it has no entry.
/// An empty update is rejected since it would produce invalid SQL.
pub fn sql_for_partial_update(data: &UpdateMap, columns: &ColumnMap) -> Result<PartialUpdate, DatabaseError> {
    if data.is_empty() {
        return Err(DatabaseError::EmptyUpdate);
    }

    let set_cols = data
        .keys()
        .enumerate()
        .map(|(idx, field)| format!("\"{}\"=${}", columns.column(field), idx + 1))
        .collect::<Vec<_>>()
        .join(", ");
    let values = data.values().cloned().collect();

    Ok(PartialUpdate { set_cols, values })
}

/// Bind a JSON value to a `query_as` placeholder.
///
/// NULL goes out typed as int4: Postgres accepts it in assignment context for
/// every integer, numeric and text column in the schema.
pub fn bind_value<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &'q Value,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match v {
        Value::Null => q.bind(None::<i32>),
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
        Value::String(s) => q.bind(s.as_str()),
        Value::Array(_) | Value::Object(_) => q.bind(v.clone()),
    }
}

/// Bind every value in order.
pub fn bind_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    values: &'q [Value],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    for v in values {
        q = bind_value(q, v);
    }
    q
}

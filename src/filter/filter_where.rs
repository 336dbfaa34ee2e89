use serde_json::Value;

use super::types::SqlResult;

/// Accumulates AND-ed predicates and their positional parameters.
///
/// Every value pushed through [`FilterWhere::param`] takes the next `$n`
/// placeholder, so predicates must be added in the order their values bind.
#[derive(Debug, Default)]
pub struct FilterWhere {
    param_values: Vec<Value>,
    conditions: Vec<String>,
}

impl FilterWhere {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bound value and return its placeholder.
    pub fn param(&mut self, value: impl Into<Value>) -> String {
        self.param_values.push(value.into());
        format!("${}", self.param_values.len())
    }

    pub fn condition(&mut self, sql: impl Into<String>) {
        self.conditions.push(sql.into());
    }

    /// Append the collected predicates and ordering to `base`.
    pub fn finish(self, base: &str, order_by: &str) -> SqlResult {
        let mut query = base.trim_end().to_string();
        if !self.conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&self.conditions.join(" AND "));
        }
        query.push_str(" ORDER BY ");
        query.push_str(order_by);

        SqlResult { query, params: self.param_values }
    }
}

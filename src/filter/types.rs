use serde::Deserialize;
use serde_json::Value;

/// Search criteria accepted by `GET /jobs`. All present predicates are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobFilter {
    pub min_salary: Option<i32>,
    pub has_equity: Option<bool>,
    pub title_like: Option<String>,
}

/// Search criteria accepted by `GET /companies`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyFilter {
    pub name_like: Option<String>,
    pub min_employees: Option<i32>,
    pub max_employees: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Value>,
}

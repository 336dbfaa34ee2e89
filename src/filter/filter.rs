use super::error::FilterError;
use super::filter_where::FilterWhere;
use super::types::{CompanyFilter, JobFilter, SqlResult};

impl JobFilter {
    /// Compile the filter into `base WHERE ... ORDER BY title`.
    pub fn to_sql(&self, base: &str) -> Result<SqlResult, FilterError> {
        let mut w = FilterWhere::new();

        if let Some(min_salary) = self.min_salary {
            if min_salary < 0 {
                return Err(FilterError::Negative { field: "minSalary" });
            }
            let p = w.param(min_salary);
            w.condition(format!("salary >= {}", p));
        }

        if self.has_equity == Some(true) {
            w.condition("equity > 0");
        }

        if let Some(title_like) = &self.title_like {
            let p = w.param(format!("%{}%", title_like));
            w.condition(format!("title ILIKE {}", p));
        }

        Ok(w.finish(base, "title"))
    }
}

impl CompanyFilter {
    /// Compile the filter into `base WHERE ... ORDER BY name`.
    pub fn to_sql(&self, base: &str) -> Result<SqlResult, FilterError> {
        if let (Some(min), Some(max)) = (self.min_employees, self.max_employees) {
            if min > max {
                return Err(FilterError::InvertedRange);
            }
        }

        let mut w = FilterWhere::new();

        if let Some(min) = self.min_employees {
            if min < 0 {
                return Err(FilterError::Negative { field: "minEmployees" });
            }
            let p = w.param(min);
            w.condition(format!("num_employees >= {}", p));
        }

        if let Some(max) = self.max_employees {
            if max < 0 {
                return Err(FilterError::Negative { field: "maxEmployees" });
            }
            let p = w.param(max);
            w.condition(format!("num_employees <= {}", p));
        }

        if let Some(name_like) = &self.name_like {
            let p = w.param(format!("%{}%", name_like));
            w.condition(format!("name ILIKE {}", p));
        }

        Ok(w.finish(base, "name"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const JOBS: &str = "SELECT id, title FROM jobs";
    const COMPANIES: &str = "SELECT handle, name FROM companies";

    #[test]
    fn job_filter_without_criteria_lists_everything_by_title() {
        let sql = JobFilter::default().to_sql(JOBS).unwrap();
        assert_eq!(sql.query, "SELECT id, title FROM jobs ORDER BY title");
        assert!(sql.params.is_empty());
    }

    #[test]
    fn job_filter_combines_all_predicates() {
        let filter = JobFilter {
            min_salary: Some(60000),
            has_equity: Some(true),
            title_like: Some("Job".to_string()),
        };
        let sql = filter.to_sql(JOBS).unwrap();
        assert_eq!(
            sql.query,
            "SELECT id, title FROM jobs WHERE salary >= $1 AND equity > 0 AND title ILIKE $2 ORDER BY title"
        );
        assert_eq!(sql.params, vec![json!(60000), json!("%Job%")]);
    }

    #[test]
    fn job_filter_title_only_takes_first_placeholder() {
        let filter = JobFilter { title_like: Some("eng".to_string()), ..Default::default() };
        let sql = filter.to_sql(JOBS).unwrap();
        assert_eq!(sql.query, "SELECT id, title FROM jobs WHERE title ILIKE $1 ORDER BY title");
        assert_eq!(sql.params, vec![json!("%eng%")]);
    }

    #[test]
    fn job_filter_has_equity_false_adds_nothing() {
        let filter = JobFilter { has_equity: Some(false), ..Default::default() };
        let sql = filter.to_sql(JOBS).unwrap();
        assert_eq!(sql.query, "SELECT id, title FROM jobs ORDER BY title");
    }

    #[test]
    fn job_filter_rejects_negative_salary() {
        let filter = JobFilter { min_salary: Some(-1), ..Default::default() };
        assert_eq!(
            filter.to_sql(JOBS).unwrap_err(),
            FilterError::Negative { field: "minSalary" }
        );
    }

    #[test]
    fn company_filter_range_and_name() {
        let filter = CompanyFilter {
            name_like: Some("net".to_string()),
            min_employees: Some(10),
            max_employees: Some(500),
        };
        let sql = filter.to_sql(COMPANIES).unwrap();
        assert_eq!(
            sql.query,
            "SELECT handle, name FROM companies WHERE num_employees >= $1 AND num_employees <= $2 AND name ILIKE $3 ORDER BY name"
        );
        assert_eq!(sql.params, vec![json!(10), json!(500), json!("%net%")]);
    }

    #[test]
    fn company_filter_rejects_min_above_max() {
        let filter = CompanyFilter {
            min_employees: Some(10),
            max_employees: Some(2),
            ..Default::default()
        };
        assert_eq!(filter.to_sql(COMPANIES).unwrap_err(), FilterError::InvertedRange);
    }
}

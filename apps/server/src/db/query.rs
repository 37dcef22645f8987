//! Composable SQL query over a model.
//!
//! `TableQuery` accumulates predicates, relationship joins, order
//! expressions, and pagination, then renders `SELECT`/`COUNT` statements with
//! numbered bind placeholders. Execution dispatches the collected
//! `BindValue`s onto `sqlx` and returns JSON row payloads.

use super::models::Model;
use crate::Result;
use serde_json::Value as JsonValue;
use sqlx::PgPool;

/// Bind values for `sqlx` queries.
#[derive(Debug, Clone)]
pub enum BindValue {
    Text(String),
    TextArray(Vec<String>),
    Int(i64),
}

/// A projected output column of a query.
///
/// The default projection is the model payload; heterogeneous queries add
/// labeled expressions, optionally mapped back to a known model.
#[derive(Debug, Clone)]
pub struct Projection {
    pub label: String,
    pub sql: String,
    pub model: Option<&'static Model>,
}

#[derive(Debug, Clone)]
pub struct TableQuery {
    model: &'static Model,
    projections: Vec<Projection>,
    predicates: Vec<String>,
    binds: Vec<BindValue>,
    joins: Vec<&'static str>,
    order_exprs: Vec<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl TableQuery {
    pub fn new(model: &'static Model) -> Self {
        Self {
            model,
            projections: Vec::new(),
            predicates: Vec::new(),
            binds: Vec::new(),
            joins: Vec::new(),
            order_exprs: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    pub fn model(&self) -> &'static Model {
        self.model
    }

    /// Push a bind value and return its 1-based placeholder index.
    pub fn bind(&mut self, value: BindValue) -> usize {
        self.binds.push(value);
        self.binds.len()
    }

    /// Append a raw predicate (AND-composed). Placeholder indexes must come
    /// from `bind` on this query.
    pub fn filter(&mut self, predicate: String) {
        self.predicates.push(predicate);
    }

    pub fn filter_eq(&mut self, column: &str, value: BindValue) {
        let idx = self.bind(value);
        self.predicates.push(format!("{column} = ${idx}"));
    }

    /// Join a relationship. Joining the same relationship twice is a no-op.
    pub fn join(&mut self, clause: &'static str) {
        if !self.joins.contains(&clause) {
            self.joins.push(clause);
        }
    }

    /// Add a labeled projection, turning this into a heterogeneous query.
    pub fn select_expr(&mut self, label: &str, sql: &str, model: Option<&'static Model>) {
        self.projections.push(Projection {
            label: label.to_string(),
            sql: sql.to_string(),
            model,
        });
    }

    pub fn projections(&self) -> &[Projection] {
        &self.projections
    }

    /// True when the query projects exactly its one mapped model.
    pub fn projects_single_model(&self) -> bool {
        self.projections.is_empty()
    }

    pub fn order_by(&mut self, expr: String) {
        self.order_exprs.push(expr);
    }

    pub fn clear_order(&mut self) {
        self.order_exprs.clear();
    }

    pub fn order_exprs(&self) -> &[String] {
        &self.order_exprs
    }

    pub fn paginate(&mut self, page: i64, per_page: i64) {
        self.limit = Some(per_page);
        self.offset = Some((page - 1).max(0) * per_page);
    }

    pub fn build_sql(&self) -> (String, Vec<BindValue>) {
        let select = if self.projections.is_empty() {
            format!("{} AS resource", self.model.payload)
        } else {
            self.projections
                .iter()
                .map(|p| format!("{} AS {}", p.sql, p.label))
                .collect::<Vec<_>>()
                .join(", ")
        };

        let mut sql = format!(
            "SELECT {} FROM {} {}",
            select, self.model.table, self.model.alias
        );
        self.push_common(&mut sql);

        if !self.order_exprs.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_exprs.join(", "));
        }
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }

        (sql, self.binds.clone())
    }

    pub fn build_count_sql(&self) -> (String, Vec<BindValue>) {
        let mut sql = format!(
            "SELECT COUNT(*) FROM {} {}",
            self.model.table, self.model.alias
        );
        self.push_common(&mut sql);
        (sql, self.binds.clone())
    }

    fn push_common(&self, sql: &mut String) {
        for join in &self.joins {
            sql.push(' ');
            sql.push_str(join);
        }
        if !self.predicates.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.predicates.join(" AND "));
        }
    }

    /// Execute the query, returning the JSON payload of each row.
    pub async fn fetch(&self, pool: &PgPool) -> Result<Vec<JsonValue>> {
        let (sql, bind_values) = self.build_sql();

        let mut query = sqlx::query(&sql);
        for value in bind_values {
            query = match value {
                BindValue::Text(v) => query.bind(v),
                BindValue::TextArray(vs) => query.bind(vs),
                BindValue::Int(v) => query.bind(v),
            };
        }

        let rows = query
            .fetch_all(pool)
            .await
            .map_err(crate::Error::Database)?;

        use sqlx::Row;
        let payloads = rows
            .iter()
            .filter_map(|row| row.try_get::<JsonValue, _>("resource").ok())
            .collect();

        Ok(payloads)
    }

    pub async fn count(&self, pool: &PgPool) -> Result<i64> {
        let (sql, bind_values) = self.build_count_sql();

        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for value in bind_values {
            query = match value {
                BindValue::Text(v) => query.bind(v),
                BindValue::TextArray(vs) => query.bind(vs),
                BindValue::Int(v) => query.bind(v),
            };
        }

        query.fetch_one(pool).await.map_err(crate::Error::Database)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::SCHEDULE_D;

    #[test]
    fn default_projection_selects_payload() {
        let query = TableQuery::new(&SCHEDULE_D);
        let (sql, binds) = query.build_sql();
        assert!(sql.starts_with("SELECT to_jsonb(sd)"));
        assert!(sql.contains("FROM ofec_sched_d sd"));
        assert!(binds.is_empty());
    }

    #[test]
    fn filter_eq_binds_numbered_placeholder() {
        let mut query = TableQuery::new(&SCHEDULE_D);
        query.filter_eq("sd.sub_id", BindValue::Int(42));
        query.filter_eq("sd.committee_id", BindValue::Text("C001".to_string()));
        let (sql, binds) = query.build_sql();
        assert!(sql.contains("WHERE sd.sub_id = $1 AND sd.committee_id = $2"));
        assert_eq!(binds.len(), 2);
    }

    #[test]
    fn joins_are_deduplicated() {
        let mut query = TableQuery::new(&SCHEDULE_D);
        query.join("JOIN ofec_committees cm ON cm.committee_id = sd.committee_id");
        query.join("JOIN ofec_committees cm ON cm.committee_id = sd.committee_id");
        let (sql, _) = query.build_sql();
        assert_eq!(sql.matches("JOIN ofec_committees").count(), 1);
    }

    #[test]
    fn pagination_renders_limit_and_offset() {
        let mut query = TableQuery::new(&SCHEDULE_D);
        query.paginate(3, 20);
        let (sql, _) = query.build_sql();
        assert!(sql.ends_with("LIMIT 20 OFFSET 40"));
    }

    #[test]
    fn count_sql_drops_order_and_pagination() {
        let mut query = TableQuery::new(&SCHEDULE_D);
        query.order_by("sd.load_date ASC".to_string());
        query.paginate(1, 20);
        let (sql, _) = query.build_count_sql();
        assert!(sql.starts_with("SELECT COUNT(*)"));
        assert!(!sql.contains("ORDER BY"));
        assert!(!sql.contains("LIMIT"));
    }

    #[test]
    fn labeled_projections_replace_payload() {
        let mut query = TableQuery::new(&SCHEDULE_D);
        query.select_expr("committee_id", "sd.committee_id", Some(&SCHEDULE_D));
        query.select_expr("total", "SUM(sd.payment_period)", None);
        let (sql, _) = query.build_sql();
        assert!(sql.contains("sd.committee_id AS committee_id"));
        assert!(sql.contains("SUM(sd.payment_period) AS total"));
        assert!(!sql.contains("to_jsonb"));
        assert!(!query.projects_single_model());
    }
}

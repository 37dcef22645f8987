//! Declarative filters and pagination for tabular list resources.
//!
//! A resource declares which query parameters filter which columns; the
//! tables below drive SQL composition so individual handlers stay thin.

use super::query::{BindValue, TableQuery};
use crate::api::params::QueryParams;
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value as JsonValue;
use sqlx::PgPool;

pub const DEFAULT_PER_PAGE: i64 = 20;
pub const MAX_PER_PAGE: i64 = 100;

/// Membership filter: any of the repeated parameter values.
#[derive(Debug)]
pub struct MultiField {
    pub param: &'static str,
    pub column: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub enum RangeKind {
    Date,
    Numeric,
    Text,
}

/// Inclusive range filter over a min/max parameter pair.
#[derive(Debug)]
pub struct RangeField {
    pub min_param: &'static str,
    pub max_param: &'static str,
    pub column: &'static str,
    pub kind: RangeKind,
}

/// Exact-match filter.
#[derive(Debug)]
pub struct MatchField {
    pub param: &'static str,
    pub column: &'static str,
}

/// Full-text filter against a tsvector column.
#[derive(Debug)]
pub struct FulltextField {
    pub param: &'static str,
    pub column: &'static str,
}

#[derive(Debug, Default)]
pub struct FilterFields {
    pub multi: &'static [MultiField],
    pub range: &'static [RangeField],
    pub match_eq: &'static [MatchField],
    pub fulltext: &'static [FulltextField],
}

impl RangeField {
    fn cast(&self) -> &'static str {
        match self.kind {
            RangeKind::Date => "::date",
            RangeKind::Numeric => "::numeric",
            RangeKind::Text => "",
        }
    }

    fn validate(&self, param: &str, raw: &str) -> Result<()> {
        let ok = match self.kind {
            RangeKind::Date => NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok(),
            RangeKind::Numeric => raw.parse::<f64>().is_ok(),
            RangeKind::Text => true,
        };
        if ok {
            Ok(())
        } else {
            Err(Error::Validation(format!(
                "Invalid value \"{raw}\" for parameter \"{param}\""
            )))
        }
    }
}

/// Apply every declared filter whose parameter is present.
pub fn apply_filters(
    query: &mut TableQuery,
    fields: &FilterFields,
    params: &QueryParams,
) -> Result<()> {
    for field in fields.multi {
        let values = params.all(field.param);
        if !values.is_empty() {
            let idx = query.bind(BindValue::TextArray(values));
            query.filter(format!("{} = ANY(${idx})", field.column));
        }
    }

    for field in fields.range {
        if let Some(raw) = params.first(field.min_param) {
            field.validate(field.min_param, raw)?;
            let idx = query.bind(BindValue::Text(raw.to_string()));
            query.filter(format!("{} >= ${idx}{}", field.column, field.cast()));
        }
        if let Some(raw) = params.first(field.max_param) {
            field.validate(field.max_param, raw)?;
            let idx = query.bind(BindValue::Text(raw.to_string()));
            query.filter(format!("{} <= ${idx}{}", field.column, field.cast()));
        }
    }

    for field in fields.match_eq {
        if let Some(raw) = params.first(field.param) {
            let idx = query.bind(BindValue::Text(raw.to_string()));
            query.filter(format!("{} = ${idx}", field.column));
        }
    }

    for field in fields.fulltext {
        if let Some(raw) = params.first(field.param) {
            let idx = query.bind(BindValue::Text(raw.to_string()));
            query.filter(format!(
                "{} @@ plainto_tsquery('simple', ${idx})",
                field.column
            ));
        }
    }

    Ok(())
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
    pub count: i64,
    pub pages: i64,
}

#[derive(Debug, Serialize)]
pub struct Page {
    pub results: Vec<JsonValue>,
    pub pagination: Pagination,
}

/// Parse and bound `page`/`per_page`.
pub fn paging_params(params: &QueryParams) -> Result<(i64, i64)> {
    let page = params.first_parsed::<i64>("page")?.unwrap_or(1);
    let per_page = params
        .first_parsed::<i64>("per_page")?
        .unwrap_or(DEFAULT_PER_PAGE);
    if page < 1 {
        return Err(Error::Validation("page must be at least 1".to_string()));
    }
    if per_page < 1 {
        return Err(Error::Validation(
            "per_page must be at least 1".to_string(),
        ));
    }
    Ok((page, per_page.min(MAX_PER_PAGE)))
}

/// Count the full result set, then fetch the requested page.
pub async fn fetch_page(
    mut query: TableQuery,
    pool: &PgPool,
    page: i64,
    per_page: i64,
) -> Result<Page> {
    let count = query.count(pool).await?;
    query.paginate(page, per_page);
    let results = query.fetch(pool).await?;

    let pages = if count == 0 {
        0
    } else {
        (count + per_page - 1) / per_page
    };

    Ok(Page {
        results,
        pagination: Pagination {
            page,
            per_page,
            count,
            pages,
        },
    })
}

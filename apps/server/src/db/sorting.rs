//! Generic sort-key resolution.
//!
//! Maps client sort keys (optionally `-`-prefixed for descending) onto order
//! expressions for a `TableQuery`. Resolution order, first match wins:
//! aliases, join rules, model columns, then the labels of a heterogeneous
//! query's projections. Unrecognized keys are an explicit error in every
//! path.

use super::models::{Column, Model};
use super::query::TableQuery;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// A sort key with its direction marker stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub key: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix('-') {
            Some(key) => Self {
                key: key.to_string(),
                direction: SortDirection::Desc,
            },
            None => Self {
                key: raw.to_string(),
                direction: SortDirection::Asc,
            },
        }
    }
}

/// Sorting on a related table's column: the order expression plus the join
/// that makes it addressable.
#[derive(Debug)]
pub struct JoinRule {
    pub column: &'static Column,
    pub relationship: &'static str,
}

#[derive(Debug)]
pub struct ResolvedOrder {
    /// SQL expression to order by.
    pub expr: String,
    /// Bare column name, used for sort-expression substitution and not-null
    /// filtering.
    pub name: String,
    pub direction: SortDirection,
    pub relationship: Option<&'static str>,
}

/// Resolve a sort key to an order expression.
///
/// `model` must be `None` for heterogeneous queries; the key is then matched
/// against the query's projection labels instead.
pub fn parse_option(
    raw: &str,
    model: Option<&'static Model>,
    aliases: &[(&'static str, &'static Column)],
    join_rules: &[(&'static str, JoinRule)],
    query: &TableQuery,
) -> Result<ResolvedOrder> {
    let spec = SortSpec::parse(raw);

    if let Some((_, column)) = aliases.iter().find(|(key, _)| *key == spec.key) {
        return Ok(ResolvedOrder {
            expr: column.sql.to_string(),
            name: column.name.to_string(),
            direction: spec.direction,
            relationship: None,
        });
    }

    if let Some((_, rule)) = join_rules.iter().find(|(key, _)| *key == spec.key) {
        return Ok(ResolvedOrder {
            expr: rule.column.sql.to_string(),
            name: rule.column.name.to_string(),
            direction: spec.direction,
            relationship: Some(rule.relationship),
        });
    }

    if let Some(model) = model {
        let column = model
            .column(&spec.key)
            .ok_or_else(|| Error::FieldNotFound(spec.key.clone()))?;
        return Ok(ResolvedOrder {
            expr: column.sql.to_string(),
            name: column.name.to_string(),
            direction: spec.direction,
            relationship: None,
        });
    }

    // Heterogeneous query: match the key against projected output labels,
    // resolving back to the owning model's column where one is mapped.
    for projection in query.projections() {
        if projection.label != spec.key {
            continue;
        }
        if let Some(model) = projection.model {
            let column = model
                .column(&spec.key)
                .ok_or_else(|| Error::FieldNotFound(spec.key.clone()))?;
            return Ok(ResolvedOrder {
                expr: column.sql.to_string(),
                name: column.name.to_string(),
                direction: spec.direction,
                relationship: None,
            });
        }
        // Unmapped projection: order by the output label itself.
        return Ok(ResolvedOrder {
            expr: projection.label.clone(),
            name: projection.label.clone(),
            direction: spec.direction,
            relationship: None,
        });
    }

    Err(Error::FieldNotFound(spec.key))
}

/// Apply one sort key to the query.
///
/// Substitutes a registered computed sort expression when the model declares
/// one for the resolved column, joins the relationship a join rule produced,
/// and optionally filters out null sort values.
pub fn sort(
    query: &mut TableQuery,
    key: &str,
    model: Option<&'static Model>,
    aliases: &[(&'static str, &'static Column)],
    join_rules: &[(&'static str, JoinRule)],
    clear: bool,
    hide_null: bool,
) -> Result<()> {
    if clear {
        query.clear_order();
    }

    // Resolving against the model is only safe when the query projects that
    // single model; a heterogeneous projection resolves by label instead.
    let sort_model = if query.projects_single_model() {
        model
    } else {
        None
    };

    let resolved = parse_option(key, sort_model, aliases, join_rules, query)?;

    let mut expr = resolved.expr;
    if let Some(model) = model {
        if let Some(substitute) = model.sort_expression(&resolved.name) {
            expr = substitute.to_string();
        }
    }

    query.order_by(format!("{} {}", expr, resolved.direction.as_sql()));

    if let Some(relationship) = resolved.relationship {
        query.join(relationship);
    }
    if hide_null {
        query.filter(format!("{expr} IS NOT NULL"));
    }

    Ok(())
}

/// Apply an ordered sequence of sort keys, composing order expressions so
/// later keys break ties within earlier ones.
pub fn multi_sort(
    query: &mut TableQuery,
    keys: &[&str],
    model: Option<&'static Model>,
    aliases: &[(&'static str, &'static Column)],
    join_rules: &[(&'static str, JoinRule)],
    clear: bool,
    hide_null: bool,
) -> Result<()> {
    if clear {
        query.clear_order();
    }
    for key in keys {
        sort(query, key, model, aliases, join_rules, false, hide_null)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::SCHEDULE_D;

    static COMMITTEE_NAME: Column = Column {
        name: "committee_name",
        sql: "cm.name",
    };

    fn join_rules() -> Vec<(&'static str, JoinRule)> {
        vec![(
            "committee_name",
            JoinRule {
                column: &COMMITTEE_NAME,
                relationship: "JOIN ofec_committees cm ON cm.committee_id = sd.committee_id",
            },
        )]
    }

    #[test]
    fn parses_direction_marker() {
        let spec = SortSpec::parse("-load_date");
        assert_eq!(spec.key, "load_date");
        assert_eq!(spec.direction, SortDirection::Desc);
        assert_eq!(SortSpec::parse("load_date").direction, SortDirection::Asc);
    }

    #[test]
    fn alias_bypasses_model_lookup() {
        // "load_date" is also a model column; the alias must win.
        static ALIASED: Column = Column {
            name: "report_year",
            sql: "sd.report_year",
        };
        let query = TableQuery::new(&SCHEDULE_D);
        let resolved = parse_option(
            "load_date",
            Some(&SCHEDULE_D),
            &[("load_date", &ALIASED)],
            &[],
            &query,
        )
        .unwrap();
        assert_eq!(resolved.expr, "sd.report_year");
    }

    #[test]
    fn join_rule_carries_relationship() {
        let rules = join_rules();
        let query = TableQuery::new(&SCHEDULE_D);
        let resolved =
            parse_option("-committee_name", Some(&SCHEDULE_D), &[], &rules, &query).unwrap();
        assert_eq!(resolved.expr, "cm.name");
        assert_eq!(resolved.direction, SortDirection::Desc);
        assert!(resolved.relationship.unwrap().contains("ofec_committees"));
    }

    #[test]
    fn unknown_key_against_model_is_field_not_found() {
        let query = TableQuery::new(&SCHEDULE_D);
        let err = parse_option("mystery", Some(&SCHEDULE_D), &[], &[], &query).unwrap_err();
        assert!(matches!(err, Error::FieldNotFound(ref key) if key == "mystery"));
    }

    #[test]
    fn heterogeneous_query_resolves_by_projection_label() {
        let mut query = TableQuery::new(&SCHEDULE_D);
        query.select_expr("committee_id", "sd.committee_id", Some(&SCHEDULE_D));
        query.select_expr("total", "SUM(sd.payment_period)", None);

        let by_model = parse_option("committee_id", None, &[], &[], &query).unwrap();
        assert_eq!(by_model.expr, "sd.committee_id");

        // Unmapped projection orders by the output label.
        let by_label = parse_option("total", None, &[], &[], &query).unwrap();
        assert_eq!(by_label.expr, "total");
    }

    #[test]
    fn heterogeneous_query_with_no_matching_label_is_an_error() {
        let mut query = TableQuery::new(&SCHEDULE_D);
        query.select_expr("total", "SUM(sd.payment_period)", None);
        let err = parse_option("missing", None, &[], &[], &query).unwrap_err();
        assert!(matches!(err, Error::FieldNotFound(_)));
    }

    #[test]
    fn sort_substitutes_registered_expression() {
        let mut query = TableQuery::new(&SCHEDULE_D);
        sort(
            &mut query,
            "image_number",
            Some(&SCHEDULE_D),
            &[],
            &[],
            false,
            false,
        )
        .unwrap();
        assert_eq!(
            query.order_exprs(),
            &["CAST(sd.image_number AS BIGINT) ASC".to_string()]
        );
    }

    #[test]
    fn sort_with_hide_null_filters_sort_column() {
        let mut query = TableQuery::new(&SCHEDULE_D);
        sort(
            &mut query,
            "-load_date",
            Some(&SCHEDULE_D),
            &[],
            &[],
            false,
            true,
        )
        .unwrap();
        let (sql, _) = query.build_sql();
        assert!(sql.contains("sd.load_date IS NOT NULL"));
        assert!(sql.contains("ORDER BY sd.load_date DESC"));
    }

    #[test]
    fn sort_joins_relationship_once() {
        let rules = join_rules();
        let mut query = TableQuery::new(&SCHEDULE_D);
        sort(
            &mut query,
            "committee_name",
            Some(&SCHEDULE_D),
            &[],
            &rules,
            false,
            false,
        )
        .unwrap();
        let (sql, _) = query.build_sql();
        assert!(sql.contains("JOIN ofec_committees cm"));
        assert!(sql.contains("ORDER BY cm.name ASC"));
    }

    #[test]
    fn multi_sort_composes_tie_breakers() {
        let mut query = TableQuery::new(&SCHEDULE_D);
        multi_sort(
            &mut query,
            &["-load_date", "sub_id"],
            Some(&SCHEDULE_D),
            &[],
            &[],
            false,
            false,
        )
        .unwrap();
        assert_eq!(
            query.order_exprs(),
            &[
                "sd.load_date DESC".to_string(),
                "sd.sub_id ASC".to_string()
            ]
        );

        // Equivalent to sequential sort() calls without clearing.
        let mut sequential = TableQuery::new(&SCHEDULE_D);
        sort(
            &mut sequential,
            "-load_date",
            Some(&SCHEDULE_D),
            &[],
            &[],
            false,
            false,
        )
        .unwrap();
        sort(
            &mut sequential,
            "sub_id",
            Some(&SCHEDULE_D),
            &[],
            &[],
            false,
            false,
        )
        .unwrap();
        assert_eq!(query.order_exprs(), sequential.order_exprs());
    }

    #[test]
    fn clear_resets_prior_ordering() {
        let mut query = TableQuery::new(&SCHEDULE_D);
        query.order_by("sd.report_year ASC".to_string());
        sort(
            &mut query,
            "load_date",
            Some(&SCHEDULE_D),
            &[],
            &[],
            true,
            false,
        )
        .unwrap();
        assert_eq!(query.order_exprs(), &["sd.load_date ASC".to_string()]);
    }
}

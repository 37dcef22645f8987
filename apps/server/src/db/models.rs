//! Static model descriptors.
//!
//! Every table the API serves is described by a `Model`: table name, row
//! alias, payload expression, and the columns clients may reference by name.
//! All string-to-column resolution goes through this registry; there is no
//! runtime reflection.

/// A sortable/filterable column of a model.
#[derive(Debug)]
pub struct Column {
    /// Name clients use in query parameters.
    pub name: &'static str,
    /// Qualified SQL reference.
    pub sql: &'static str,
}

#[derive(Debug)]
pub struct Model {
    pub table: &'static str,
    pub alias: &'static str,
    /// SELECT expression producing the row payload as JSON.
    pub payload: &'static str,
    pub columns: &'static [Column],
    /// Columns whose sort order comes from a derived expression rather than
    /// the stored value.
    pub sort_expressions: &'static [(&'static str, &'static str)],
}

impl Model {
    pub fn column(&self, name: &str) -> Option<&'static Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn sort_expression(&self, name: &str) -> Option<&'static str> {
        self.sort_expressions
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, expr)| *expr)
    }
}

/// Schedule D: debts and obligations reported by committees.
pub static SCHEDULE_D: Model = Model {
    table: "ofec_sched_d",
    alias: "sd",
    // The tsvector column exists only to serve full-text filters.
    payload: "to_jsonb(sd) - 'creditor_debtor_name_text'",
    columns: &[
        Column {
            name: "sub_id",
            sql: "sd.sub_id",
        },
        Column {
            name: "committee_id",
            sql: "sd.committee_id",
        },
        Column {
            name: "candidate_id",
            sql: "sd.candidate_id",
        },
        Column {
            name: "image_number",
            sql: "sd.image_number",
        },
        Column {
            name: "load_date",
            sql: "sd.load_date",
        },
        Column {
            name: "report_year",
            sql: "sd.report_year",
        },
        Column {
            name: "payment_period",
            sql: "sd.payment_period",
        },
        Column {
            name: "amount_incurred_period",
            sql: "sd.amount_incurred_period",
        },
        Column {
            name: "nature_of_debt",
            sql: "sd.nature_of_debt",
        },
        Column {
            name: "creditor_debtor_name",
            sql: "sd.creditor_debtor_name",
        },
    ],
    // Image numbers are stored as text but order numerically.
    sort_expressions: &[("image_number", "CAST(sd.image_number AS BIGINT)")],
};

static MODELS: &[&Model] = &[&SCHEDULE_D];

/// Look up a model by its table name (used when resolving sort keys against
/// heterogeneous query projections).
pub fn model_for_table(table: &str) -> Option<&'static Model> {
    MODELS.iter().find(|m| m.table == table).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_column() {
        let column = SCHEDULE_D.column("load_date").unwrap();
        assert_eq!(column.sql, "sd.load_date");
    }

    #[test]
    fn unknown_column_is_none() {
        assert!(SCHEDULE_D.column("no_such_column").is_none());
    }

    #[test]
    fn image_number_has_sort_expression() {
        let expr = SCHEDULE_D.sort_expression("image_number").unwrap();
        assert!(expr.contains("CAST"));
        assert!(SCHEDULE_D.sort_expression("load_date").is_none());
    }

    #[test]
    fn model_registry_resolves_by_table() {
        assert!(model_for_table("ofec_sched_d").is_some());
        assert!(model_for_table("missing_table").is_none());
    }
}

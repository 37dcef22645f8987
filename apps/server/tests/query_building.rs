//! End-to-end query construction through the public API: HTTP-style
//! parameters in, rendered SQL and index query documents out.

use docket::api::params::QueryParams;
use docket::db::list::{
    apply_filters, FilterFields, FulltextField, MatchField, MultiField, RangeField, RangeKind,
};
use docket::db::models::SCHEDULE_D;
use docket::db::sorting::multi_sort;
use docket::db::TableQuery;
use docket::search::engine::{TypeSelector, UniversalSearchParams};
use docket::search::query_string::parse_query_string;

static FIELDS: FilterFields = FilterFields {
    multi: &[MultiField {
        param: "committee_id",
        column: "sd.committee_id",
    }],
    range: &[RangeField {
        min_param: "min_date",
        max_param: "max_date",
        column: "sd.load_date",
        kind: RangeKind::Date,
    }],
    match_eq: &[MatchField {
        param: "nature_of_debt",
        column: "sd.nature_of_debt",
    }],
    fulltext: &[FulltextField {
        param: "creditor_debtor_name",
        column: "sd.creditor_debtor_name_text",
    }],
};

#[test]
fn list_request_renders_filtered_sorted_paginated_sql() {
    let params = QueryParams::parse(
        "committee_id=C00000935&min_date=2017-01-01&creditor_debtor_name=acme&sort=-load_date&sort=image_number",
    );

    let mut query = TableQuery::new(&SCHEDULE_D);
    apply_filters(&mut query, &FIELDS, &params).unwrap();

    let sort_keys = params.all("sort");
    let keys: Vec<&str> = sort_keys.iter().map(String::as_str).collect();
    multi_sort(&mut query, &keys, Some(&SCHEDULE_D), &[], &[], false, false).unwrap();
    query.paginate(2, 30);

    let (sql, binds) = query.build_sql();
    assert!(sql.contains("sd.committee_id = ANY($1)"));
    assert!(sql.contains("sd.load_date >= $2::date"));
    assert!(sql.contains("sd.creditor_debtor_name_text @@ plainto_tsquery('simple', $3)"));
    assert!(sql.contains("ORDER BY sd.load_date DESC, CAST(sd.image_number AS BIGINT) ASC"));
    assert!(sql.ends_with("LIMIT 30 OFFSET 30"));
    assert_eq!(binds.len(), 3);

    let (count_sql, count_binds) = query.build_count_sql();
    assert!(count_sql.starts_with("SELECT COUNT(*)"));
    assert!(!count_sql.contains("LIMIT"));
    assert_eq!(count_binds.len(), 3);
}

#[test]
fn universal_search_parameters_parse_from_query_string() {
    let params = QueryParams::parse(
        "q=corporate+%22independent+expenditure%22&type=advisory_opinions&hits_returned=500\
         &ao_requestor_type=1&ao_no=2014-01&ao_regulatory_citation=11+CFR+100.5",
    );

    let search = UniversalSearchParams::from_params(&params).unwrap();
    assert!(matches!(search.doc_type, TypeSelector::One(_)));
    assert_eq!(search.hits_returned, 500); // clamped downstream, not here
    assert_eq!(search.ao.no, vec!["2014-01"]);

    let parsed = parse_query_string(&search.q);
    assert_eq!(parsed.terms, vec!["corporate"]);
    assert_eq!(parsed.phrases, vec!["independent expenditure"]);

    let clauses = search.ao.clauses().unwrap();
    let rendered: Vec<_> = clauses.iter().map(|c| c.to_json()).collect();
    // category (defaulted), no, citations, requestor type
    assert_eq!(rendered.len(), 4);
}

#[test]
fn unknown_requestor_type_surfaces_an_error() {
    let params = QueryParams::parse("ao_requestor_type=99");
    let search = UniversalSearchParams::from_params(&params).unwrap();
    assert!(search.ao.clauses().is_err());
}

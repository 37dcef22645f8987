//! Schedule D (debts and obligations) handlers
//!
//! - `GET /schedules/schedule_d` - filtered, sorted, paginated debt rows
//! - `GET /schedules/schedule_d/{sub_id}` - single-key lookup

use crate::api::params::QueryParams;
use crate::db::list::{
    apply_filters, fetch_page, paging_params, FilterFields, FulltextField, MatchField, MultiField,
    Page, RangeField, RangeKind,
};
use crate::db::models::SCHEDULE_D;
use crate::db::sorting::multi_sort;
use crate::db::{BindValue, TableQuery};
use crate::state::AppState;
use crate::Result;
use axum::{
    extract::{Path, RawQuery, State},
    Json,
};

static SCHEDULE_D_FIELDS: FilterFields = FilterFields {
    multi: &[
        MultiField {
            param: "image_number",
            column: "sd.image_number",
        },
        MultiField {
            param: "committee_id",
            column: "sd.committee_id",
        },
        MultiField {
            param: "candidate_id",
            column: "sd.candidate_id",
        },
    ],
    range: &[
        RangeField {
            min_param: "min_date",
            max_param: "max_date",
            column: "sd.load_date",
            kind: RangeKind::Date,
        },
        RangeField {
            min_param: "min_payment_period",
            max_param: "max_payment_period",
            column: "sd.payment_period",
            kind: RangeKind::Numeric,
        },
        RangeField {
            min_param: "min_amount_incurred_period",
            max_param: "max_amount_incurred_period",
            column: "sd.amount_incurred_period",
            kind: RangeKind::Numeric,
        },
        RangeField {
            // Image numbers are zero-padded fixed width; text comparison
            // preserves numeric order.
            min_param: "min_image_number",
            max_param: "max_image_number",
            column: "sd.image_number",
            kind: RangeKind::Text,
        },
    ],
    match_eq: &[MatchField {
        param: "nature_of_debt",
        column: "sd.nature_of_debt",
    }],
    fulltext: &[FulltextField {
        param: "creditor_debtor_name",
        column: "sd.creditor_debtor_name_text",
    }],
};

const DEFAULT_SORT: &str = "load_date";

pub async fn schedule_d_list(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Page>> {
    let params = QueryParams::parse(raw_query.as_deref().unwrap_or(""));

    let mut query = TableQuery::new(&SCHEDULE_D);
    apply_filters(&mut query, &SCHEDULE_D_FIELDS, &params)?;

    if let Some(sub_id) = params.first_parsed::<i64>("sub_id")? {
        query.filter_eq("sd.sub_id", BindValue::Int(sub_id));
    }

    let sort_params = params.all("sort");
    let keys: Vec<&str> = if sort_params.is_empty() {
        vec![DEFAULT_SORT]
    } else {
        sort_params.iter().map(String::as_str).collect()
    };
    let hide_null = params.first_bool("sort_hide_null")?.unwrap_or(false);
    multi_sort(
        &mut query,
        &keys,
        Some(&SCHEDULE_D),
        &[],
        &[],
        false,
        hide_null,
    )?;
    // Deterministic ordering across pages.
    query.order_by("sd.sub_id ASC".to_string());

    let (page, per_page) = paging_params(&params)?;
    let page = fetch_page(query, &state.pool, page, per_page).await?;
    Ok(Json(page))
}

pub async fn schedule_d_by_sub_id(
    State(state): State<AppState>,
    Path(sub_id): Path<i64>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<Page>> {
    let params = QueryParams::parse(raw_query.as_deref().unwrap_or(""));

    let mut query = TableQuery::new(&SCHEDULE_D);
    query.filter_eq("sd.sub_id", BindValue::Int(sub_id));

    let (page, per_page) = paging_params(&params)?;
    let page = fetch_page(query, &state.pool, page, per_page).await?;
    Ok(Json(page))
}

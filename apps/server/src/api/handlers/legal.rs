//! Legal document search handlers
//!
//! - `GET /legal/search` - universal search across document types
//! - `GET /legal/citation/{citation_type}/{citation}` - citation lookup
//! - `GET /legal/docs/{doc_type}/{no}` - document fetch by number

use crate::api::params::QueryParams;
use crate::search::engine::UniversalSearchParams;
use crate::state::AppState;
use crate::Result;
use axum::{
    extract::{Path, RawQuery, State},
    Json,
};
use serde_json::Value as JsonValue;

/// Search one or all document types with free text plus per-domain filters.
///
/// Response shape: `{<type>: [hits], total_<type>: N, ..., total_all: N}`.
pub async fn universal_search(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<JsonValue>> {
    let params = QueryParams::parse(raw_query.as_deref().unwrap_or(""));
    let search_params = UniversalSearchParams::from_params(&params)?;
    let results = state.search.universal_search(&search_params).await?;
    Ok(Json(results))
}

/// Wildcard citation text lookup. Response shape: `{citations: [...]}`.
pub async fn citation_search(
    State(state): State<AppState>,
    Path((citation_type, citation)): Path<(String, String)>,
) -> Result<Json<JsonValue>> {
    let results = state
        .search
        .citation_search(&citation_type, &citation)
        .await?;
    Ok(Json(results))
}

/// Fetch documents of one type by number. Response shape: `{docs: [...]}`.
pub async fn document_lookup(
    State(state): State<AppState>,
    Path((doc_type, no)): Path<(String, String)>,
) -> Result<Json<JsonValue>> {
    let results = state.search.document_lookup(&doc_type, &no).await?;
    Ok(Json(results))
}

//! Search orchestration.
//!
//! Builds the per-type boolean query, attaches highlight configuration,
//! executes against the document index, and aggregates per-type and grand
//! totals. Types within one universal search run sequentially so aggregation
//! order stays reproducible.

use super::client::{DocumentIndex, Hit, IndexClient};
use super::dsl::{Highlight, Query, SearchBody};
use super::filters::{AoFilters, MurFilters};
use super::query_string::{parse_query_string, ParsedQuery};
use crate::api::params::QueryParams;
use crate::{Error, Result};
use serde_json::{json, Map, Value as JsonValue};

pub const MAX_HITS_RETURNED: u32 = 200;

const HIGHLIGHT_FIELDS: [&str; 6] = [
    "text",
    "name",
    "no",
    "summary",
    "documents.text",
    "documents.description",
];

const SOURCE_EXCLUDES: [&str; 4] = ["text", "documents.text", "sort1", "sort2"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocType {
    Statutes,
    Regulations,
    AdvisoryOpinions,
    Murs,
}

/// Expansion order for `type=all`.
pub const UNIVERSAL_SEARCH_TYPES: [DocType; 4] = [
    DocType::Statutes,
    DocType::Regulations,
    DocType::AdvisoryOpinions,
    DocType::Murs,
];

impl DocType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Statutes => "statutes",
            Self::Regulations => "regulations",
            Self::AdvisoryOpinions => "advisory_opinions",
            Self::Murs => "murs",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "statutes" => Some(Self::Statutes),
            "regulations" => Some(Self::Regulations),
            "advisory_opinions" => Some(Self::AdvisoryOpinions),
            "murs" => Some(Self::Murs),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeSelector {
    All,
    One(DocType),
}

impl TypeSelector {
    pub fn parse(value: &str) -> Result<Self> {
        if value == "all" {
            return Ok(Self::All);
        }
        DocType::parse(value).map(Self::One).ok_or_else(|| {
            Error::Validation(format!("Invalid value \"{value}\" for parameter \"type\""))
        })
    }

    fn types(self) -> Vec<DocType> {
        match self {
            Self::All => UNIVERSAL_SEARCH_TYPES.to_vec(),
            Self::One(doc_type) => vec![doc_type],
        }
    }
}

#[derive(Debug, Clone)]
pub struct UniversalSearchParams {
    pub q: String,
    pub from_hit: u32,
    pub hits_returned: u32,
    pub doc_type: TypeSelector,
    pub ao: AoFilters,
    pub mur: MurFilters,
}

impl UniversalSearchParams {
    pub fn from_params(params: &QueryParams) -> Result<Self> {
        Ok(Self {
            q: params.first("q").unwrap_or_default().to_string(),
            from_hit: params.first_parsed("from_hit")?.unwrap_or(0),
            hits_returned: params.first_parsed("hits_returned")?.unwrap_or(20),
            doc_type: TypeSelector::parse(params.first("type").unwrap_or("all"))?,
            ao: AoFilters::from_params(params)?,
            mur: MurFilters::from_params(params)?,
        })
    }
}

pub struct SearchEngine<I = IndexClient> {
    index: I,
}

impl<I: DocumentIndex> SearchEngine<I> {
    pub fn new(index: I) -> Self {
        Self { index }
    }

    /// Search one or all document types, aggregating per-type hits and
    /// totals plus a grand total.
    pub async fn universal_search(&self, params: &UniversalSearchParams) -> Result<JsonValue> {
        let parsed = parse_query_string(&params.q);
        let size = params.hits_returned.min(MAX_HITS_RETURNED);

        let mut results = Map::new();
        let mut total_all: u64 = 0;

        for doc_type in params.doc_type.types() {
            let body = build_type_body(
                doc_type,
                &params.q,
                &parsed,
                &params.ao,
                &params.mur,
                params.from_hit,
                size,
            )?;
            let response = self.index.search(&body).await?;

            tracing::debug!(
                doc_type = doc_type.as_str(),
                total = response.total,
                "search type completed"
            );

            let hits: Vec<JsonValue> = response.hits.iter().map(format_hit).collect();
            total_all += response.total;
            results.insert(doc_type.as_str().to_string(), JsonValue::Array(hits));
            results.insert(
                format!("total_{}", doc_type.as_str()),
                json!(response.total),
            );
        }

        results.insert("total_all".to_string(), json!(total_all));
        Ok(JsonValue::Object(results))
    }

    /// Wildcard lookup of citation records by citation text.
    pub async fn citation_search(
        &self,
        citation_type: &str,
        citation: &str,
    ) -> Result<JsonValue> {
        let query = Query::bool_()
            .must(Query::term("_type", "citations"))
            .must(Query::match_("citation_type", citation_type))
            .must(Query::wildcard("text", &format!("*{citation}*")))
            .build();

        let mut body = SearchBody::new(query);
        body.size = 10;

        let response = self.index.search(&body).await?;
        let citations: Vec<JsonValue> = response
            .hits
            .iter()
            .map(|hit| JsonValue::Object(hit.source.clone()))
            .collect();
        Ok(json!({ "citations": citations }))
    }

    /// Fetch documents of one type by document number, raw text excluded.
    pub async fn document_lookup(&self, doc_type: &str, no: &str) -> Result<JsonValue> {
        let query = Query::bool_()
            .must(Query::term("no", no))
            .must(Query::term("_type", doc_type))
            .build();

        let mut body = SearchBody::new(query);
        body.source_excludes = vec!["text".to_string()];
        body.size = 200;

        let response = self.index.search(&body).await?;
        let docs: Vec<JsonValue> = response
            .hits
            .iter()
            .map(|hit| JsonValue::Object(hit.source.clone()))
            .collect();
        Ok(json!({ "docs": docs }))
    }
}

/// Build the full request body for one document type.
fn build_type_body(
    doc_type: DocType,
    raw_query: &str,
    parsed: &ParsedQuery,
    ao: &AoFilters,
    mur: &MurFilters,
    from_hit: u32,
    size: u32,
) -> Result<SearchBody> {
    let mut must = vec![Query::term("_type", doc_type.as_str())];
    let mut highlight_parts = Vec::new();

    if !parsed.terms.is_empty() {
        let term_query = Query::match_("_all", &parsed.terms.join(" "));
        must.push(term_query.clone());
        highlight_parts.push(term_query);
    }

    if !parsed.phrases.is_empty() {
        let phrase_queries: Vec<Query> = parsed
            .phrases
            .iter()
            .map(|phrase| Query::match_phrase("_all", phrase))
            .collect();
        must.extend(phrase_queries.clone());
        highlight_parts.push(Query::bool_().must_all(phrase_queries).build());
    }

    match doc_type {
        DocType::AdvisoryOpinions => must.extend(ao.clauses()?),
        DocType::Murs => must.extend(mur.clauses(raw_query)),
        _ => {}
    }

    let query = Query::bool_()
        .must_all(must)
        // Boost exact number matches and loosely-ordered phrase matches.
        .should(Query::match_("no", raw_query))
        .should(Query::match_phrase_slop("_all", raw_query, 50))
        .build();

    // Highlighting reflects only the free-text match, not type or domain
    // filters.
    let highlight_query = if highlight_parts.is_empty() {
        None
    } else {
        Some(Query::bool_().must_all(highlight_parts).build())
    };

    let mut body = SearchBody::new(query);
    body.highlight = Some(Highlight {
        fields: HIGHLIGHT_FIELDS.iter().map(|f| f.to_string()).collect(),
        highlight_query,
    });
    body.source_excludes = SOURCE_EXCLUDES.iter().map(|f| f.to_string()).collect();
    body.from = from_hit;
    body.size = size;
    body.sort = vec!["sort1".to_string(), "sort2".to_string()];

    Ok(body)
}

/// Shape one hit for the response: stored fields plus highlight fragments
/// flattened across all matched fields, in field order.
fn format_hit(hit: &Hit) -> JsonValue {
    let mut shaped = hit.source.clone();
    let mut highlights = Vec::new();
    for (_field, fragments) in &hit.highlight {
        if let Some(fragments) = fragments.as_array() {
            highlights.extend(fragments.iter().cloned());
        }
    }
    shaped.insert("highlights".to_string(), JsonValue::Array(highlights));
    JsonValue::Object(shaped)
}

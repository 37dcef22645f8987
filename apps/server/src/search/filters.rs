//! Per-domain filter composers.
//!
//! Each composer reads its recognized parameters and returns predicate nodes
//! that conjoin into the type's boolean query. Composition never mutates an
//! existing node.

use super::dsl::Query;
use crate::api::params::QueryParams;
use crate::{Error, Result};
use chrono::NaiveDate;
use docket_citation::{parse_regulatory, parse_statutory};
use serde_json::json;

/// Advisory-opinion document category codes.
static AO_CATEGORIES: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "F" => "Final Opinion",
    "V" => "Votes",
    "D" => "Draft Documents",
    "R" => "AO Request, Supplemental Material, and Extensions of Time",
    "W" => "Withdrawal of Request",
    "C" => "Comments and Ex parte Communications",
    "S" => "Commissioner Statements",
};

/// Advisory-opinion requestor type codes.
static REQUESTOR_TYPES: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "1" => "Federal candidate/candidate committee/officeholder",
    "2" => "Publicly funded candidates/committees",
    "3" => "Party committee, national",
    "4" => "Party committee, state or local",
    "5" => "Nonconnected political committee",
    "6" => "Separate segregated fund",
    "7" => "Labor Organization",
    "8" => "Trade Association",
    "9" => "Membership Organization, Cooperative, Corporation W/O Capital Stock",
    "10" => "Corporation (including LLCs electing corporate status)",
    "11" => "Partnership (including LLCs electing partnership status)",
    "12" => "Governmental entity",
    "13" => "Research/Public Interest/Educational Institution",
    "14" => "Law Firm",
    "15" => "Individual",
    "16" => "Other",
};

/// Filters recognized on enforcement matters (MURs).
#[derive(Debug, Clone, Default)]
pub struct MurFilters {
    pub no: Vec<String>,
    pub respondents: Option<String>,
    pub dispositions: Vec<String>,
    pub election_cycles: Option<i64>,
    pub document_category: Vec<String>,
}

impl MurFilters {
    pub fn from_params(params: &QueryParams) -> Result<Self> {
        Ok(Self {
            no: params.all("mur_no"),
            respondents: params.first("mur_respondents").map(str::to_string),
            dispositions: params.all("mur_dispositions"),
            election_cycles: params.first_parsed("mur_election_cycles")?,
            document_category: params.all("mur_document_category"),
        })
    }

    /// Predicates to conjoin into the MUR query. `raw_query` is the full
    /// free-text search string, matched against document text inside the
    /// document-category nested clause.
    pub fn clauses(&self, raw_query: &str) -> Vec<Query> {
        let mut clauses = Vec::new();

        if !self.no.is_empty() {
            clauses.push(Query::terms("no", self.no.clone()));
        }
        if let Some(respondents) = &self.respondents {
            clauses.push(Query::match_("respondents", respondents));
        }
        if !self.dispositions.is_empty() {
            clauses.push(Query::terms(
                "disposition.data.disposition",
                self.dispositions.clone(),
            ));
        }
        if let Some(cycle) = self.election_cycles {
            clauses.push(Query::term("election_cycles", cycle));
        }
        if !self.document_category.is_empty() {
            clauses.push(Query::nested(
                "documents",
                Query::bool_()
                    .must(Query::terms(
                        "documents.category",
                        self.document_category.clone(),
                    ))
                    .must(Query::match_("documents.text", raw_query))
                    .build(),
            ));
        }

        clauses
    }
}

/// Filters recognized on advisory opinions.
#[derive(Debug, Clone, Default)]
pub struct AoFilters {
    pub category: Vec<String>,
    pub no: Vec<String>,
    pub name: Vec<String>,
    pub is_pending: Option<bool>,
    pub requestor: Option<String>,
    pub requestor_type: Vec<String>,
    pub regulatory_citation: Vec<String>,
    pub statutory_citation: Vec<String>,
    pub citation_require_all: bool,
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
}

impl AoFilters {
    pub fn from_params(params: &QueryParams) -> Result<Self> {
        Ok(Self {
            category: params.all("ao_category"),
            no: params.all("ao_no"),
            name: params.all("ao_name"),
            is_pending: params.first_bool("ao_is_pending")?,
            requestor: params.first("ao_requestor").map(str::to_string),
            requestor_type: params.all("ao_requestor_type"),
            regulatory_citation: params.all("ao_regulatory_citation"),
            statutory_citation: params.all("ao_statutory_citation"),
            citation_require_all: params
                .first_bool("ao_citation_require_all")?
                .unwrap_or(false),
            min_date: params.first_date("ao_min_date")?,
            max_date: params.first_date("ao_max_date")?,
        })
    }

    /// Predicates to conjoin into the advisory-opinion query.
    pub fn clauses(&self) -> Result<Vec<Query>> {
        let mut clauses = Vec::new();

        // Category filter always applies; unspecified means final opinions.
        let categories = if self.category.is_empty() {
            vec!["Final Opinion".to_string()]
        } else {
            self.category
                .iter()
                .map(|code| {
                    AO_CATEGORIES
                        .get(code.as_str())
                        .map(|label| label.to_string())
                        .ok_or_else(|| Error::UnknownCategoryCode(code.clone()))
                })
                .collect::<Result<Vec<_>>>()?
        };
        clauses.push(Query::terms("category", categories));

        if !self.no.is_empty() {
            clauses.push(Query::terms("no", self.no.clone()));
        }
        if !self.name.is_empty() {
            clauses.push(Query::match_("name", &self.name.join(" ")));
        }
        if let Some(pending) = self.is_pending {
            clauses.push(Query::term("is_pending", pending));
        }
        if let Some(requestor) = &self.requestor {
            clauses.push(Query::match_("requestor_names", requestor));
        }

        let citation_queries = self.citation_queries();
        if !citation_queries.is_empty() {
            let combined = if self.citation_require_all {
                Query::bool_().must_all(citation_queries).build()
            } else {
                Query::bool_()
                    .should_all(citation_queries)
                    .minimum_should_match(1)
                    .build()
            };
            clauses.push(combined);
        }

        if !self.requestor_type.is_empty() {
            let labels = self
                .requestor_type
                .iter()
                .map(|code| {
                    REQUESTOR_TYPES
                        .get(code.as_str())
                        .map(|label| label.to_string())
                        .ok_or_else(|| Error::UnknownRequestorType(code.clone()))
                })
                .collect::<Result<Vec<_>>>()?;
            clauses.push(Query::terms("requestor_types", labels));
        }

        if self.min_date.is_some() || self.max_date.is_some() {
            clauses.push(Query::range(
                "issue_date",
                self.min_date.map(|d| json!(d.to_string())),
                self.max_date.map(|d| json!(d.to_string())),
            ));
        }

        Ok(clauses)
    }

    /// One nested predicate per citation string that parses; strings matching
    /// neither grammar contribute nothing.
    fn citation_queries(&self) -> Vec<Query> {
        let mut queries = Vec::new();

        for raw in &self.regulatory_citation {
            if let Some(citation) = parse_regulatory(raw) {
                queries.push(Query::nested(
                    "regulatory_citations",
                    Query::bool_()
                        .must(Query::term("regulatory_citations.title", citation.title))
                        .must(Query::term("regulatory_citations.part", citation.part))
                        .must(Query::term("regulatory_citations.section", citation.section))
                        .build(),
                ));
            }
        }

        for raw in &self.statutory_citation {
            if let Some(citation) = parse_statutory(raw) {
                queries.push(Query::nested(
                    "statutory_citations",
                    Query::bool_()
                        .must(Query::term("statutory_citations.title", citation.title))
                        .must(Query::term("statutory_citations.section", citation.section))
                        .build(),
                ));
            }
        }

        queries
    }
}

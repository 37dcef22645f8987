//! Boolean query tree for the document search index.
//!
//! Composers build immutable `Query` nodes; `to_json` renders the index's
//! JSON DSL. Nodes are never mutated after construction, so domain composers
//! stay independently testable.

use serde_json::{json, Map, Value as JsonValue};

#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Term {
        field: String,
        value: JsonValue,
    },
    Terms {
        field: String,
        values: Vec<JsonValue>,
    },
    Match {
        field: String,
        query: String,
    },
    MatchPhrase {
        field: String,
        query: String,
        slop: Option<u32>,
    },
    Range {
        field: String,
        gte: Option<JsonValue>,
        lte: Option<JsonValue>,
    },
    Wildcard {
        field: String,
        value: String,
    },
    Nested {
        path: String,
        query: Box<Query>,
    },
    Bool(BoolQuery),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoolQuery {
    pub must: Vec<Query>,
    pub should: Vec<Query>,
    pub minimum_should_match: Option<u32>,
}

impl BoolQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn must(mut self, query: Query) -> Self {
        self.must.push(query);
        self
    }

    pub fn must_all(mut self, queries: impl IntoIterator<Item = Query>) -> Self {
        self.must.extend(queries);
        self
    }

    pub fn should(mut self, query: Query) -> Self {
        self.should.push(query);
        self
    }

    pub fn should_all(mut self, queries: impl IntoIterator<Item = Query>) -> Self {
        self.should.extend(queries);
        self
    }

    pub fn minimum_should_match(mut self, count: u32) -> Self {
        self.minimum_should_match = Some(count);
        self
    }

    pub fn build(self) -> Query {
        Query::Bool(self)
    }
}

impl Query {
    pub fn term(field: &str, value: impl Into<JsonValue>) -> Self {
        Self::Term {
            field: field.to_string(),
            value: value.into(),
        }
    }

    pub fn terms<V: Into<JsonValue>>(field: &str, values: impl IntoIterator<Item = V>) -> Self {
        Self::Terms {
            field: field.to_string(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn match_(field: &str, query: &str) -> Self {
        Self::Match {
            field: field.to_string(),
            query: query.to_string(),
        }
    }

    pub fn match_phrase(field: &str, query: &str) -> Self {
        Self::MatchPhrase {
            field: field.to_string(),
            query: query.to_string(),
            slop: None,
        }
    }

    pub fn match_phrase_slop(field: &str, query: &str, slop: u32) -> Self {
        Self::MatchPhrase {
            field: field.to_string(),
            query: query.to_string(),
            slop: Some(slop),
        }
    }

    pub fn range(field: &str, gte: Option<JsonValue>, lte: Option<JsonValue>) -> Self {
        Self::Range {
            field: field.to_string(),
            gte,
            lte,
        }
    }

    pub fn wildcard(field: &str, value: &str) -> Self {
        Self::Wildcard {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    pub fn nested(path: &str, query: Query) -> Self {
        Self::Nested {
            path: path.to_string(),
            query: Box::new(query),
        }
    }

    pub fn bool_() -> BoolQuery {
        BoolQuery::new()
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Term { field, value } => leaf("term", field, value.clone()),
            Self::Terms { field, values } => {
                leaf("terms", field, JsonValue::Array(values.clone()))
            }
            Self::Match { field, query } => leaf("match", field, json!(query)),
            Self::MatchPhrase { field, query, slop } => match slop {
                Some(slop) => leaf(
                    "match_phrase",
                    field,
                    json!({ "query": query, "slop": slop }),
                ),
                None => leaf("match_phrase", field, json!(query)),
            },
            Self::Range { field, gte, lte } => {
                let mut bounds = Map::new();
                if let Some(gte) = gte {
                    bounds.insert("gte".to_string(), gte.clone());
                }
                if let Some(lte) = lte {
                    bounds.insert("lte".to_string(), lte.clone());
                }
                leaf("range", field, JsonValue::Object(bounds))
            }
            Self::Wildcard { field, value } => leaf("wildcard", field, json!(value)),
            Self::Nested { path, query } => {
                json!({ "nested": { "path": path, "query": query.to_json() } })
            }
            Self::Bool(bool_query) => {
                let mut body = Map::new();
                if !bool_query.must.is_empty() {
                    body.insert(
                        "must".to_string(),
                        JsonValue::Array(bool_query.must.iter().map(Query::to_json).collect()),
                    );
                }
                if !bool_query.should.is_empty() {
                    body.insert(
                        "should".to_string(),
                        JsonValue::Array(bool_query.should.iter().map(Query::to_json).collect()),
                    );
                }
                if let Some(count) = bool_query.minimum_should_match {
                    body.insert("minimum_should_match".to_string(), json!(count));
                }
                json!({ "bool": body })
            }
        }
    }
}

/// `{kind: {field: body}}` - the shape shared by every leaf clause.
fn leaf(kind: &str, field: &str, body: JsonValue) -> JsonValue {
    let mut inner = Map::new();
    inner.insert(field.to_string(), body);
    let mut outer = Map::new();
    outer.insert(kind.to_string(), JsonValue::Object(inner));
    JsonValue::Object(outer)
}

/// Highlight configuration: requested fields plus an optional override query
/// so highlighting reflects only free-text predicates.
#[derive(Debug, Clone)]
pub struct Highlight {
    pub fields: Vec<String>,
    pub highlight_query: Option<Query>,
}

/// A complete request body for the index's `_search` endpoint.
#[derive(Debug, Clone)]
pub struct SearchBody {
    pub query: Query,
    pub highlight: Option<Highlight>,
    pub source_excludes: Vec<String>,
    pub from: u32,
    pub size: u32,
    pub sort: Vec<String>,
}

impl SearchBody {
    pub fn new(query: Query) -> Self {
        Self {
            query,
            highlight: None,
            source_excludes: Vec::new(),
            from: 0,
            size: 10,
            sort: Vec::new(),
        }
    }

    pub fn to_json(&self) -> JsonValue {
        let mut body = Map::new();
        body.insert("query".to_string(), self.query.to_json());

        if let Some(highlight) = &self.highlight {
            let mut fields = Map::new();
            for field in &highlight.fields {
                fields.insert(field.clone(), json!({}));
            }
            let mut section = Map::new();
            section.insert("fields".to_string(), JsonValue::Object(fields));
            if let Some(query) = &highlight.highlight_query {
                section.insert("highlight_query".to_string(), query.to_json());
            }
            body.insert("highlight".to_string(), JsonValue::Object(section));
        }

        if !self.source_excludes.is_empty() {
            body.insert(
                "_source".to_string(),
                json!({ "excludes": self.source_excludes }),
            );
        }

        body.insert("from".to_string(), json!(self.from));
        body.insert("size".to_string(), json!(self.size));

        if !self.sort.is_empty() {
            body.insert("sort".to_string(), json!(self.sort));
        }

        JsonValue::Object(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_and_terms_shapes() {
        assert_eq!(
            Query::term("_type", "murs").to_json(),
            json!({ "term": { "_type": "murs" } })
        );
        assert_eq!(
            Query::terms("no", ["100", "101"]).to_json(),
            json!({ "terms": { "no": ["100", "101"] } })
        );
    }

    #[test]
    fn match_phrase_with_slop_nests_query_object() {
        assert_eq!(
            Query::match_phrase_slop("_all", "free speech", 50).to_json(),
            json!({ "match_phrase": { "_all": { "query": "free speech", "slop": 50 } } })
        );
        assert_eq!(
            Query::match_phrase("_all", "free speech").to_json(),
            json!({ "match_phrase": { "_all": "free speech" } })
        );
    }

    #[test]
    fn range_includes_only_supplied_bounds() {
        assert_eq!(
            Query::range("issue_date", Some(json!("2016-01-01")), None).to_json(),
            json!({ "range": { "issue_date": { "gte": "2016-01-01" } } })
        );
    }

    #[test]
    fn bool_omits_empty_sections() {
        let query = Query::bool_().must(Query::term("_type", "citations")).build();
        assert_eq!(
            query.to_json(),
            json!({ "bool": { "must": [{ "term": { "_type": "citations" } }] } })
        );
    }

    #[test]
    fn bool_with_minimum_should_match() {
        let query = Query::bool_()
            .should(Query::term("a", 1))
            .should(Query::term("b", 2))
            .minimum_should_match(1)
            .build();
        let rendered = query.to_json();
        assert_eq!(rendered["bool"]["minimum_should_match"], json!(1));
        assert_eq!(rendered["bool"]["should"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn nested_wraps_inner_query() {
        let query = Query::nested(
            "documents",
            Query::bool_()
                .must(Query::terms("documents.category", ["Complaint"]))
                .build(),
        );
        let rendered = query.to_json();
        assert_eq!(rendered["nested"]["path"], json!("documents"));
        assert!(rendered["nested"]["query"]["bool"]["must"].is_array());
    }

    #[test]
    fn search_body_renders_highlight_and_source() {
        let mut body = SearchBody::new(Query::term("_type", "statutes"));
        body.highlight = Some(Highlight {
            fields: vec!["text".to_string(), "name".to_string()],
            highlight_query: Some(Query::match_("_all", "speech")),
        });
        body.source_excludes = vec!["text".to_string()];
        body.from = 20;
        body.size = 10;
        body.sort = vec!["sort1".to_string(), "sort2".to_string()];

        let rendered = body.to_json();
        assert!(rendered["highlight"]["fields"]["text"].is_object());
        assert_eq!(
            rendered["highlight"]["highlight_query"],
            json!({ "match": { "_all": "speech" } })
        );
        assert_eq!(rendered["_source"]["excludes"], json!(["text"]));
        assert_eq!(rendered["from"], json!(20));
        assert_eq!(rendered["size"], json!(10));
        assert_eq!(rendered["sort"], json!(["sort1", "sort2"]));
    }
}

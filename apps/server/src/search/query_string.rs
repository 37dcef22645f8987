//! Free-text query decomposition.
//!
//! Splits a raw query string into bare terms and double-quoted phrases,
//! preserving left-to-right order. No quote escaping; an unterminated quote
//! degrades the whole remaining suffix to a single trailing term.

use once_cell::sync::Lazy;
use regex::Regex;

static PHRASE: Lazy<Regex> = Lazy::new(|| Regex::new(r#""([^"]*)""#).expect("phrase regex"));

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    pub terms: Vec<String>,
    pub phrases: Vec<String>,
}

/// Parse phrases out of a query string, e.g. `hello "independent agency"`.
pub fn parse_query_string(raw: &str) -> ParsedQuery {
    let mut terms = Vec::new();
    let mut phrases = Vec::new();

    let mut rest = raw;
    while !rest.trim().is_empty() {
        let Some(span) = PHRASE.find(rest) else {
            // No further phrase: the remainder is one trailing term.
            terms.push(rest.trim().to_string());
            break;
        };

        for term in rest[..span.start()].split_whitespace() {
            terms.push(term.to_string());
        }

        // Group 1 is the span minus its surrounding quotes.
        let phrase = rest[span.start() + 1..span.end() - 1].trim();
        if !phrase.is_empty() {
            phrases.push(phrase.to_string());
        }

        rest = &rest[span.end()..];
    }

    ParsedQuery { terms, phrases }
}

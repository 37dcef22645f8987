//! Query-string parameter access.
//!
//! Filter parameters are repeatable (`ao_no=2021-01&ao_no=2021-02`), which
//! rules out a plain map extractor; the raw query string is parsed into
//! ordered (key, value) items instead.

use crate::{Error, Result};
use chrono::NaiveDate;
use std::str::FromStr;

#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    items: Vec<(String, String)>,
}

impl QueryParams {
    /// Parse a raw query string (`application/x-www-form-urlencoded`
    /// semantics, including `+` as space).
    pub fn parse(raw_query: &str) -> Self {
        Self {
            items: url::form_urlencoded::parse(raw_query.as_bytes())
                .into_owned()
                .collect(),
        }
    }

    pub fn from_items(items: Vec<(String, String)>) -> Self {
        Self { items }
    }

    /// First value for a key; empty values count as absent.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|(k, v)| k == key && !v.is_empty())
            .map(|(_, v)| v.as_str())
    }

    /// All non-empty values for a key, in request order.
    pub fn all(&self, key: &str) -> Vec<String> {
        self.items
            .iter()
            .filter(|(k, v)| k == key && !v.is_empty())
            .map(|(_, v)| v.clone())
            .collect()
    }

    pub fn first_parsed<T: FromStr>(&self, key: &str) -> Result<Option<T>> {
        match self.first(key) {
            None => Ok(None),
            Some(raw) => raw.parse::<T>().map(Some).map_err(|_| {
                Error::Validation(format!("Invalid value \"{raw}\" for parameter \"{key}\""))
            }),
        }
    }

    pub fn first_bool(&self, key: &str) -> Result<Option<bool>> {
        match self.first(key) {
            None => Ok(None),
            Some("true") => Ok(Some(true)),
            Some("false") => Ok(Some(false)),
            Some(raw) => Err(Error::Validation(format!(
                "Invalid value \"{raw}\" for parameter \"{key}\": expected true or false"
            ))),
        }
    }

    pub fn first_date(&self, key: &str) -> Result<Option<NaiveDate>> {
        match self.first(key) {
            None => Ok(None),
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(Some)
                .map_err(|_| {
                    Error::Validation(format!(
                        "Invalid value \"{raw}\" for parameter \"{key}\": expected YYYY-MM-DD"
                    ))
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_keys_keep_request_order() {
        let params = QueryParams::parse("ao_no=2021-01&q=contribution&ao_no=2021-02");
        assert_eq!(params.all("ao_no"), vec!["2021-01", "2021-02"]);
        assert_eq!(params.first("q"), Some("contribution"));
    }

    #[test]
    fn empty_values_are_absent() {
        let params = QueryParams::parse("q=&type=murs");
        assert_eq!(params.first("q"), None);
        assert_eq!(params.first("type"), Some("murs"));
    }

    #[test]
    fn plus_decodes_as_space() {
        let params = QueryParams::parse("q=independent+agency");
        assert_eq!(params.first("q"), Some("independent agency"));
    }

    #[test]
    fn invalid_number_is_a_validation_error() {
        let params = QueryParams::parse("per_page=many");
        assert!(params.first_parsed::<i64>("per_page").is_err());
    }

    #[test]
    fn parses_bools_and_dates() {
        let params = QueryParams::parse("ao_is_pending=true&ao_min_date=2016-01-31");
        assert_eq!(params.first_bool("ao_is_pending").unwrap(), Some(true));
        let date = params.first_date("ao_min_date").unwrap().unwrap();
        assert_eq!(date.to_string(), "2016-01-31");
        assert!(QueryParams::parse("ao_is_pending=yes")
            .first_bool("ao_is_pending")
            .is_err());
    }
}

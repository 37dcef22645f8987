//! Legal citation parsing.
//!
//! Extracts structured citations from free-text strings using the two fixed
//! grammars used throughout the API:
//!
//! - regulatory: `11 CFR §100.5` (title / part / section)
//! - statutory: `52 U.S.C. §30101` (title / section)
//!
//! Strings that do not match a grammar yield `None`; callers treat them as
//! absent rather than as errors.
//!
//! # Examples
//!
//! ```rust
//! use docket_citation::{parse_regulatory, RegulatoryCitation};
//!
//! let cite = parse_regulatory("11 CFR 100.5").unwrap();
//! assert_eq!(cite, RegulatoryCitation { title: 11, part: 100, section: 5 });
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

/// A regulatory (Code of Federal Regulations) citation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegulatoryCitation {
    pub title: u32,
    pub part: u32,
    pub section: u32,
}

/// A statutory (United States Code) citation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatutoryCitation {
    pub title: u32,
    pub section: u32,
}

// Anchored at the start: trailing text after a valid citation is tolerated,
// leading text is not.
static REGULATORY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<title>\d+)\s+CFR\s+§*\s*(?P<part>\d+)\.(?P<section>\d+)")
        .expect("regulatory citation regex")
});

static STATUTORY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<title>\d+)\s+U\.S\.C\.\s+§*\s*(?P<section>\d+)")
        .expect("statutory citation regex")
});

/// Parse a regulatory citation such as `11 CFR §100.5`.
pub fn parse_regulatory(text: &str) -> Option<RegulatoryCitation> {
    let caps = REGULATORY.captures(text.trim())?;
    Some(RegulatoryCitation {
        title: caps.name("title")?.as_str().parse().ok()?,
        part: caps.name("part")?.as_str().parse().ok()?,
        section: caps.name("section")?.as_str().parse().ok()?,
    })
}

/// Parse a statutory citation such as `52 U.S.C. §30101`.
pub fn parse_statutory(text: &str) -> Option<StatutoryCitation> {
    let caps = STATUTORY.captures(text.trim())?;
    Some(StatutoryCitation {
        title: caps.name("title")?.as_str().parse().ok()?,
        section: caps.name("section")?.as_str().parse().ok()?,
    })
}

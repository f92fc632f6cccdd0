//! Parsing of the `"<surname>, <name>, <specialty>"` query strings.

use crate::domain::model::MatchQuery;
use crate::utils::error::{Result, TrendError};

pub const QUERY_LAYOUT: &str = "Surname, Name, Specialty";
const FRAGMENTS: usize = 3;

fn split_fragments(raw: &str) -> Vec<String> {
    raw.split(',').map(|part| part.trim().to_string()).collect()
}

fn non_empty(fragment: &str) -> Option<&str> {
    if fragment.is_empty() {
        None
    } else {
        Some(fragment)
    }
}

/// Strict three-fragment query used by the trend search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub surname: String,
    pub name: String,
    pub specialty: String,
}

impl SearchQuery {
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(TrendError::EmptyQuery);
        }

        let mut parts = split_fragments(raw);
        if parts.len() != FRAGMENTS {
            return Err(TrendError::InputFormat {
                query: raw.to_string(),
                expected: QUERY_LAYOUT.to_string(),
                found: parts.len(),
            });
        }

        let specialty = parts.pop().unwrap_or_default();
        let name = parts.pop().unwrap_or_default();
        let surname = parts.pop().unwrap_or_default();
        Ok(Self {
            surname,
            name,
            specialty,
        })
    }

    pub fn to_match_query(&self) -> MatchQuery {
        MatchQuery::new(
            non_empty(&self.surname),
            non_empty(&self.name),
            non_empty(&self.specialty),
        )
    }
}

/// Lenient query used while the user is still typing.
///
/// Missing fragments are padded with empty strings and anything after the
/// third comma is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestQuery {
    pub surname: String,
    pub name: String,
    pub specialty: String,
}

impl SuggestQuery {
    /// Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim().to_lowercase();
        if raw.is_empty() {
            return None;
        }

        let mut parts = split_fragments(&raw).into_iter();
        Some(Self {
            surname: parts.next().unwrap_or_default(),
            name: parts.next().unwrap_or_default(),
            specialty: parts.next().unwrap_or_default(),
        })
    }

    pub fn to_match_query(&self) -> MatchQuery {
        MatchQuery::new(
            non_empty(&self.surname),
            non_empty(&self.name),
            non_empty(&self.specialty),
        )
    }
}

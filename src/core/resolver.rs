use crate::core::normalize::{contains_normalized, normalize_opt};
use crate::domain::model::{Identity, MatchQuery};
use crate::domain::ports::DataSource;
use crate::utils::error::Result;

/// Normalized fragments of a [`MatchQuery`]; empty means unconstrained.
#[derive(Debug, Clone)]
pub struct IdentityFilter {
    surname: String,
    name: String,
    specialty: String,
}

impl IdentityFilter {
    pub fn new(query: &MatchQuery) -> Self {
        Self {
            surname: normalize_opt(query.surname.as_deref()),
            name: normalize_opt(query.name.as_deref()),
            specialty: normalize_opt(query.specialty.as_deref()),
        }
    }

    pub fn matches(&self, surname: &str, name: &str, specialty: &str) -> bool {
        contains_normalized(surname, &self.surname)
            && contains_normalized(name, &self.name)
            && contains_normalized(specialty, &self.specialty)
    }

    pub fn matches_identity(&self, identity: &Identity) -> bool {
        self.matches(&identity.surname, &identity.name, &identity.specialty)
    }
}

/// Every distinct identity whose fields contain the query fragments, in the
/// data source's retrieval order. With a `limit`, scanning stops at the cap.
pub async fn resolve<D: DataSource + ?Sized>(
    source: &D,
    query: &MatchQuery,
    limit: Option<usize>,
) -> Result<Vec<Identity>> {
    let filter = IdentityFilter::new(query);
    let candidates = source.candidate_identities().await?;
    tracing::debug!("Scanning {} candidate identities", candidates.len());

    let cap = limit.unwrap_or(usize::MAX);
    let mut matches = Vec::new();
    if cap == 0 {
        return Ok(matches);
    }

    for identity in candidates {
        if filter.matches_identity(&identity) {
            matches.push(identity);
            if matches.len() >= cap {
                break;
            }
        }
    }

    tracing::debug!("Resolved {} matching identities", matches.len());
    Ok(matches)
}

/// How the caller picks one identity out of several matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// First result in retrieval order.
    #[default]
    First,
    /// Explicit zero-based pick.
    Index(usize),
}

impl SelectionPolicy {
    pub fn select<'a>(&self, candidates: &'a [Identity]) -> Option<&'a Identity> {
        match self {
            SelectionPolicy::First => candidates.first(),
            SelectionPolicy::Index(i) => candidates.get(*i),
        }
    }
}

use crate::core::query::{SearchQuery, SuggestQuery};
use crate::core::resolver::{resolve, SelectionPolicy};
use crate::core::trend::{aggregate, YearRange};
use crate::domain::model::{Identity, TrendSeries};
use crate::domain::ports::DataSource;
use crate::utils::error::{Result, TrendError};

pub const DEFAULT_SUGGESTION_LIMIT: usize = 10;

/// Request-scoped lookup over an injected data source. Holds no mutable state.
pub struct TrendEngine<D: DataSource> {
    source: D,
    range: YearRange,
    suggestion_limit: usize,
    policy: SelectionPolicy,
}

impl<D: DataSource> TrendEngine<D> {
    pub fn new(source: D) -> Self {
        Self {
            source,
            range: YearRange::default(),
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
            policy: SelectionPolicy::default(),
        }
    }

    pub fn with_range(mut self, range: YearRange) -> Self {
        self.range = range;
        self
    }

    pub fn with_suggestion_limit(mut self, limit: usize) -> Self {
        self.suggestion_limit = limit;
        self
    }

    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn range(&self) -> YearRange {
        self.range
    }

    /// Every identity matching a `"surname, name, specialty"` query, in
    /// retrieval order. `search` picks from this list by policy.
    pub async fn candidates(&self, raw: &str) -> Result<Vec<Identity>> {
        let query = SearchQuery::parse(raw)?;
        tracing::info!(
            "Searching surname='{}' name='{}' specialty='{}'",
            query.surname,
            query.name,
            query.specialty
        );
        resolve(&self.source, &query.to_match_query(), None).await
    }

    /// Up to the suggestion limit of `"surname, name, specialty"` strings.
    /// Blank input yields an empty list.
    pub async fn suggest(&self, raw: &str) -> Result<Vec<String>> {
        let Some(query) = SuggestQuery::parse(raw) else {
            return Ok(Vec::new());
        };

        let found = resolve(
            &self.source,
            &query.to_match_query(),
            Some(self.suggestion_limit),
        )
        .await?;
        tracing::debug!("{} suggestion(s) for '{}'", found.len(), raw.trim());
        Ok(found.iter().map(Identity::to_string).collect())
    }

    /// Parses, resolves, picks one identity by policy and aggregates its trend.
    pub async fn search(&self, raw: &str) -> Result<TrendSeries> {
        let candidates = self.candidates(raw).await?;
        if candidates.len() > 1 {
            tracing::info!(
                "{} identities match, selecting with {:?}",
                candidates.len(),
                self.policy
            );
        }

        let identity = self
            .policy
            .select(&candidates)
            .ok_or_else(|| TrendError::NoMatch {
                query: raw.trim().to_string(),
            })?;
        tracing::info!("Selected {}", identity);

        aggregate(&self.source, identity, self.range).await
    }
}

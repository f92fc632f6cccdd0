use crate::core::normalize::{contains_normalized, normalize};
use crate::domain::model::{Identity, PoolSize, PositionRecord, TrendSeries};
use crate::domain::ports::DataSource;
use crate::utils::error::{Result, TrendError};
use crate::utils::validation::Validate;
use std::collections::BTreeMap;

pub const DEFAULT_FIRST_YEAR: i32 = 2004;
pub const DEFAULT_LAST_YEAR: i32 = 2025;

/// Inclusive analysis window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub first: i32,
    pub last: i32,
}

impl Default for YearRange {
    fn default() -> Self {
        Self {
            first: DEFAULT_FIRST_YEAR,
            last: DEFAULT_LAST_YEAR,
        }
    }
}

impl YearRange {
    pub fn new(first: i32, last: i32) -> Result<Self> {
        let range = Self { first, last };
        range.validate()?;
        Ok(range)
    }

    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.first..=self.last
    }

    pub fn len(&self) -> usize {
        if self.last < self.first {
            0
        } else {
            (self.last - self.first + 1) as usize
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.first..=self.last).contains(&year)
    }
}

impl Validate for YearRange {
    fn validate(&self) -> Result<()> {
        if self.first > self.last {
            return Err(TrendError::InvalidConfigValueError {
                field: "analysis.first_year".to_string(),
                value: self.first.to_string(),
                reason: format!("First year must not be after last year ({})", self.last),
            });
        }
        Ok(())
    }
}

/// `1 - rank / pool_size`, undefined for a missing rank or an empty pool.
pub fn percentile(rank: Option<u32>, pool_size: u32) -> Option<f64> {
    match rank {
        Some(rank) if pool_size > 0 => Some(1.0 - f64::from(rank) / f64::from(pool_size)),
        _ => None,
    }
}

/// Year to rank for the identity, from rows already filtered by specialty.
///
/// When several substring matches share a year, the last row in retrieval
/// order wins.
fn ranks_by_year(identity: &Identity, rows: &[PositionRecord]) -> BTreeMap<i32, u32> {
    let surname = normalize(&identity.surname);
    let name = normalize(&identity.name);
    let specialty = normalize(&identity.specialty);

    rows.iter()
        .filter(|row| {
            contains_normalized(&row.surname, &surname)
                && contains_normalized(&row.name, &name)
                && contains_normalized(&row.specialty, &specialty)
        })
        .map(|row| (row.year, row.rank))
        .collect()
}

/// Builds the aligned dense series from the two sparse year maps.
pub fn densify(
    identity: &Identity,
    ranks: &BTreeMap<i32, u32>,
    pools: &BTreeMap<i32, u32>,
    range: YearRange,
) -> TrendSeries {
    let years: Vec<i32> = range.years().collect();
    let ranks: Vec<Option<u32>> = years.iter().map(|y| ranks.get(y).copied()).collect();
    let pool_sizes: Vec<u32> = years
        .iter()
        .map(|y| pools.get(y).copied().unwrap_or(0))
        .collect();
    let percentiles = ranks
        .iter()
        .zip(&pool_sizes)
        .map(|(rank, pool)| percentile(*rank, *pool))
        .collect();

    TrendSeries {
        identity: identity.clone(),
        years,
        ranks,
        pool_sizes,
        percentiles,
    }
}

/// Rank and pool-size trend for one identity over `range`.
///
/// Fails with [`TrendError::NoData`] when the identity has no position in the
/// specialty within `range`. Years outside `range` are read but ignored.
pub async fn aggregate<D: DataSource + ?Sized>(
    source: &D,
    identity: &Identity,
    range: YearRange,
) -> Result<TrendSeries> {
    let rows = source.specialty_positions(&identity.specialty).await?;
    let mut ranks = ranks_by_year(identity, &rows);
    let recorded = ranks.len();
    ranks.retain(|year, _| range.contains(*year));
    if recorded > ranks.len() {
        tracing::debug!(
            "Ignoring {} year(s) outside {}-{}",
            recorded - ranks.len(),
            range.first,
            range.last
        );
    }
    if ranks.is_empty() {
        tracing::warn!("No positions found for {}", identity);
        return Err(TrendError::NoData {
            surname: identity.surname.clone(),
            name: identity.name.clone(),
            specialty: identity.specialty.clone(),
        });
    }

    let pools: BTreeMap<i32, u32> = source
        .pool_sizes(&identity.specialty)
        .await?
        .into_iter()
        .map(|PoolSize { year, count }| (year, count))
        .collect();

    let series = densify(identity, &ranks, &pools, range);
    tracing::debug!(
        "Aggregated {} years for {} ({} with a rank)",
        series.len(),
        identity,
        series.ranks.iter().flatten().count()
    );
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryDataSource;

    fn record(year: i32, rank: u32, surname: &str, name: &str, specialty: &str) -> PositionRecord {
        PositionRecord {
            year,
            rank,
            surname: surname.to_string(),
            name: name.to_string(),
            specialty: specialty.to_string(),
        }
    }

    fn pool(year: i32, size: u32, specialty: &str) -> Vec<PositionRecord> {
        (1..=size)
            .map(|rank| record(year, rank, &format!("Other{}", rank), "X", specialty))
            .collect()
    }

    fn ana() -> Identity {
        Identity::new("García", "Ana", "Matemáticas")
    }

    fn scenario() -> InMemoryDataSource {
        let mut rows = vec![
            record(2020, 3, "García", "Ana", "Matemáticas"),
            record(2021, 2, "García", "Ana", "Matemáticas"),
        ];
        rows.extend(pool(2020, 9, "Matemáticas"));
        rows.extend(pool(2021, 11, "Matemáticas"));
        rows.extend(pool(2021, 4, "Física"));
        InMemoryDataSource::new(rows)
    }

    #[test]
    fn test_percentile() {
        assert_eq!(percentile(Some(5), 20), Some(0.75));
        assert_eq!(percentile(Some(1), 4), Some(0.75));
        assert_eq!(percentile(None, 20), None);
        assert_eq!(percentile(Some(3), 0), None);
    }

    #[test]
    fn test_year_range() {
        let range = YearRange::default();
        assert_eq!(range.len(), 22);
        assert!(range.contains(2004));
        assert!(range.contains(2025));
        assert!(!range.contains(2026));
        assert!(YearRange::new(2010, 2005).is_err());
        assert_eq!(YearRange::new(2010, 2010).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_aggregate_scenario() {
        let source = scenario();
        let series = aggregate(&source, &ana(), YearRange::default())
            .await
            .unwrap();

        assert_eq!(series.years.len(), 22);
        assert_eq!(series.ranks.len(), 22);
        assert_eq!(series.pool_sizes.len(), 22);
        assert_eq!(series.percentiles.len(), 22);
        assert!(series.years.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(series.years[0], 2004);
        assert_eq!(series.years[21], 2025);

        let i2020 = (2020 - 2004) as usize;
        let i2021 = i2020 + 1;
        assert_eq!(series.ranks[i2020], Some(3));
        assert_eq!(series.ranks[i2021], Some(2));
        assert_eq!(series.pool_sizes[i2020], 10);
        assert_eq!(series.pool_sizes[i2021], 12);
        assert!((series.percentiles[i2020].unwrap() - 0.70).abs() < 1e-9);
        assert!((series.percentiles[i2021].unwrap() - (1.0 - 2.0 / 12.0)).abs() < 1e-9);

        let missing = series
            .ranks
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != i2020 && *i != i2021)
            .all(|(_, rank)| rank.is_none());
        assert!(missing);
        assert_eq!(series.percentiles.iter().flatten().count(), 2);
    }

    #[tokio::test]
    async fn test_zero_pool_never_has_percentile() {
        let source = scenario();
        let series = aggregate(&source, &ana(), YearRange::default())
            .await
            .unwrap();
        for point in series.points() {
            if point.pool_size == 0 {
                assert!(point.percentile.is_none());
            }
        }
    }

    #[tokio::test]
    async fn test_no_data_for_unknown_identity() {
        let source = scenario();
        let err = aggregate(
            &source,
            &Identity::new("García", "Ana", "Física"),
            YearRange::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, TrendError::NoData { .. }));
    }

    #[tokio::test]
    async fn test_years_outside_range_are_ignored() {
        let source = InMemoryDataSource::new(vec![
            record(1999, 1, "García", "Ana", "Matemáticas"),
            record(2010, 2, "García", "Ana", "Matemáticas"),
            record(2030, 1, "García", "Ana", "Matemáticas"),
        ]);
        let series = aggregate(&source, &ana(), YearRange::default())
            .await
            .unwrap();
        assert_eq!(series.len(), 22);
        assert_eq!(series.ranks.iter().flatten().count(), 1);
        assert_eq!(series.rank_bounds(), Some((2, 2)));
    }

    #[tokio::test]
    async fn test_only_out_of_range_years_is_no_data() {
        let source = InMemoryDataSource::new(vec![record(1999, 1, "García", "Ana", "Matemáticas")]);
        let err = aggregate(&source, &ana(), YearRange::default())
            .await
            .unwrap_err();
        assert!(matches!(err, TrendError::NoData { .. }));
    }

    #[test]
    fn test_densify_fills_gaps() {
        let ranks = BTreeMap::from([(2005, 4)]);
        let pools = BTreeMap::from([(2004, 8), (2005, 0)]);
        let series = densify(&ana(), &ranks, &pools, YearRange::new(2004, 2006).unwrap());
        assert_eq!(series.years, vec![2004, 2005, 2006]);
        assert_eq!(series.ranks, vec![None, Some(4), None]);
        assert_eq!(series.pool_sizes, vec![8, 0, 0]);
        assert_eq!(series.percentiles, vec![None, None, None]);
    }

    #[tokio::test]
    async fn test_last_row_wins_within_a_year() {
        let source = InMemoryDataSource::new(vec![
            record(2020, 4, "García", "Ana", "Matemáticas"),
            record(2020, 1, "García", "Ana María", "Matemáticas"),
            record(2021, 6, "García", "Ana María", "Matemáticas"),
        ]);
        let series = aggregate(&source, &ana(), YearRange::new(2020, 2021).unwrap())
            .await
            .unwrap();
        assert_eq!(series.ranks, vec![Some(1), Some(6)]);
        assert_eq!(series.pool_sizes, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_substring_collisions_keep_later_row() {
        let lengua = Identity::new("García", "Ana", "Lengua");
        let source = InMemoryDataSource::new(vec![
            record(2020, 1, "García", "Ana María", "Lengua"),
            record(2020, 5, "García", "Anabel", "Lengua"),
            record(2021, 2, "García", "Ana", "Lengua"),
        ]);
        let series = aggregate(&source, &lengua, YearRange::new(2020, 2021).unwrap())
            .await
            .unwrap();
        assert_eq!(series.ranks, vec![Some(5), Some(2)]);
    }

    #[tokio::test]
    async fn test_series_helpers() {
        let source = scenario();
        let series = aggregate(&source, &ana(), YearRange::default())
            .await
            .unwrap();
        assert_eq!(series.rank_bounds(), Some((2, 3)));
        let axis = series.rank_axis().unwrap();
        assert!((axis.top - 1.9).abs() < 1e-9);
        assert!((axis.bottom - 3.1).abs() < 1e-9);
        assert_eq!(series.max_pool_size(), 12);
        assert_eq!(
            series.percentile_label((2020 - 2004) as usize).as_deref(),
            Some("70.0%")
        );
        assert_eq!(series.percentile_label(0), None);
    }
}

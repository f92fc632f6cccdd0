use serde::{Deserialize, Serialize};
use std::fmt;

/// The (name, surname, specialty) triple used as the lookup key for a trend.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub surname: String,
    pub name: String,
    pub specialty: String,
}

impl Identity {
    pub fn new(
        surname: impl Into<String>,
        name: impl Into<String>,
        specialty: impl Into<String>,
    ) -> Self {
        Self {
            surname: surname.into(),
            name: name.into(),
            specialty: specialty.into(),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.surname, self.name, self.specialty)
    }
}

/// One joined person/group/position row as the data source yields it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub year: i32,
    pub rank: u32,
    pub surname: String,
    pub name: String,
    pub specialty: String,
}

/// Number of positions recorded for a specialty in one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSize {
    pub year: i32,
    pub count: u32,
}

/// Up to three optional fragments; an absent or empty fragment imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchQuery {
    pub surname: Option<String>,
    pub name: Option<String>,
    pub specialty: Option<String>,
}

impl MatchQuery {
    pub fn new(surname: Option<&str>, name: Option<&str>, specialty: Option<&str>) -> Self {
        Self {
            surname: surname.map(str::to_string),
            name: name.map(str::to_string),
            specialty: specialty.map(str::to_string),
        }
    }

    pub fn surname(surname: &str) -> Self {
        Self::new(Some(surname), None, None)
    }
}

/// Year-aligned dense series for one identity, ready for a chart renderer.
///
/// All four vectors share the same length and index; `years` is strictly
/// ascending. A `None` rank means the identity has no record that year and a
/// `None` percentile means it is undefined (missing rank or empty pool).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSeries {
    pub identity: Identity,
    pub years: Vec<i32>,
    pub ranks: Vec<Option<u32>>,
    pub pool_sizes: Vec<u32>,
    pub percentiles: Vec<Option<f64>>,
}

/// A single year of a [`TrendSeries`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendPoint {
    pub year: i32,
    pub rank: Option<u32>,
    pub pool_size: u32,
    pub percentile: Option<f64>,
}

/// Plot bounds for the rank line; `top` is the best rank because the axis is inverted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankAxis {
    pub top: f64,
    pub bottom: f64,
}

impl TrendSeries {
    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = TrendPoint> + '_ {
        self.years.iter().enumerate().map(move |(i, year)| TrendPoint {
            year: *year,
            rank: self.ranks[i],
            pool_size: self.pool_sizes[i],
            percentile: self.percentiles[i],
        })
    }

    /// Best and worst recorded rank.
    pub fn rank_bounds(&self) -> Option<(u32, u32)> {
        let present = self.ranks.iter().flatten().copied();
        let min = present.clone().min()?;
        let max = present.max()?;
        Some((min, max))
    }

    /// Rank bounds padded by 10% of their spread.
    pub fn rank_axis(&self) -> Option<RankAxis> {
        let (min, max) = self.rank_bounds()?;
        let margin = f64::from(max - min) * 0.1;
        Some(RankAxis {
            top: f64::from(min) - margin,
            bottom: f64::from(max) + margin,
        })
    }

    pub fn max_pool_size(&self) -> u32 {
        self.pool_sizes.iter().copied().max().unwrap_or(0)
    }

    pub fn percentile_label(&self, index: usize) -> Option<String> {
        self.percentiles
            .get(index)
            .copied()
            .flatten()
            .map(|p| format!("{:.1}%", p * 100.0))
    }
}

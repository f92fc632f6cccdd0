//! Chart artifacts built from a [`TrendSeries`].
//!
//! Pixels are someone else's job: the JSON document describes the two
//! panels (rank line on an inverted axis, pool-size bars with the rank
//! overlaid) and the CSV carries the raw aligned series.

use crate::domain::model::{Identity, RankAxis, TrendSeries};
use crate::domain::ports::ChartRenderer;
use crate::utils::error::{Result, TrendError};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

/// ASCII-only file name: NFKD, non-ASCII dropped, spaces to `_`, and
/// anything outside `[A-Za-z0-9._-]` removed.
pub fn sanitize_filename(filename: &str) -> String {
    static DISALLOWED: OnceLock<Regex> = OnceLock::new();
    let disallowed =
        DISALLOWED.get_or_init(|| Regex::new(r"[^A-Za-z0-9._-]").expect("static pattern"));

    let ascii: String = filename
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == ' ' { '_' } else { c })
        .collect();
    disallowed.replace_all(&ascii, "").into_owned()
}

/// `{specialty}_{surname}_{name}.{extension}`, sanitized.
pub fn artifact_name(identity: &Identity, extension: &str) -> String {
    sanitize_filename(&format!(
        "{}_{}_{}.{}",
        identity.specialty, identity.surname, identity.name, extension
    ))
}

#[derive(Debug, Serialize)]
struct ChartDocument<'a> {
    identity: &'a Identity,
    generated_at: DateTime<Utc>,
    x_limits: (i32, i32),
    rank_panel: RankPanel,
    pool_panel: PoolPanel,
}

#[derive(Debug, Serialize)]
struct RankPanel {
    title: String,
    x_label: &'static str,
    y_label: &'static str,
    inverted_y: bool,
    y_axis: Option<RankAxis>,
    points: Vec<RankPoint>,
}

#[derive(Debug, Serialize)]
struct RankPoint {
    year: i32,
    rank: Option<u32>,
    percentile: Option<f64>,
    label: Option<String>,
}

#[derive(Debug, Serialize)]
struct PoolPanel {
    title: String,
    x_label: &'static str,
    y_label: &'static str,
    y_top: f64,
    bars: Vec<PoolBar>,
}

#[derive(Debug, Serialize)]
struct PoolBar {
    year: i32,
    pool_size: u32,
    label: Option<String>,
    rank_marker: Option<u32>,
}

/// Two-panel chart description as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonChartRenderer;

impl JsonChartRenderer {
    fn document<'a>(&self, series: &'a TrendSeries) -> ChartDocument<'a> {
        let identity = &series.identity;
        let first = series.years.first().copied().unwrap_or_default();
        let last = series.years.last().copied().unwrap_or_default();

        let points = series
            .points()
            .enumerate()
            .map(|(i, point)| RankPoint {
                year: point.year,
                rank: point.rank,
                percentile: point.percentile,
                label: point.rank.and(series.percentile_label(i)),
            })
            .collect();

        let bars = series
            .points()
            .map(|point| PoolBar {
                year: point.year,
                pool_size: point.pool_size,
                label: (point.pool_size > 0).then(|| point.pool_size.to_string()),
                rank_marker: point.rank,
            })
            .collect();

        ChartDocument {
            identity,
            generated_at: Utc::now(),
            x_limits: (first - 1, last + 1),
            rank_panel: RankPanel {
                title: format!(
                    "Rank in pool over time ({}) for {} {}",
                    identity.specialty, identity.name, identity.surname
                ),
                x_label: "Year",
                y_label: "Rank in pool",
                inverted_y: true,
                y_axis: series.rank_axis(),
                points,
            },
            pool_panel: PoolPanel {
                title: format!(
                    "Pool size ({}) and rank of {} {}",
                    identity.specialty, identity.name, identity.surname
                ),
                x_label: "Year",
                y_label: "People in pool",
                y_top: (f64::from(series.max_pool_size()) * 1.1).floor(),
                bars,
            },
        }
    }
}

impl ChartRenderer for JsonChartRenderer {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, series: &TrendSeries) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(&self.document(series))?)
    }
}

#[derive(Debug, Serialize)]
struct SeriesRow {
    year: i32,
    rank: Option<u32>,
    pool_size: u32,
    percentile: Option<f64>,
}

/// `year,rank,pool_size,percentile`; missing values are empty cells.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvSeriesRenderer;

impl ChartRenderer for CsvSeriesRenderer {
    fn extension(&self) -> &'static str {
        "csv"
    }

    fn render(&self, series: &TrendSeries) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for point in series.points() {
            writer.serialize(SeriesRow {
                year: point.year,
                rank: point.rank,
                pool_size: point.pool_size,
                percentile: point.percentile,
            })?;
        }
        writer
            .into_inner()
            .map_err(|e| TrendError::IoError(e.into_error()))
    }
}

/// Renderer for an `output.formats` entry.
pub fn renderer_for(format: &str) -> Option<Box<dyn ChartRenderer>> {
    match format {
        "json" => Some(Box::new(JsonChartRenderer)),
        "csv" => Some(Box::new(CsvSeriesRenderer)),
        _ => None,
    }
}

pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{CliConfig, Command};

pub use crate::adapters::{
    CsvDataSource, CsvSeriesRenderer, InMemoryDataSource, JsonChartRenderer, LocalStorage,
    ReportWriter, SqliteDataSource,
};
pub use crate::config::TomlConfig;
pub use crate::core::{
    engine::TrendEngine, normalize::normalize, resolver::SelectionPolicy, trend::YearRange,
};
pub use crate::domain::model::{Identity, MatchQuery, PositionRecord, TrendSeries};
pub use crate::domain::ports::{ChartRenderer, DataSource};
pub use crate::utils::error::{Result, TrendError};

//! Wiring from effective settings to a ready engine and report writer.

use crate::adapters::chart::renderer_for;
use crate::adapters::{CsvDataSource, LocalStorage, ReportWriter, SqliteDataSource};
use crate::core::engine::TrendEngine;
use crate::core::trend::YearRange;
use crate::domain::ports::{ConfigProvider, DataSource};
use crate::utils::error::{Result, TrendError};

pub type DynDataSource = Box<dyn DataSource>;

pub fn build_data_source<C: ConfigProvider + ?Sized>(config: &C) -> Result<DynDataSource> {
    match config.source_kind() {
        "sqlite" => {
            tracing::debug!("Using SQLite dataset at {}", config.source_path());
            Ok(Box::new(SqliteDataSource::new(config.source_path())))
        }
        "csv" => {
            tracing::debug!("Loading CSV dataset from {}", config.source_path());
            Ok(Box::new(CsvDataSource::from_path(config.source_path())?))
        }
        other => Err(TrendError::InvalidConfigValueError {
            field: "source.kind".to_string(),
            value: other.to_string(),
            reason: "Unsupported data source".to_string(),
        }),
    }
}

pub fn build_engine<C: ConfigProvider + ?Sized>(config: &C) -> Result<TrendEngine<DynDataSource>> {
    let source = build_data_source(config)?;
    let range = YearRange::new(config.first_year(), config.last_year())?;
    Ok(TrendEngine::new(source)
        .with_range(range)
        .with_suggestion_limit(config.suggestion_limit()))
}

pub fn build_report_writer<C: ConfigProvider + ?Sized>(
    config: &C,
) -> Result<ReportWriter<LocalStorage>> {
    let renderers = config
        .output_formats()
        .iter()
        .map(|format| {
            renderer_for(format).ok_or_else(|| TrendError::InvalidConfigValueError {
                field: "output.formats".to_string(),
                value: format.clone(),
                reason: "No renderer for this format".to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let storage = LocalStorage::new(config.output_path().to_string());
    Ok(ReportWriter::new(storage, renderers, config.compress_output()))
}

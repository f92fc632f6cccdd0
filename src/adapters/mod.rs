// Adapters layer: concrete implementations of the domain ports (data sources,
// chart renderers, storage).

pub mod chart;
pub mod csv_source;
pub mod memory;
pub mod sqlite;
pub mod storage;

pub use chart::{CsvSeriesRenderer, JsonChartRenderer};
pub use csv_source::CsvDataSource;
pub use memory::InMemoryDataSource;
pub use sqlite::SqliteDataSource;
pub use storage::{LocalStorage, ReportWriter};

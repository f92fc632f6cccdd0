use crate::adapters::memory::InMemoryDataSource;
use crate::domain::model::{Identity, PoolSize, PositionRecord};
use crate::domain::ports::DataSource;
use crate::utils::error::{Result, TrendError};
use async_trait::async_trait;
use std::io::Read;
use std::path::Path;

/// Flat CSV export with a `year,rank,surname,name,specialty` header.
#[derive(Debug, Clone)]
pub struct CsvDataSource {
    inner: InMemoryDataSource,
}

impl CsvDataSource {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| TrendError::DataSourceUnavailable {
            message: format!("cannot open {}: {}", path.display(), e),
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut rows = Vec::new();
        for record in csv_reader.deserialize::<PositionRecord>() {
            let record = record.map_err(|e| TrendError::DataSourceUnavailable {
                message: format!("malformed dataset row: {}", e),
            })?;
            if record.rank == 0 {
                return Err(TrendError::DataSourceUnavailable {
                    message: format!(
                        "rank must be positive ({}, {}, {} in {})",
                        record.surname, record.name, record.specialty, record.year
                    ),
                });
            }
            rows.push(record);
        }

        tracing::debug!("Loaded {} position rows from CSV", rows.len());
        Ok(Self {
            inner: InMemoryDataSource::new(rows),
        })
    }
}

#[async_trait]
impl DataSource for CsvDataSource {
    async fn candidate_identities(&self) -> Result<Vec<Identity>> {
        self.inner.candidate_identities().await
    }

    async fn specialty_positions(&self, specialty: &str) -> Result<Vec<PositionRecord>> {
        self.inner.specialty_positions(specialty).await
    }

    async fn pool_sizes(&self, specialty: &str) -> Result<Vec<PoolSize>> {
        self.inner.pool_sizes(specialty).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ErrorCategory;

    #[tokio::test]
    async fn test_reads_flat_export() {
        let data = "year,rank,surname,name,specialty\n\
                    2020, 3, García, Ana, Matemáticas\n\
                    2021, 2, García, Ana, Matemáticas\n";
        let source = CsvDataSource::from_reader(data.as_bytes()).unwrap();
        let candidates = source.candidate_identities().await.unwrap();
        assert_eq!(candidates, vec![Identity::new("García", "Ana", "Matemáticas")]);

        let pools = source.pool_sizes("Matemáticas").await.unwrap();
        assert_eq!(pools.len(), 2);
    }

    #[test]
    fn test_rejects_zero_rank() {
        let data = "year,rank,surname,name,specialty\n2020,0,García,Ana,Matemáticas\n";
        assert!(CsvDataSource::from_reader(data.as_bytes()).is_err());
    }

    #[test]
    fn test_rejects_malformed_rows() {
        let data = "year,rank,surname,name,specialty\nsoon,1,García,Ana,Matemáticas\n";
        let err = CsvDataSource::from_reader(data.as_bytes()).unwrap_err();
        assert!(matches!(err, TrendError::DataSourceUnavailable { .. }));
        assert_eq!(err.category(), ErrorCategory::DataSource);
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let err = CsvDataSource::from_path("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, TrendError::DataSourceUnavailable { .. }));
    }
}

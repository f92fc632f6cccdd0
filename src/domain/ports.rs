use crate::domain::model::{Identity, PoolSize, PositionRecord, TrendSeries};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Read-only access to the person/group/position relations.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Distinct identities holding at least one position, sorted by
    /// (surname, name, specialty) in byte order.
    async fn candidate_identities(&self) -> Result<Vec<Identity>>;

    /// Every position row whose specialty equals `specialty` case-insensitively,
    /// ascending by year.
    async fn specialty_positions(&self, specialty: &str) -> Result<Vec<PositionRecord>>;

    /// Position counts per year for the specialty, ascending by year.
    async fn pool_sizes(&self, specialty: &str) -> Result<Vec<PoolSize>>;
}

#[async_trait]
impl<D: DataSource + ?Sized> DataSource for Box<D> {
    async fn candidate_identities(&self) -> Result<Vec<Identity>> {
        (**self).candidate_identities().await
    }

    async fn specialty_positions(&self, specialty: &str) -> Result<Vec<PositionRecord>> {
        (**self).specialty_positions(specialty).await
    }

    async fn pool_sizes(&self, specialty: &str) -> Result<Vec<PoolSize>> {
        (**self).pool_sizes(specialty).await
    }
}

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Turns a dense series into a chart artifact.
pub trait ChartRenderer: Send + Sync {
    fn extension(&self) -> &'static str;
    fn render(&self, series: &TrendSeries) -> Result<Vec<u8>>;
}

pub trait ConfigProvider: Send + Sync {
    fn source_kind(&self) -> &str;
    fn source_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn first_year(&self) -> i32;
    fn last_year(&self) -> i32;
    fn suggestion_limit(&self) -> usize;
    fn output_formats(&self) -> &[String];
    fn compress_output(&self) -> bool;
}

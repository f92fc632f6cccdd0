pub mod engine;
pub mod normalize;
pub mod query;
pub mod resolver;
pub mod trend;

pub use crate::domain::model::{Identity, MatchQuery, PoolSize, PositionRecord, TrendSeries};
pub use crate::domain::ports::{ChartRenderer, ConfigProvider, DataSource, Storage};
pub use crate::utils::error::Result;

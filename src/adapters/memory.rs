use crate::domain::model::{Identity, PoolSize, PositionRecord};
use crate::domain::ports::DataSource;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};

/// Flat position rows held in memory.
///
/// Specialty filters compare with ASCII case folding only, the same as
/// SQLite's `lower()`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDataSource {
    rows: Vec<PositionRecord>,
}

impl InMemoryDataSource {
    pub fn new(rows: Vec<PositionRecord>) -> Self {
        Self { rows }
    }

    fn in_specialty<'a>(&'a self, specialty: &'a str) -> impl Iterator<Item = &'a PositionRecord> {
        self.rows
            .iter()
            .filter(move |row| row.specialty.eq_ignore_ascii_case(specialty))
    }
}

#[async_trait]
impl DataSource for InMemoryDataSource {
    async fn candidate_identities(&self) -> Result<Vec<Identity>> {
        let distinct: BTreeSet<Identity> = self
            .rows
            .iter()
            .map(|row| Identity::new(&row.surname, &row.name, &row.specialty))
            .collect();
        Ok(distinct.into_iter().collect())
    }

    async fn specialty_positions(&self, specialty: &str) -> Result<Vec<PositionRecord>> {
        let mut rows: Vec<PositionRecord> = self.in_specialty(specialty).cloned().collect();
        rows.sort_by_key(|row| row.year);
        Ok(rows)
    }

    async fn pool_sizes(&self, specialty: &str) -> Result<Vec<PoolSize>> {
        let mut counts: BTreeMap<i32, u32> = BTreeMap::new();
        for row in self.in_specialty(specialty) {
            *counts.entry(row.year).or_insert(0) += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(year, count)| PoolSize { year, count })
            .collect())
    }
}

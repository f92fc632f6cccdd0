//! SQLite-backed data source over the stored ranking tables.
//!
//! The dataset is produced by an external import and uses its own table
//! names: `persona(id, nombre, apellidos)`, `grupo(id, especialidad)` and
//! `posicion(anyo, numero, persona_id, grupo_id)`. Every call opens its own
//! read-only connection on the blocking pool and drops it when done.

use crate::domain::model::{Identity, PoolSize, PositionRecord};
use crate::domain::ports::DataSource;
use crate::utils::error::{Result, TrendError};
use async_trait::async_trait;
use rusqlite::{params, Connection, OpenFlags};
use std::path::{Path, PathBuf};

const CANDIDATES_SQL: &str = "
    SELECT DISTINCT persona.apellidos, persona.nombre, grupo.especialidad
    FROM persona
    JOIN posicion ON persona.id = posicion.persona_id
    JOIN grupo ON grupo.id = posicion.grupo_id
    ORDER BY persona.apellidos, persona.nombre, grupo.especialidad";

const SPECIALTY_POSITIONS_SQL: &str = "
    SELECT posicion.anyo, posicion.numero, persona.apellidos, persona.nombre, grupo.especialidad
    FROM persona
    JOIN posicion ON persona.id = posicion.persona_id
    JOIN grupo ON grupo.id = posicion.grupo_id
    WHERE lower(grupo.especialidad) = lower(?1)
    ORDER BY posicion.anyo";

const POOL_SIZES_SQL: &str = "
    SELECT posicion.anyo, COUNT(*)
    FROM posicion
    JOIN grupo ON grupo.id = posicion.grupo_id
    WHERE lower(grupo.especialidad) = lower(?1)
    GROUP BY posicion.anyo
    ORDER BY posicion.anyo";

#[derive(Debug, Clone)]
pub struct SqliteDataSource {
    path: PathBuf,
}

impl SqliteDataSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn open(path: &Path) -> Result<Connection> {
        if !path.exists() {
            return Err(TrendError::DataSourceUnavailable {
                message: format!("database file not found: {}", path.display()),
            });
        }
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(conn)
    }

    /// Runs `f` against a fresh read-only connection on the blocking pool.
    async fn with_connection<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            let conn = Self::open(&path)?;
            f(&conn)
        })
        .await?
    }
}

/// Ranks start at 1; zero or negative values are rejected like any other
/// out-of-range integer.
fn to_rank(value: i64) -> rusqlite::Result<u32> {
    u32::try_from(value)
        .ok()
        .filter(|rank| *rank > 0)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(1, value))
}

#[async_trait]
impl DataSource for SqliteDataSource {
    async fn candidate_identities(&self) -> Result<Vec<Identity>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(CANDIDATES_SQL)?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(Identity {
                        surname: row.get(0)?,
                        name: row.get(1)?,
                        specialty: row.get(2)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            tracing::debug!("Loaded {} candidate identities from SQLite", rows.len());
            Ok(rows)
        })
        .await
    }

    async fn specialty_positions(&self, specialty: &str) -> Result<Vec<PositionRecord>> {
        let specialty = specialty.to_string();
        self.with_connection(move |conn| {
            let mut stmt = conn.prepare(SPECIALTY_POSITIONS_SQL)?;
            let rows = stmt
                .query_map(params![specialty], |row| {
                    Ok(PositionRecord {
                        year: row.get(0)?,
                        rank: to_rank(row.get(1)?)?,
                        surname: row.get(2)?,
                        name: row.get(3)?,
                        specialty: row.get(4)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
        .await
    }

    async fn pool_sizes(&self, specialty: &str) -> Result<Vec<PoolSize>> {
        let specialty = specialty.to_string();
        self.with_connection(move |conn| {
            let mut stmt = conn.prepare(POOL_SIZES_SQL)?;
            let rows = stmt
                .query_map(params![specialty], |row| {
                    Ok(PoolSize {
                        year: row.get(0)?,
                        count: row.get(1)?,
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
        .await
    }
}

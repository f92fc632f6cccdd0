use anyhow::Result;
use rank_trend::app::{build_engine, build_report_writer};
use rank_trend::{Identity, SqliteDataSource, TomlConfig, TrendEngine, TrendError};
use rusqlite::{params, Connection};
use std::path::Path;
use tempfile::TempDir;

/// Seeds the stored schema with García/Ana/Matemáticas ranked 3 of 10 in 2020
/// and 2 of 12 in 2021, plus filler people and a second specialty.
fn seed_database(path: &Path) -> Result<()> {
    let conn = Connection::open(path)?;
    conn.execute_batch(
        "CREATE TABLE persona (id INTEGER PRIMARY KEY AUTOINCREMENT, nombre TEXT NOT NULL, apellidos TEXT NOT NULL);
         CREATE TABLE grupo (id INTEGER PRIMARY KEY AUTOINCREMENT, especialidad TEXT NOT NULL);
         CREATE TABLE posicion (id INTEGER PRIMARY KEY AUTOINCREMENT, anyo INTEGER NOT NULL,
                                numero INTEGER NOT NULL, persona_id INTEGER NOT NULL, grupo_id INTEGER NOT NULL);
         INSERT INTO grupo (id, especialidad) VALUES (1, 'Matemáticas'), (2, 'Física');
         INSERT INTO persona (id, nombre, apellidos) VALUES (1, 'Ana', 'García'), (2, 'Ana', 'García Ruiz');",
    )?;

    let add = |year: i32, rank: u32, persona: i64, grupo: i64| -> Result<()> {
        conn.execute(
            "INSERT INTO posicion (anyo, numero, persona_id, grupo_id) VALUES (?1, ?2, ?3, ?4)",
            params![year, rank, persona, grupo],
        )?;
        Ok(())
    };

    add(2020, 3, 1, 1)?;
    add(2021, 2, 1, 1)?;
    add(2015, 1, 2, 2)?;

    let mut next_person = 100;
    for (year, fillers) in [(2020, 9), (2021, 11)] {
        for i in 0..fillers {
            conn.execute(
                "INSERT INTO persona (id, nombre, apellidos) VALUES (?1, 'Filler', ?2)",
                params![next_person, format!("Zeta {}", i)],
            )?;
            add(year, 10 + i, next_person, 1)?;
            next_person += 1;
        }
    }
    Ok(())
}

fn config_for(dir: &TempDir) -> Result<TomlConfig> {
    let db_path = dir.path().join("database.db");
    seed_database(&db_path)?;

    let mut config = TomlConfig::default();
    config.source.path = db_path.to_string_lossy().into_owned();
    config.output.path = dir.path().join("img").to_string_lossy().into_owned();
    config.output.formats = vec!["json".to_string(), "csv".to_string()];
    Ok(config)
}

#[tokio::test]
async fn test_end_to_end_search_over_sqlite() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = config_for(&temp_dir)?;
    let engine = build_engine(&config)?;

    let series = engine.search("garcia, ana, matematicas").await?;
    assert_eq!(series.identity, Identity::new("García", "Ana", "Matemáticas"));

    assert_eq!(series.years.len(), 22);
    assert_eq!(series.ranks.len(), 22);
    assert_eq!(series.pool_sizes.len(), 22);
    assert_eq!(series.percentiles.len(), 22);

    let at = |year: i32| (year - 2004) as usize;
    assert_eq!(series.ranks[at(2020)], Some(3));
    assert_eq!(series.ranks[at(2021)], Some(2));
    assert_eq!(series.ranks[at(2019)], None);
    assert_eq!(series.pool_sizes[at(2020)], 10);
    assert_eq!(series.pool_sizes[at(2021)], 12);
    assert_eq!(series.pool_sizes[at(2004)], 0);

    let p2020 = series.percentiles[at(2020)].expect("2020 percentile");
    let p2021 = series.percentiles[at(2021)].expect("2021 percentile");
    assert!((p2020 - 0.70).abs() < 1e-9);
    assert!((p2021 - 0.8333).abs() < 1e-3);
    assert_eq!(series.percentiles.iter().flatten().count(), 2);
    Ok(())
}

#[tokio::test]
async fn test_search_writes_chart_artifacts() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = config_for(&temp_dir)?;
    let engine = build_engine(&config)?;
    let writer = build_report_writer(&config)?;

    let series = engine.search("GARCÍA, ANA, MATEMÁTICAS").await?;
    let written = writer.write(&series).await?;
    assert_eq!(
        written,
        vec!["Matematicas_Garcia_Ana.json", "Matematicas_Garcia_Ana.csv"]
    );

    let img = temp_dir.path().join("img");
    let json: serde_json::Value =
        serde_json::from_slice(&std::fs::read(img.join("Matematicas_Garcia_Ana.json"))?)?;
    assert_eq!(json["rank_panel"]["points"].as_array().map(Vec::len), Some(22));

    let csv = std::fs::read_to_string(img.join("Matematicas_Garcia_Ana.csv"))?;
    assert_eq!(csv.lines().count(), 23);
    assert!(csv.contains("2020,3,10,0.7"));
    Ok(())
}

#[tokio::test]
async fn test_suggestions_follow_retrieval_order() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = config_for(&temp_dir)?;
    let engine = build_engine(&config)?;

    let suggestions = engine.suggest("garcia").await?;
    assert_eq!(
        suggestions,
        vec!["García, Ana, Matemáticas", "García Ruiz, Ana, Física"]
    );

    let capped = engine.suggest("zeta").await?;
    assert_eq!(capped.len(), 10);
    assert_eq!(capped[0], "Zeta 0, Filler, Matemáticas");

    assert!(engine.suggest("").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_error_taxonomy() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config = config_for(&temp_dir)?;
    let engine = build_engine(&config)?;

    let err = engine.search("onlyonefield").await.unwrap_err();
    assert!(matches!(err, TrendError::InputFormat { .. }));
    assert!(err.is_user_error());

    let err = engine.search("nobody, at, all").await.unwrap_err();
    assert!(matches!(err, TrendError::NoMatch { .. }));

    let missing = TrendEngine::new(SqliteDataSource::new(temp_dir.path().join("absent.db")));
    let err = missing.search("garcia, ana, matematicas").await.unwrap_err();
    assert!(matches!(err, TrendError::DataSourceUnavailable { .. }));
    assert!(!err.is_user_error());
    Ok(())
}

#[tokio::test]
async fn test_search_over_csv_dataset() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let csv_path = temp_dir.path().join("positions.csv");
    std::fs::write(
        &csv_path,
        "year,rank,surname,name,specialty\n\
         2020,3,García,Ana,Matemáticas\n\
         2021,2,García,Ana,Matemáticas\n\
         2021,1,Núñez,Eva,Matemáticas\n",
    )?;

    let mut config = TomlConfig::default();
    config.source.kind = "csv".to_string();
    config.source.path = csv_path.to_string_lossy().into_owned();
    let engine = build_engine(&config)?;

    let series = engine.search("garcia, ana, matematicas").await?;
    let at = |year: i32| (year - 2004) as usize;
    assert_eq!(series.pool_sizes[at(2020)], 1);
    assert_eq!(series.pool_sizes[at(2021)], 2);
    // Last place in a full pool is the 0th percentile, not a missing value.
    assert_eq!(series.percentiles[at(2021)], Some(0.0));
    assert_eq!(series.percentiles[at(2019)], None);

    assert_eq!(engine.suggest("nunez").await?, vec!["Núñez, Eva, Matemáticas"]);
    Ok(())
}

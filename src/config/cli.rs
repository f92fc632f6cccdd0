use crate::config::toml_config::TomlConfig;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "rank-trend")]
#[command(about = "Look up a person in a multi-year ranked list and chart their rank trend")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Dataset path (SQLite database or CSV export)
    #[arg(long)]
    pub database: Option<String>,

    /// Dataset kind
    #[arg(long, value_parser = ["sqlite", "csv"])]
    pub source: Option<String>,

    /// Directory for chart artifacts
    #[arg(long)]
    pub output: Option<String>,

    #[arg(long)]
    pub first_year: Option<i32>,

    #[arg(long)]
    pub last_year: Option<i32>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Resolve "Surname, Name, Specialty" and write its trend charts
    Search {
        query: String,

        /// Zero-based pick among several matches (default: first)
        #[arg(long)]
        pick: Option<usize>,

        /// Print the series as JSON instead of writing chart files
        #[arg(long)]
        print: bool,

        /// List every matching identity with its pick index and stop
        #[arg(long, conflicts_with_all = ["pick", "print"])]
        list: bool,
    },
    /// List "surname, name, specialty" completions for a partial query
    Suggest {
        query: String,

        #[arg(long)]
        limit: Option<usize>,
    },
}

impl CliConfig {
    /// File settings (or defaults) with command-line flags layered on top.
    pub fn effective_config(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                TomlConfig::from_file(path)?
            }
            None => TomlConfig::default(),
        };

        if let Some(database) = &self.database {
            config.source.path = database.clone();
        }
        if let Some(kind) = &self.source {
            config.source.kind = kind.clone();
        }
        if let Some(output) = &self.output {
            config.output.path = output.clone();
        }
        if let Some(first_year) = self.first_year {
            config.analysis.first_year = first_year;
        }
        if let Some(last_year) = self.last_year {
            config.analysis.last_year = last_year;
        }
        if let Command::Suggest {
            limit: Some(limit), ..
        } = &self.command
        {
            config.suggest.limit = *limit;
        }

        config.validate()?;
        Ok(config)
    }
}

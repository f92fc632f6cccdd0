use crate::core::trend::{YearRange, DEFAULT_FIRST_YEAR, DEFAULT_LAST_YEAR};
use crate::core::ConfigProvider;
use crate::core::engine::DEFAULT_SUGGESTION_LIMIT;
use crate::utils::error::{Result, TrendError};
use crate::utils::validation::{
    validate_one_of, validate_path, validate_positive_number, validate_range, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const SOURCE_KINDS: [&str; 2] = ["sqlite", "csv"];
pub const OUTPUT_FORMATS: [&str; 2] = ["json", "csv"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub source: SourceConfig,
    pub analysis: AnalysisConfig,
    pub suggest: SuggestConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: String,
    pub path: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: "sqlite".to_string(),
            path: "instance/database.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub first_year: i32,
    pub last_year: i32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            first_year: DEFAULT_FIRST_YEAR,
            last_year: DEFAULT_LAST_YEAR,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestConfig {
    pub limit: usize,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_SUGGESTION_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: String,
    pub formats: Vec<String>,
    pub compression: Option<CompressionConfig>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "static/img".to_string(),
            formats: vec!["json".to_string()],
            compression: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(TrendError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| TrendError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay verbatim.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| TrendError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn year_range(&self) -> Result<YearRange> {
        YearRange::new(self.analysis.first_year, self.analysis.last_year)
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_one_of("source.kind", &self.source.kind, &SOURCE_KINDS)?;
        validate_path("source.path", &self.source.path)?;
        validate_path("output.path", &self.output.path)?;

        validate_range("analysis.first_year", self.analysis.first_year, 1900, 2100)?;
        validate_range("analysis.last_year", self.analysis.last_year, 1900, 2100)?;
        self.year_range()?;

        validate_positive_number("suggest.limit", self.suggest.limit, 1)?;

        if self.output.formats.is_empty() {
            return Err(TrendError::InvalidConfigValueError {
                field: "output.formats".to_string(),
                value: String::new(),
                reason: "At least one output format is required".to_string(),
            });
        }
        for format in &self.output.formats {
            validate_one_of("output.formats", format, &OUTPUT_FORMATS)?;
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn source_kind(&self) -> &str {
        &self.source.kind
    }

    fn source_path(&self) -> &str {
        &self.source.path
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn first_year(&self) -> i32 {
        self.analysis.first_year
    }

    fn last_year(&self) -> i32 {
        self.analysis.last_year
    }

    fn suggestion_limit(&self) -> usize {
        self.suggest.limit
    }

    fn output_formats(&self) -> &[String] {
        &self.output.formats
    }

    fn compress_output(&self) -> bool {
        self.output
            .compression
            .as_ref()
            .map(|c| c.enabled)
            .unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

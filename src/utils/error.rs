use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrendError {
    #[error("Empty search query")]
    EmptyQuery,

    #[error("Malformed search query '{query}': expected {expected}, got {found} fragment(s)")]
    InputFormat {
        query: String,
        expected: String,
        found: usize,
    },

    #[error("No matches found for '{query}'")]
    NoMatch { query: String },

    #[error("No yearly records for {surname}, {name} in {specialty}")]
    NoData {
        surname: String,
        name: String,
        specialty: String,
    },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Data source unavailable: {message}")]
    DataSourceUnavailable { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Background task failed: {0}")]
    TaskError(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    UserInput,
    Lookup,
    DataSource,
    Output,
    Configuration,
    Runtime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl TrendError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            TrendError::EmptyQuery | TrendError::InputFormat { .. } => ErrorCategory::UserInput,
            TrendError::NoMatch { .. } | TrendError::NoData { .. } => ErrorCategory::Lookup,
            TrendError::Database(_) | TrendError::DataSourceUnavailable { .. } => {
                ErrorCategory::DataSource
            }
            TrendError::IoError(_)
            | TrendError::CsvError(_)
            | TrendError::SerializationError(_)
            | TrendError::ZipError(_) => ErrorCategory::Output,
            TrendError::ConfigError { .. } | TrendError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            TrendError::TaskError(_) => ErrorCategory::Runtime,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::UserInput | ErrorCategory::Lookup => ErrorSeverity::Low,
            ErrorCategory::Output => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::DataSource | ErrorCategory::Runtime => ErrorSeverity::Critical,
        }
    }

    /// User-correctable conditions that end a request with a message and no chart.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::UserInput | ErrorCategory::Lookup
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            TrendError::EmptyQuery => "You must enter a value.".to_string(),
            TrendError::InputFormat { .. } => {
                "Incorrect search format. Use: Surname, Name, Specialty".to_string()
            }
            TrendError::NoMatch { .. } => "No matches found.".to_string(),
            TrendError::NoData { .. } => "Could not build the chart: no yearly data.".to_string(),
            TrendError::Database(_) | TrendError::DataSourceUnavailable { .. } => {
                "The ranking dataset could not be read.".to_string()
            }
            TrendError::ConfigError { message } => format!("Invalid configuration: {}", message),
            TrendError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid configuration for {}: {}", field, reason)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::UserInput => "Separate the three fragments with commas",
            ErrorCategory::Lookup => "Try shorter fragments or use `suggest` to list candidates",
            ErrorCategory::DataSource => "Check that the database path exists and is readable",
            ErrorCategory::Output => "Check that the output directory is writable",
            ErrorCategory::Configuration => "Review the configuration file and CLI flags",
            ErrorCategory::Runtime => "Retry the request",
        }
    }
}

pub type Result<T> = std::result::Result<T, TrendError>;

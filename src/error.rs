use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Workbook Error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input table lacks one or more of the required columns.
    #[error("Missing required fields: {}", missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("Input contains no data rows")]
    EmptyInput,

    #[error("No reports available to export")]
    EmptyBatch,

    #[error("No report at position {index} (batch has {len})")]
    NoSuchRecord { index: usize, len: usize },

    #[error("No report is selected")]
    NoSelection,

    #[error("Capture failed for '{name}': {reason}")]
    Capture { name: String, reason: String },

    #[error("Archive Error: {0}")]
    Archive(String),

    #[error("Render Error: {0}")]
    Render(String),

    #[error("Config Service Error: {0}")]
    Remote(#[from] reqwest::Error),

    #[error("Configuration Error: {0}")]
    Config(String),
}

impl ReportError {
    pub fn capture(name: impl Into<String>, reason: impl ToString) -> Self {
        Self::Capture {
            name: name.into(),
            reason: reason.to_string(),
        }
    }
}

pub type ReportResult<T> = Result<T, ReportError>;

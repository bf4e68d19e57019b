use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsVoidError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {message}")]
    Parse { message: String, line: Option<usize>, col: Option<usize> },
    #[error("Not a stats document: {0}")]
    NotAStatsDocument(String),
    #[error("Invalid IRI: {0}")]
    InvalidIri(String),
}

pub type Result<T> = std::result::Result<T, StatsVoidError>;

// Helper conversions
impl From<config::ConfigError> for StatsVoidError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdragError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Empty test suite: {0}")]
    EmptySuite(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PdragError>;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HorizonsError {
    #[error("Entity not found: {0}")]
    EntityNotFound(String),

    #[error("Ambiguous id: {0}")]
    AmbiguousId(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HorizonsError>;

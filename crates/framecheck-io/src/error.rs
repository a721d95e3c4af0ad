use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("schema error: {0}")]
    Schema(String),

    #[error(transparent)]
    Core(#[from] framecheck_core::error::Error),

    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),
}

impl From<Error> for framecheck_core::error::Error {
    fn from(e: Error) -> Self {
        match e {
            Error::Core(inner) => inner,
            other => framecheck_core::error::Error::Materialize(other.to_string()),
        }
    }
}

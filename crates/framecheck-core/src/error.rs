use thiserror::Error;

/// Canonical result for core.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Schema error: {0}")]
    Schema(String),

    /// A deferred table could not produce its local form.
    #[error("Materialization failed: {0}")]
    Materialize(String),

    /// Error with context chain for better debugging
    #[error("Error in {context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    /// Add context to an error, creating an error chain.
    ///
    /// # Example
    /// ```rust,no_run
    /// use framecheck_core::error::Error;
    /// let err = Error::Schema("column length mismatch".into());
    /// let err = err.with_context("while building the expected frame");
    /// ```
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Error::Context {
            context: context.into(),
            source: Box::new(self) as Box<dyn std::error::Error + Send + Sync>,
        }
    }

    /// Get suggestions for common errors.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Error::Schema(msg) => {
                if msg.contains("length") {
                    vec!["Check that every column has the same number of values".into(),
                         "Verify the index length matches the row count".into()]
                } else {
                    vec![]
                }
            }
            Error::Config(msg) => {
                if msg.contains("master") {
                    vec!["Use a master of the form local, local[N] or local[*]".into()]
                } else if msg.contains("home") {
                    vec!["Set FRAMECHECK_HOME (or SPARK_HOME) to the build root".into()]
                } else {
                    vec![]
                }
            }
            Error::Materialize(_) => {
                vec!["Check that the owning session has not been stopped".into()]
            }
            _ => vec![],
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e.to_string())
    }
}

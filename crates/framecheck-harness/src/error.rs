use std::path::PathBuf;

use thiserror::Error;

use framecheck_assert::AssertError;

pub type Result<T> = std::result::Result<T, HarnessError>;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("Test failed due to timeout after {timeout} sec, with last condition returning: {last}")]
    Timeout { timeout: f64, last: String },

    #[error(transparent)]
    Assertion(#[from] AssertError),

    #[error("Did not see expected warning of class '{0}'")]
    MissingExpectedWarning(String),

    /// `(category, message, file, line)` of every unexpected warning.
    #[error("Caused unexpected warning(s): {}", render_warnings(.0))]
    UnexpectedWarnings(Vec<(String, String, String, u32)>),

    #[error(
        "Warning not set with correct stacklevel. File where warning is raised: {raised} != {caller}. Warning message: {message}"
    )]
    WarningStackLevel {
        raised: String,
        caller: String,
        message: String,
    },

    /// A warning raised inside a scope whose filter turns warnings into errors.
    #[error("{category}: {message}")]
    WarningAsError { category: String, message: String },

    #[error("Found multiple JARs: {}; please remove all but one", render_paths(.0))]
    MultipleArtifacts(Vec<PathBuf>),

    #[error("session error: {0}")]
    Session(String),

    #[error(transparent)]
    Config(#[from] framecheck_core::error::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

impl HarnessError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, HarnessError::Timeout { .. })
    }

    /// The comparison failure behind this error, if any.
    pub fn as_assertion(&self) -> Option<&AssertError> {
        match self {
            HarnessError::Assertion(e) => Some(e),
            _ => None,
        }
    }
}

fn render_warnings(warnings: &[(String, String, String, u32)]) -> String {
    let items: Vec<String> = warnings
        .iter()
        .map(|(category, message, file, line)| {
            format!("('{}', '{}', '{}', {})", category, message, file, line)
        })
        .collect();
    format!("[{}]", items.join(", "))
}

fn render_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

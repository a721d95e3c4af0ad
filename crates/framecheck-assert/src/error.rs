use thiserror::Error;

pub type Result<T> = std::result::Result<T, AssertError>;

/// A failed comparison. Every variant carries enough of both operands for a
/// reader to diff them by eye.
#[derive(Debug, Error)]
pub enum AssertError {
    /// Dimensions differ (frame shape, series/index/sequence length, levels).
    #[error("{detail}\n\nLeft:\n{left}\n\nRight:\n{right}")]
    ShapeMismatch {
        detail: String,
        left: String,
        right: String,
    },

    /// Same shape, different content or axis metadata.
    #[error("{detail}\n\nLeft:\n{left}\n\nRight:\n{right}")]
    ValueMismatch {
        detail: String,
        left: String,
        right: String,
    },

    /// The operands fall into no comparable pair of kinds.
    #[error("Unexpected values: ({left}, {right})")]
    UnsupportedOperands { left: String, right: String },

    /// One element of two sequences differs.
    #[error("sequence element {position} differs: {source}")]
    Element {
        position: usize,
        #[source]
        source: Box<AssertError>,
    },

    #[error("materialization failed: {0}")]
    Materialize(#[from] framecheck_core::error::Error),

    /// A dual-execution body failed before producing results.
    #[error("test body failed on {context} context: {message}")]
    Body { context: &'static str, message: String },
}

impl AssertError {
    /// The comparison text without the operand renderings.
    pub fn detail(&self) -> String {
        match self {
            AssertError::ShapeMismatch { detail, .. } | AssertError::ValueMismatch { detail, .. } => {
                detail.clone()
            }
            AssertError::Element { position, source } => {
                format!("sequence element {}: {}", position, source.detail())
            }
            other => other.to_string(),
        }
    }

    pub fn is_shape_mismatch(&self) -> bool {
        match self {
            AssertError::ShapeMismatch { .. } => true,
            AssertError::Element { source, .. } => source.is_shape_mismatch(),
            _ => false,
        }
    }

    pub fn is_value_mismatch(&self) -> bool {
        match self {
            AssertError::ValueMismatch { .. } => true,
            AssertError::Element { source, .. } => source.is_value_mismatch(),
            _ => false,
        }
    }
}

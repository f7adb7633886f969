use filter_core::BuildError;
use thiserror::Error;

/// Raised when a valid condition cannot be expressed by the target dialect.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LowerError {
    #[error("{dialect} cannot express {feature}")]
    Unsupported { dialect: String, feature: String },

    #[error("unsupported expression in lowering: {0}")]
    UnsupportedExpression(String),
}

#[derive(Debug, Error)]
pub enum FilterError {
    /// The filter is invalid for the schema.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// The filter is valid but the backend cannot express it.
    #[error(transparent)]
    Lower(#[from] LowerError),

    #[error("invalid filter settings: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("unknown dialect {0:?}")]
    UnknownDialect(String),
}

impl FilterError {
    /// Whether the error stems from the user-supplied filter rather than
    /// from configuration or backend limitations.
    pub fn is_client_error(&self) -> bool {
        matches!(self, FilterError::Build(_))
    }
}

pub type Result<T> = std::result::Result<T, FilterError>;

/// Convenience result type used across vtstyle.
pub type StyleResult<T> = Result<T, StyleError>;

/// Top-level error taxonomy used by symbolizer APIs.
#[derive(thiserror::Error, Debug)]
pub enum StyleError {
    /// Invalid settings or input documents.
    #[error("validation error: {0}")]
    Validation(String),

    /// A style expression could not be parsed.
    #[error("expression error: {0}")]
    Expression(String),

    /// Errors while evaluating bound parameters or converting their values.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// An external bitmap asset is missing or could not be decoded.
    #[error("asset error: {0}")]
    Asset(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StyleError {
    /// Build a [`StyleError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StyleError::Expression`] value.
    pub fn expression(msg: impl Into<String>) -> Self {
        Self::Expression(msg.into())
    }

    /// Build a [`StyleError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`StyleError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

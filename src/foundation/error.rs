/// Convenience result type used across cardkit.
pub type CardResult<T> = Result<T, CardError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Asset fetch failures never surface here: unavailable fonts and images
/// degrade to an omitted element instead of failing the render. Output-cache
/// IO failures are swallowed at the cache layer.
#[derive(thiserror::Error, Debug)]
pub enum CardError {
    /// Invalid user-provided request data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while encoding the rendered surface to the output format.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing request descriptions.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CardError {
    /// Build a [`CardError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CardError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`CardError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

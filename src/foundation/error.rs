/// Convenience result type used across Capsule.
pub type CapsuleResult<T> = Result<T, CapsuleError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Per-entry data problems (a vanished item, an undecodable image) are absorbed where they
/// occur and never show up here; only whole-operation failures do.
#[derive(thiserror::Error, Debug)]
pub enum CapsuleError {
    /// Rejected canvas event or invalid caller-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// The snapshot raster could not be produced or encoded.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors when serializing or deserializing persisted records.
    #[error("serialization error: {0}")]
    Serde(String),

    /// The outfit store refused or failed the write.
    #[error("store error: {0}")]
    Store(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CapsuleError {
    /// Build a [`CapsuleError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CapsuleError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`CapsuleError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`CapsuleError::Store`] value.
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

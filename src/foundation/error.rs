/// Convenience result type used across the crate.
pub type RecolorResult<T> = Result<T, RecolorError>;

/// Top-level error taxonomy for node setup and frame processing.
///
/// A mask that is absent for a frame is not an error: executors return `Ok(None)` for it.
#[derive(thiserror::Error, Debug)]
pub enum RecolorError {
    /// Invalid or missing setup data (target color, stream tags).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A frame or call that does not satisfy the executor's contract.
    #[error("contract violation: {0}")]
    ContractViolation(String),

    /// GPU device, shader or pipeline failures.
    #[error("gpu resource error: {0}")]
    GpuResource(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RecolorError {
    /// Build a [`RecolorError::Configuration`] value.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`RecolorError::ContractViolation`] value.
    pub fn contract(msg: impl Into<String>) -> Self {
        Self::ContractViolation(msg.into())
    }

    /// Build a [`RecolorError::GpuResource`] value.
    pub fn gpu(msg: impl Into<String>) -> Self {
        Self::GpuResource(msg.into())
    }

    /// Build a [`RecolorError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

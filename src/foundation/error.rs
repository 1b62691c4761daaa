/// Convenience result type used across fluidseed.
pub type FluidResult<T> = Result<T, FluidError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum FluidError {
    /// Invalid startup configuration (fail-fast, never clamped).
    #[error("config error: {0}")]
    Config(String),

    /// Invalid caller-provided parameter data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Operations addressing a layer that is not in the registry.
    #[error("layer error: {0}")]
    Layer(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FluidError {
    /// Build a [`FluidError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`FluidError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FluidError::Layer`] value.
    pub fn layer(msg: impl Into<String>) -> Self {
        Self::Layer(msg.into())
    }

    /// Build a [`FluidError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

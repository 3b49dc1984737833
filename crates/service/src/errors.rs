use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("duplicate key: {0}")]
    DuplicateKey(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(msg: &str) -> Self { Self::NotFound(msg.to_string()) }

    pub fn storage(e: impl std::fmt::Display) -> Self { Self::Storage(e.to_string()) }

    /// Message without the kind prefix, suitable for a client-facing `detail`.
    pub fn detail(&self) -> String {
        match self {
            Self::Validation(m) | Self::DuplicateKey(m) | Self::NotFound(m) | Self::Storage(m) => m.clone(),
            Self::Model(models::errors::ModelError::Validation(m)) => m.clone(),
        }
    }

    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) | Self::Model(_) => "validation",
            Self::DuplicateKey(_) => "duplicate_key",
            Self::NotFound(_) => "not_found",
            Self::Storage(_) => "storage",
        }
    }
}

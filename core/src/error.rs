use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation failed: {reason}")]
    Validation { reason: String },

    #[error("Duplicate SKU '{sku}' in dataset")]
    DuplicateSku { sku: String },

    #[error("SKU '{sku}' not found")]
    NotFound { sku: String },

    #[error("Session '{session_id}' not found")]
    SessionNotFound { session_id: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DashboardError {
    /// Rejected input: malformed record or duplicate key on load.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::DuplicateSku { .. })
    }

    /// An operation referenced something that does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::SessionNotFound { .. })
    }
}

pub type DashboardResult<T> = Result<T, DashboardError>;

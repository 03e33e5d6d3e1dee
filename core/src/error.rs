use thiserror::Error;

/// Failures surfaced by tracker operations.
///
/// Looking up an entity that does not exist is deliberately absent here:
/// deleting or editing an unknown meal is a silent no-op.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("invalid import document: {0}")]
    ImportParse(String),
    #[error("storage error: {0:#}")]
    Storage(anyhow::Error),
}

impl TrackerError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn import(message: impl Into<String>) -> Self {
        Self::ImportParse(message.into())
    }
}

use crate::export::ExportError;
use crate::gateway::GatewayError;

#[derive(Debug, thiserror::Error)]
pub enum HandoverError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("MRN is required to save a report: {0}")]
    MissingMrn(handover_types::TextError),
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("unknown section: {0}")]
    UnknownSection(String),
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] handover_uuid::UuidError),

    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),
    #[error("export failed: {0}")]
    Export(#[from] ExportError),

    #[error("failed to create snapshot directory: {0}")]
    SnapshotDirCreation(std::io::Error),
    #[error("failed to write snapshot: {0}")]
    SnapshotWrite(std::io::Error),
    #[error("failed to read snapshot: {0}")]
    SnapshotRead(std::io::Error),
    #[error("snapshot not found: {0}")]
    SnapshotNotFound(String),

    #[error("failed to serialize report: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize report: {0}")]
    Deserialization(serde_json::Error),
}

impl HandoverError {
    /// True for errors caused by user input, which are reported before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            HandoverError::InvalidInput(_)
                | HandoverError::MissingMrn(_)
                | HandoverError::UnknownField(_)
                | HandoverError::UnknownSection(_)
                | HandoverError::InvalidId(_)
        )
    }
}

pub type HandoverResult<T> = std::result::Result<T, HandoverError>;

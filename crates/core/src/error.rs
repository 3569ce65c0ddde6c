#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error("checklist index {index} is out of range (checklist has {len} entries)")]
    OutOfRangeIndex { index: usize, len: usize },
    #[error("missing configuration: {0}")]
    MissingConfiguration(&'static str),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("invalid reading: {0}")]
    InvalidReading(String),
    #[error("patient identifier space exhausted")]
    IdentifierExhausted,
    #[error("patient record lock poisoned")]
    LockPoisoned,

    #[error("failed to create card directory: {0}")]
    CardDirCreation(std::io::Error),
    #[error("failed to write status card: {0}")]
    CardWrite(std::io::Error),
    #[error("failed to read status card: {0}")]
    CardRead(std::io::Error),
    #[error("failed to remove status card: {0}")]
    CardRemove(std::io::Error),
    #[error("failed to serialize status card: {0}")]
    CardSerialization(serde_json::Error),

    #[error("announcement worker requires a Tokio runtime: {0}")]
    RuntimeUnavailable(String),
    #[error("announcement queue is closed")]
    AnnouncementQueueClosed,
    #[error("speech failed: {0}")]
    Speech(String),
}

pub type TriageResult<T> = std::result::Result<T, TriageError>;

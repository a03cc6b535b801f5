use thiserror::Error;

/// Failures the alerting core can surface to callers.
///
/// A missing alert id is not an error: store mutations that reference an
/// unknown id return `Ok(false)` instead.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The data provider could not produce a snapshot. The scheduler logs
    /// this and retries on the next tick.
    #[error("data provider snapshot failed: {0}")]
    Provider(String),

    /// Reading or writing the alert collection failed. In-memory state is
    /// left as it was before the failed write.
    #[error("alert persistence failed: {0}")]
    Persistence(#[from] std::io::Error),

    /// The persisted alert collection (or settings file) is not valid JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

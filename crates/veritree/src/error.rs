//! Status codes shared by tree creation and verification

/// Tree error type
///
/// Every operation reports failure through one of these statuses; nothing
/// is recovered internally. [`TreeError::DataIntegrity`] is the only
/// security-relevant variant and is never returned for a caller mistake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// Caller contract violation: missing or undersized buffer.
    #[error("invalid argument")]
    InvalidArgs,
    /// The tree buffer is smaller than `tree_length` requires.
    #[error("tree buffer too small")]
    BufferTooSmall,
    /// Offset plus length overruns the declared payload length.
    #[error("offset or length out of range")]
    OutOfRange,
    /// Streaming protocol violated: update before init, or finalize
    /// before the full payload was supplied.
    #[error("operation out of order")]
    BadState,
    /// A computed digest did not match the stored tree or the root.
    #[error("data integrity violation")]
    DataIntegrity,
}

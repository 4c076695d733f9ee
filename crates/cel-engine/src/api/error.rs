/// Convenience result type used across the engine.
pub type EngineResult<T> = Result<T, EngineError>;

/// Error taxonomy for engine APIs.
///
/// Every variant is a recoverable, caller-side condition — typically a
/// programming error at the call site. The engine never retries and never
/// converts these into panics.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum EngineError {
    /// A transform with zero determinant cannot be inverted.
    #[error("degenerate transform: determinant is zero")]
    DegenerateTransform,

    /// Invalid user-provided argument (blank items, zero-sized resolutions).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A visual was constructed without a usable source.
    #[error("invalid source: {0}")]
    InvalidSource(String),

    /// Frame index outside the clip's frame list.
    #[error("frame index {index} out of range (frame count {len})")]
    FrameIndexOutOfRange { index: usize, len: usize },

    /// Clips keep at least one frame at all times.
    #[error("cannot remove the last frame of a clip")]
    CannotRemoveLastFrame,
}

impl EngineError {
    /// Build an [`EngineError::InvalidArgument`] value.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Build an [`EngineError::InvalidSource`] value.
    pub fn invalid_source(msg: impl Into<String>) -> Self {
        Self::InvalidSource(msg.into())
    }
}

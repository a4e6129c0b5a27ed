/// Crate-level error type for the martele stroke-analysis library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A `good_range` pair that cannot be resolved against the buffer.
    ///
    /// Negative indices count from the end of the buffer. A range is
    /// malformed when either index falls outside the buffer after
    /// resolution, or when the resolved start lies past the resolved end.
    #[error("invalid good_range ({start}, {end}) for buffer of {len} samples: {reason}")]
    InvalidRange {
        start: i64,
        end: i64,
        len: usize,
        reason: &'static str,
    },

    /// Invalid parameter value.
    #[error("invalid parameter `{name}`: got {value}, {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// A required dimension is zero or invalid.
    #[error("invalid size for `{name}`: {value} ({reason})")]
    InvalidSize {
        name: &'static str,
        value: usize,
        reason: &'static str,
    },

    /// A second onset source was requested on an instance whose onsets
    /// are already computed. Stages advance forward only.
    #[error("onset positions are already computed for this sample")]
    OnsetsAlreadyComputed,

    /// Audio decode/resample errors.
    #[error(transparent)]
    Audio(#[from] crate::io::AudioError),

    /// File I/O errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for martele operations.
pub type Result<T> = std::result::Result<T, Error>;

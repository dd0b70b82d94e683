//! Error types for the segpack codec

/// Errors that can occur during encoding or decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Tag byte does not correspond to any MessagePack format
    InvalidData,
    /// Input ended before a recognized tag's length or payload was complete
    InsufficientData,
    /// Nesting deeper than the configured decode limit
    DepthLimitExceeded,
    /// Output buffer too small for the encoded value
    ShortBuffer,
}

impl Error {
    /// Returns a human-readable description of the error
    pub const fn description(&self) -> &'static str {
        match self {
            Error::InvalidData => "invalid MessagePack format tag",
            Error::InsufficientData => "insufficient data to complete value",
            Error::DepthLimitExceeded => "nesting depth limit exceeded",
            Error::ShortBuffer => "buffer too small for operation",
        }
    }

    /// True when the input was a well-formed but truncated prefix
    ///
    /// Callers that receive data incrementally can retry the whole decode
    /// once more bytes are available.
    #[inline]
    pub const fn is_incomplete(&self) -> bool {
        matches!(self, Error::InsufficientData)
    }
}

#[cfg(feature = "std")]
impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias for segpack operations
pub type Result<T> = core::result::Result<T, Error>;

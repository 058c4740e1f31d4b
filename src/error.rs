use thiserror::Error;

/// Errors produced by the encoder and decoder
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Payload does not fit into the largest tier
    #[error("payload needs {needed} modules, largest tier holds {max}")]
    CapacityExceeded {
        /// Modules required by the payload
        needed: usize,
        /// Capacity of the largest tier
        max: usize,
    },
    /// No primary/secondary finder pair was found
    #[error("no symbol found")]
    SymbolNotFound,
    /// A candidate region did not yield a usable triangle
    #[error("ambiguous geometry: {0}")]
    AmbiguousGeometry(&'static str),
    /// A symbol was located but its content failed validation
    #[error("corrupt payload: {0}")]
    CorruptPayload(&'static str),
    /// The 2-bit sign prefix is not a known mode
    #[error("unknown sign mode {0:#04b}")]
    UnknownSignMode(u8),
    /// Pixel buffer length does not match the stated dimensions
    #[error("invalid image buffer: expected {expected} bytes, got {actual}")]
    InvalidImage {
        /// Expected byte length
        expected: usize,
        /// Actual byte length
        actual: usize,
    },
    /// Pixel layout other than RGB or RGBA
    #[error("unsupported channel count {0}, expected 3 or 4")]
    UnsupportedChannels(usize),
    /// Dimensions whose byte length does not fit in memory
    #[error("image dimensions {width}x{height} overflow")]
    ImageTooLarge {
        /// Width in pixels
        width: usize,
        /// Height in pixels
        height: usize,
    },
    /// Text the encoder cannot represent
    #[error("unencodable text: {0}")]
    InvalidText(&'static str),
}

/// Crate result alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = Error::CapacityExceeded { needed: 2000, max: 1886 };
        assert_eq!(
            err.to_string(),
            "payload needs 2000 modules, largest tier holds 1886"
        );
        assert_eq!(Error::UnknownSignMode(2).to_string(), "unknown sign mode 0b10");
        assert_eq!(Error::SymbolNotFound.to_string(), "no symbol found");
        assert_eq!(
            Error::UnsupportedChannels(1).to_string(),
            "unsupported channel count 1, expected 3 or 4"
        );
    }
}

//! Error taxonomy for the block codec.
//!
//! Every failure class carries a stable negative integer code so that callers
//! holding a raw status (FFI shims, exit-code plumbing) can translate back and
//! forth without string matching.

/// Errors produced by block encoding, decoding and state construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The caller committed more bytes than the state's block size, or an
    /// output buffer was too small for the committed data.
    #[error("data index out of bounds")]
    OutOfBounds,
    /// The Burrows-Wheeler transform failed, or the recorded primary index
    /// was out of range on decode.
    #[error("Burrows-Wheeler transform failed")]
    Bwt,
    /// The decoded block does not match its recorded CRC-32.
    #[error("CRC-32 check failed")]
    Crc,
    /// The file signature, recorded block size or a recorded stage size is
    /// invalid.
    #[error("malformed header")]
    MalformedHeader,
    /// The input ended before a complete block could be read.
    #[error("truncated data")]
    TruncatedData,
    /// The recorded original size exceeds the state's configured block size.
    #[error("too much data")]
    DataTooBig,
    /// State construction failed (invalid block size).
    #[error("state initialization failed")]
    Init,
}

impl Error {
    /// Stable integer code; `0` is reserved for success.
    pub fn code(self) -> i32 {
        match self {
            Error::OutOfBounds => -1,
            Error::Bwt => -2,
            Error::Crc => -3,
            Error::MalformedHeader => -4,
            Error::TruncatedData => -5,
            Error::DataTooBig => -6,
            Error::Init => -7,
        }
    }

    /// Inverse of [`Error::code`]. Returns `None` for `0` and unknown codes.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(Error::OutOfBounds),
            -2 => Some(Error::Bwt),
            -3 => Some(Error::Crc),
            -4 => Some(Error::MalformedHeader),
            -5 => Some(Error::TruncatedData),
            -6 => Some(Error::DataTooBig),
            -7 => Some(Error::Init),
            _ => None,
        }
    }
}

/// Convenience alias used throughout the codec.
pub type Result<T> = core::result::Result<T, Error>;

mod storage_errors;

use std::io;

pub use storage_errors::InvalidSegmentFileName;

/// Errors surfaced by the commit log.
#[derive(Debug)]
#[derive(thiserror::Error)]
pub enum LogError {
    /// An underlying filesystem operation failed. Propagated unchanged.
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    EndOfIndex(#[from] EndOfIndex),

    #[error(transparent)]
    OffsetOutOfRange(#[from] OffsetOutOfRange),

    /// Record marshaling or unmarshaling failed.
    #[error("record codec failed: {0}")]
    Codec(#[source] io::Error),
}

impl From<LogError> for io::Error {
    fn from(value: LogError) -> Self {
        match value {
            LogError::Io(e) => e,
            LogError::EndOfIndex(e) => {
                io::Error::new(io::ErrorKind::UnexpectedEof, e.to_string())
            }
            LogError::OffsetOutOfRange(e) => {
                io::Error::new(io::ErrorKind::NotFound, e.to_string())
            }
            LogError::Codec(e) => {
                io::Error::new(io::ErrorKind::InvalidData, e.to_string())
            }
        }
    }
}

/// Error indicating that the index has no entry at the requested slot, or
/// no room for another entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(thiserror::Error)]
#[error("end of index")]
pub struct EndOfIndex;

/// Error indicating that no segment covers the requested offset.
///
/// A streaming consumer distinguishes this from [`EndOfIndex`]: reading one
/// past the highest offset means "await new data", not "abort".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(thiserror::Error)]
#[error("offset {offset} is outside the range of the log")]
pub struct OffsetOutOfRange {
    pub offset: u64,
}

impl OffsetOutOfRange {
    pub fn new(offset: u64) -> Self {
        Self { offset }
    }
}

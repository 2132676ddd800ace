//! The record contract of the commit log.
//!
//! The log stores records as opaque bytes. The only structure it relies on
//! is a 64-bit offset, which the active segment stamps into the record
//! immediately before serialization. How a record maps to bytes is decided
//! by its [`codeq::Codec`] implementation, not by the log.

use std::fmt::Debug;

use codeq::Codec;

/// Types that can be stored as records in the commit log.
///
/// Implementations provide the serialization via [`codeq::Codec`] and give
/// the log access to the offset field.
pub trait LogRecord
where Self: Debug + Clone + Codec + Send + Sync + 'static
{
    /// Returns the offset assigned to this record.
    ///
    /// Meaningful only after the record has been appended or read; the log
    /// assigns offsets, callers may not.
    fn offset(&self) -> u64;

    /// Stamps the offset into the record.
    ///
    /// Called by the active segment right before the record is serialized;
    /// any value the caller put there is overwritten.
    fn set_offset(&mut self, offset: u64);
}

use crate::api::log_record::LogRecord;
use crate::errors::LogError;

/// The offset-keyed contract a log consumer depends on.
///
/// An RPC server maps its produce/consume operations onto exactly these two
/// methods and needs nothing else from the storage tier. Depending on this
/// trait instead of the concrete [`Log`](crate::Log) lets tests substitute
/// an in-memory fake.
pub trait CommitLog<R>
where R: LogRecord
{
    /// Appends the record to the log and returns the offset it was assigned.
    fn append(&mut self, record: R) -> Result<u64, LogError>;

    /// Reads the record stored at `offset`.
    ///
    /// Fails with [`OffsetOutOfRange`](crate::errors::OffsetOutOfRange) when
    /// no segment covers `offset`.
    fn read(&self, offset: u64) -> Result<R, LogError>;
}

use crate::commit_log::index::ENT_WIDTH;
use crate::commit_log::store::LEN_WIDTH;
use crate::record::Record;

/// Create a record from a payload literal.
#[allow(dead_code)]
pub(crate) fn rec(payload: impl AsRef<[u8]>) -> Record {
    Record::new(payload.as_ref().to_vec())
}

/// Number of store-file bytes one record with an `n`-byte payload occupies:
/// the 8-byte frame length prefix plus the encoded record (8-byte offset,
/// 4-byte payload length, payload, 8-byte checksum).
#[allow(dead_code)]
pub(crate) fn frame_size(n: u64) -> u64 {
    LEN_WIDTH + 8 + 4 + n + 8
}

/// Index bytes that give a segment room for exactly `n` entries.
#[allow(dead_code)]
pub(crate) fn index_bytes_for(n: u64) -> u64 {
    n * ENT_WIDTH
}

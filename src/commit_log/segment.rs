use std::fs;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::api::log_record::LogRecord;
use crate::commit_log::index::Index;
use crate::commit_log::index::ENT_WIDTH;
use crate::commit_log::stat::SegmentStat;
use crate::commit_log::store::Store;
use crate::config::Config;
use crate::errors::EndOfIndex;
use crate::errors::LogError;

/// One segment of the log: a store paired with the index that maps offsets
/// into it.
///
/// A segment owns the contiguous offset range `[base_offset, next_offset)`.
/// `base_offset` is fixed at creation and names both files on disk;
/// `next_offset` is the offset the next append receives.
#[derive(Debug)]
pub(crate) struct Segment<R> {
    store: Store,
    index: Index,
    base_offset: u64,
    next_offset: u64,
    config: Arc<Config>,
    _p: PhantomData<R>,
}

impl<R> Segment<R>
where R: LogRecord
{
    /// Opens (creating if absent) the `<base_offset>.store` and
    /// `<base_offset>.index` pair in the log directory.
    ///
    /// `next_offset` is recovered from the index: one past its last entry,
    /// or `base_offset` when the index is empty.
    pub(crate) fn open(
        config: Arc<Config>,
        base_offset: u64,
    ) -> Result<Self, LogError> {
        let store = Store::open(&config.store_path(base_offset))?;
        let index = Index::open(
            &config.index_path(base_offset),
            config.max_index_bytes(),
        )?;

        let next_offset = match index.read(-1) {
            Ok((off, _)) => base_offset + u64::from(off) + 1,
            Err(LogError::EndOfIndex(_)) => base_offset,
            Err(e) => return Err(e),
        };

        Ok(Self {
            store,
            index,
            base_offset,
            next_offset,
            config,
            _p: PhantomData,
        })
    }

    /// Stamps the record with the next offset, appends its serialized bytes
    /// to the store, then records the `(relative_offset, position)` pair in
    /// the index.
    ///
    /// The index entry is written only after the store append returns, so a
    /// failure between the two leaves a dangling store frame that no offset
    /// lookup can reach, and `next_offset` is not advanced.
    pub(crate) fn append(&mut self, mut record: R) -> Result<u64, LogError> {
        let cur = self.next_offset;
        record.set_offset(cur);

        let mut p = Vec::new();
        record.encode(&mut p).map_err(LogError::Codec)?;

        let (_, pos) = self.store.append(&p)?;

        self.index.write((cur - self.base_offset) as u32, pos)?;
        self.next_offset += 1;

        Ok(cur)
    }

    /// Reads the record stored at the absolute `offset`.
    ///
    /// An offset outside `[base_offset, next_offset)` surfaces as
    /// [`EndOfIndex`] from the index lookup.
    pub(crate) fn read(&self, offset: u64) -> Result<R, LogError> {
        let slot = offset
            .checked_sub(self.base_offset)
            .and_then(|rel| i64::try_from(rel).ok())
            .ok_or(EndOfIndex)?;

        let (_, pos) = self.index.read(slot)?;
        let p = self.store.read(pos)?;

        R::decode(p.as_slice()).map_err(LogError::Codec)
    }

    /// True when either file has reached its configured capacity and the
    /// segment can take no further appends.
    pub(crate) fn is_maxed(&self) -> bool {
        self.store.size() >= self.config.max_store_bytes()
            || self.index.is_maxed()
    }

    /// First absolute offset that may live in this segment.
    pub(crate) fn base_offset(&self) -> u64 {
        self.base_offset
    }

    /// The absolute offset the next append will receive.
    pub(crate) fn next_offset(&self) -> u64 {
        self.next_offset
    }

    pub(crate) fn stat(&self) -> SegmentStat {
        SegmentStat {
            base_offset: self.base_offset,
            next_offset: self.next_offset,
            store_size: self.store.size(),
            index_entries: self.index.size() / ENT_WIDTH,
        }
    }

    /// Closes the index then the store, in that order.
    pub(crate) fn close(self) -> Result<(), LogError> {
        let Self { store, index, .. } = self;

        index.close()?;
        store.close()?;

        Ok(())
    }

    /// Closes the segment and unlinks both files.
    pub(crate) fn remove(self) -> Result<(), LogError> {
        let store_path = self.config.store_path(self.base_offset);
        let index_path = self.index.name().to_string();

        self.close()?;

        fs::remove_file(index_path)?;
        fs::remove_file(store_path)?;

        Ok(())
    }
}

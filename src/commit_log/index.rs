use std::fs::File;
use std::fs::OpenOptions;

use byteorder::BigEndian;
use byteorder::ByteOrder;
use memmap2::MmapMut;

use crate::errors::EndOfIndex;
use crate::errors::LogError;

/// Width of the relative-offset column of an entry.
const OFF_WIDTH: usize = 4;
/// Width of the store-position column of an entry.
const POS_WIDTH: usize = 8;
/// Width of one index entry.
pub(crate) const ENT_WIDTH: u64 = (OFF_WIDTH + POS_WIDTH) as u64;

/// The offset table of a segment, memory-mapped for syscall-free lookups.
///
/// Entries are fixed-width pairs of a `u32` relative offset and a `u64`
/// store position, both big-endian, dense and ascending from zero. The file
/// is extended to the configured maximum up front and mapped read-write,
/// shared; the map is never grown, the owning segment rolls instead when
/// [`is_maxed`](Index::is_maxed) reports no room. The logical size is
/// tracked separately from the mapped length, and [`close`](Index::close)
/// truncates the file back to it, so a cleanly closed index holds exactly
/// its valid entries and the next open can recover the entry count from the
/// file size.
///
/// The index is not synchronized internally: writers are serialized by the
/// `&mut self` receiver, which the owning segment holds exclusively.
#[derive(Debug)]
pub(crate) struct Index {
    file: File,
    path: String,
    mmap: MmapMut,

    /// Logical size in bytes; the next entry is written here.
    size: u64,
}

impl Index {
    /// Opens (creating if absent) the index file at `path`, extends it to
    /// `max_index_bytes` and memory-maps it.
    pub(crate) fn open(
        path: &str,
        max_index_bytes: u64,
    ) -> Result<Self, LogError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)?;

        // Clamp so the logical size never exceeds the mapped length, even
        // if the file was left over-long by a run with a larger limit.
        let size = file.metadata()?.len().min(max_index_bytes);

        file.set_len(max_index_bytes)?;

        // SAFETY: the map is dropped before the file is truncated in
        // `close`, and the log directory is owned by a single log instance,
        // so the file is not resized elsewhere while mapped.
        let mmap = unsafe { MmapMut::map_mut(&file)? };

        Ok(Self {
            file,
            path: path.to_string(),
            mmap,
            size,
        })
    }

    /// Returns the `(relative_offset, position)` entry at `slot`.
    ///
    /// A `slot` of `-1` means the last entry. Fails with [`EndOfIndex`]
    /// when the index is empty or `slot` is past the last entry.
    pub(crate) fn read(&self, slot: i64) -> Result<(u32, u64), LogError> {
        if self.size < ENT_WIDTH {
            return Err(EndOfIndex.into());
        }

        let slot = if slot == -1 {
            self.size / ENT_WIDTH - 1
        } else if slot < 0 {
            return Err(EndOfIndex.into());
        } else {
            slot as u64
        };

        let start = match slot.checked_mul(ENT_WIDTH) {
            Some(start) if start <= self.size - ENT_WIDTH => start as usize,
            _ => return Err(EndOfIndex.into()),
        };

        let off = BigEndian::read_u32(&self.mmap[start..start + OFF_WIDTH]);
        let pos = BigEndian::read_u64(
            &self.mmap[start + OFF_WIDTH..start + OFF_WIDTH + POS_WIDTH],
        );

        Ok((off, pos))
    }

    /// Appends an entry at the current logical size.
    ///
    /// Fails with [`EndOfIndex`] when the mapped area has no room for
    /// another entry.
    pub(crate) fn write(
        &mut self,
        off: u32,
        pos: u64,
    ) -> Result<(), LogError> {
        if self.is_maxed() {
            return Err(EndOfIndex.into());
        }

        let start = self.size as usize;
        BigEndian::write_u32(&mut self.mmap[start..start + OFF_WIDTH], off);
        BigEndian::write_u64(
            &mut self.mmap[start + OFF_WIDTH..start + OFF_WIDTH + POS_WIDTH],
            pos,
        );

        self.size += ENT_WIDTH;

        Ok(())
    }

    /// True when the mapped area cannot accept another entry.
    pub(crate) fn is_maxed(&self) -> bool {
        (self.mmap.len() as u64) < self.size + ENT_WIDTH
    }

    /// Logical size in bytes; entry count times the entry width.
    pub(crate) fn size(&self) -> u64 {
        self.size
    }

    /// The index file path.
    pub(crate) fn name(&self) -> &str {
        &self.path
    }

    /// Syncs the map and the file, then truncates the file to the logical
    /// size so only valid entries remain on disk.
    pub(crate) fn close(self) -> Result<(), LogError> {
        let Self {
            file, mmap, size, ..
        } = self;

        mmap.flush()?;
        file.sync_all()?;

        // The map must be gone before the truncate; accessing a shared
        // mapping past the end of the file faults.
        drop(mmap);

        file.set_len(size)?;
        file.sync_all()?;

        Ok(())
    }
}

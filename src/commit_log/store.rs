use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::BufWriter;
use std::io::Write;
use std::os::unix::fs::FileExt;
use std::sync::Mutex;

use byteorder::BigEndian;
use byteorder::WriteBytesExt;

/// Number of bytes in the length prefix of a store frame.
pub(crate) const LEN_WIDTH: u64 = 8;

/// The record payload file of a segment.
///
/// A store is a sequence of length-prefixed frames: an 8-byte big-endian
/// length followed by that many payload bytes. Appends go through a write
/// buffer; positional reads flush the buffer first, because buffered bytes
/// are invisible to reads on the backing file.
///
/// A single mutex serializes every operation; the store is the critical
/// section boundary between an in-flight append and concurrent readers.
#[derive(Debug)]
pub(crate) struct Store {
    inner: Mutex<StoreInner>,
}

#[derive(Debug)]
struct StoreInner {
    /// Handle for positional reads; shares the file description with the
    /// buffered writer below, so flushed bytes are immediately readable.
    f: File,

    buf: BufWriter<File>,

    /// Logical size: bytes on disk plus bytes still in the write buffer.
    size: u64,
}

impl Store {
    /// Opens (creating if absent) the store file at `path` in append mode
    /// and picks up its current size, so a store reopened over existing
    /// data continues where it left off.
    pub(crate) fn open(path: &str) -> Result<Self, io::Error> {
        let f = OpenOptions::new()
            .read(true)
            .create(true)
            .append(true)
            .open(path)?;

        let size = f.metadata()?.len();
        let buf = BufWriter::new(f.try_clone()?);

        Ok(Self {
            inner: Mutex::new(StoreInner { f, buf, size }),
        })
    }

    /// Appends one length-prefixed frame.
    ///
    /// Returns the number of bytes the frame occupies and the position at
    /// which it begins, which the segment records in its index.
    pub(crate) fn append(&self, p: &[u8]) -> Result<(u64, u64), io::Error> {
        let mut inner = self.inner.lock().unwrap();

        let pos = inner.size;
        inner.buf.write_u64::<BigEndian>(p.len() as u64)?;
        inner.buf.write_all(p)?;

        let n = LEN_WIDTH + p.len() as u64;
        inner.size += n;

        Ok((n, pos))
    }

    /// Reads back the payload of the frame that begins at `pos`.
    pub(crate) fn read(&self, pos: u64) -> Result<Vec<u8>, io::Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.buf.flush()?;

        let mut len_buf = [0u8; LEN_WIDTH as usize];
        inner.f.read_exact_at(&mut len_buf, pos)?;
        let len = u64::from_be_bytes(len_buf);

        let mut p = vec![0u8; len as usize];
        inner.f.read_exact_at(&mut p, pos + LEN_WIDTH)?;

        Ok(p)
    }

    /// Positional read of raw store bytes, after flushing the write buffer.
    pub(crate) fn read_at(
        &self,
        buf: &mut [u8],
        offset: u64,
    ) -> Result<(), io::Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.buf.flush()?;
        inner.f.read_exact_at(buf, offset)
    }

    /// Logical size in bytes, counting buffered-but-unflushed appends.
    pub(crate) fn size(&self) -> u64 {
        self.inner.lock().unwrap().size
    }

    /// Flushes the write buffer and syncs the file to stable storage.
    pub(crate) fn close(self) -> Result<(), io::Error> {
        let mut inner = self.inner.into_inner().unwrap();
        inner.buf.flush()?;
        inner.f.sync_all()?;
        Ok(())
    }
}

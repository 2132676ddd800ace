use std::io;

use byteorder::BigEndian;
use byteorder::ReadBytesExt;

use crate::commit_log::store::LEN_WIDTH;

/// Iterates the length-prefixed frames of a store file in position order,
/// yielding `(position, payload)` for each complete frame.
///
/// A frame whose payload extends past `total_size` is reported as an
/// `UnexpectedEof` error and ends the iteration. Such a dangling frame is
/// left by an append that failed before the matching index entry was
/// written; it is invisible to offset lookups.
pub(crate) struct FrameIterator<R> {
    r: R,
    pos: u64,
    total_size: u64,
    error: bool,
}

impl<R> FrameIterator<R>
where R: io::Read
{
    pub(crate) fn new(r: R, total_size: u64) -> Self {
        Self {
            r,
            pos: 0,
            total_size,
            error: false,
        }
    }
}

impl<R> Iterator for FrameIterator<R>
where R: io::Read
{
    type Item = Result<(u64, Vec<u8>), io::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.error || self.pos >= self.total_size {
            return None;
        }

        let start = self.pos;

        let res: Result<Vec<u8>, io::Error> = (|| {
            let len = self.r.read_u64::<BigEndian>()?;
            let mut p = vec![0u8; len as usize];
            self.r.read_exact(&mut p)?;
            Ok(p)
        })();

        match res {
            Ok(p) => {
                self.pos = start + LEN_WIDTH + p.len() as u64;
                Some(Ok((start, p)))
            }
            Err(e) => {
                self.error = true;
                Some(Err(e))
            }
        }
    }
}

use std::io;
use std::io::Read;
use std::io::Write;

use byteorder::BigEndian;
use byteorder::ReadBytesExt;
use byteorder::WriteBytesExt;
use codeq::config::Crc32fast;
use codeq::ChecksumReader;
use codeq::ChecksumWriter;

use crate::api::log_record::LogRecord;

/// A log record: opaque payload bytes plus the offset the log assigned to
/// it.
///
/// The offset a caller puts here is ignored; the active segment stamps the
/// real one before serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    pub value: Vec<u8>,
    pub offset: u64,
}

impl Record {
    pub fn new(value: impl Into<Vec<u8>>) -> Self {
        Self {
            value: value.into(),
            offset: 0,
        }
    }
}

impl codeq::Encode for Record {
    fn encode<W: io::Write>(&self, mut w: W) -> Result<usize, io::Error> {
        let mut n = 0;
        let mut cw = ChecksumWriter::<Crc32fast, _>::new(&mut w);

        cw.write_u64::<BigEndian>(self.offset)?;
        n += 8;

        cw.write_u32::<BigEndian>(self.value.len() as u32)?;
        n += 4;

        cw.write_all(&self.value)?;
        n += self.value.len();

        // checksum
        n += cw.write_checksum()?;

        Ok(n)
    }
}

impl codeq::Decode for Record {
    fn decode<R: io::Read>(r: R) -> Result<Self, io::Error> {
        let mut cr = ChecksumReader::<Crc32fast, _>::new(r);

        let offset = cr.read_u64::<BigEndian>()?;
        let len = cr.read_u32::<BigEndian>()? as usize;

        let mut value = vec![0u8; len];
        cr.read_exact(&mut value)?;

        cr.verify_checksum(|| "Record::decode()")?;

        Ok(Self { value, offset })
    }
}

impl LogRecord for Record {
    fn offset(&self) -> u64 {
        self.offset
    }

    fn set_offset(&mut self, offset: u64) {
        self.offset = offset;
    }
}

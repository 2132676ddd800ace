//! Tests for the offset-keyed append/read contract of the log.

use pretty_assertions::assert_eq;

use crate::api::commit_log::CommitLog;
use crate::errors::LogError;
use crate::record::Record;
use crate::testing::index_bytes_for;
use crate::testing::rec;
use crate::tests::context::TestContext;

#[test]
fn test_append_read() -> Result<(), LogError> {
    let mut ctx = TestContext::new()?;
    let config = &mut ctx.config;

    config.max_store_bytes = Some(1024);
    config.max_index_bytes = Some(1024);

    let mut log = ctx.new_log()?;

    for (i, payload) in ["hello", "world", "!"].iter().enumerate() {
        let offset = log.append(rec(payload))?;
        assert_eq!(offset, i as u64);
    }

    let record = log.read(1)?;
    assert_eq!(record.value, b"world");
    assert_eq!(record.offset, 1);

    assert_eq!(log.lowest_offset(), 0);
    assert_eq!(log.highest_offset(), 2);

    Ok(())
}

#[test]
fn test_offsets_are_dense() -> Result<(), LogError> {
    let ctx = TestContext::new()?;
    let mut log = ctx.new_log()?;

    for i in 0..100u64 {
        let offset = log.append(rec(format!("payload_{}", i)))?;
        assert_eq!(offset, i);
    }

    for i in 0..100u64 {
        let record = log.read(i)?;
        assert_eq!(record.offset, i);
        assert_eq!(record.value, format!("payload_{}", i).into_bytes());
    }

    Ok(())
}

#[test]
fn test_read_out_of_range() -> Result<(), LogError> {
    let ctx = TestContext::new()?;
    let mut log = ctx.new_log()?;

    // a fresh log covers nothing
    let err = log.read(0).unwrap_err();
    assert!(matches!(
        err,
        LogError::OffsetOutOfRange(e) if e.offset == 0
    ));

    log.append(rec("x"))?;
    log.read(0)?;

    // one past the highest offset is out of range, not end-of-index: the
    // streaming consumer waits on it instead of aborting
    let err = log.read(1).unwrap_err();
    assert!(matches!(
        err,
        LogError::OffsetOutOfRange(e) if e.offset == 1
    ));

    Ok(())
}

#[test]
fn test_segment_roll_on_capacity() -> Result<(), LogError> {
    let mut ctx = TestContext::new()?;
    let config = &mut ctx.config;

    config.max_store_bytes = Some(1024);
    // room for exactly 3 entries per segment
    config.max_index_bytes = Some(index_bytes_for(3));

    let mut log = ctx.new_log()?;

    // the third append still lands in segment 0; the fourth rolls
    for i in 0..4u64 {
        let offset = log.append(rec(format!("payload_{}", i)))?;
        assert_eq!(offset, i);
    }

    let stat = log.stat();
    assert_eq!(stat.segments.len(), 2);
    assert_eq!(stat.segments[0].base_offset, 0);
    assert_eq!(stat.segments[0].next_offset, 3);
    assert_eq!(stat.segments[1].base_offset, 3);
    assert_eq!(stat.segments[1].next_offset, 4);

    // reads cross the segment boundary transparently
    for i in 0..4u64 {
        let record = log.read(i)?;
        assert_eq!(record.offset, i);
        assert_eq!(record.value, format!("payload_{}", i).into_bytes());
    }

    Ok(())
}

#[test]
fn test_initial_offset() -> Result<(), LogError> {
    let mut ctx = TestContext::new()?;
    ctx.config.initial_offset = Some(10);

    let mut log = ctx.new_log()?;

    assert_eq!(log.append(rec("x"))?, 10);
    assert_eq!(log.append(rec("y"))?, 11);

    assert_eq!(log.lowest_offset(), 10);
    assert_eq!(log.highest_offset(), 11);

    let err = log.read(9).unwrap_err();
    assert!(matches!(err, LogError::OffsetOutOfRange(_)));

    Ok(())
}

/// An in-memory stand-in for the log, as a consumer's test double would
/// implement it.
#[derive(Debug, Default)]
struct InMemoryLog {
    records: Vec<Record>,
}

impl CommitLog<Record> for InMemoryLog {
    fn append(&mut self, mut record: Record) -> Result<u64, LogError> {
        let offset = self.records.len() as u64;
        record.offset = offset;
        self.records.push(record);
        Ok(offset)
    }

    fn read(&self, offset: u64) -> Result<Record, LogError> {
        self.records
            .get(offset as usize)
            .cloned()
            .ok_or_else(|| {
                crate::errors::OffsetOutOfRange::new(offset).into()
            })
    }
}

/// Drives any CommitLog implementation through the same scenario.
fn produce_consume<L: CommitLog<Record>>(log: &mut L) -> Result<(), LogError> {
    assert_eq!(log.append(rec("hello"))?, 0);
    assert_eq!(log.append(rec("world"))?, 1);

    assert_eq!(log.read(1)?.value, b"world");

    let err = log.read(2).unwrap_err();
    assert!(matches!(err, LogError::OffsetOutOfRange(_)));

    Ok(())
}

#[test]
fn test_commit_log_contract() -> Result<(), LogError> {
    let ctx = TestContext::new()?;
    let mut log = ctx.new_log()?;
    produce_consume(&mut log)?;

    let mut fake = InMemoryLog::default();
    produce_consume(&mut fake)?;

    Ok(())
}

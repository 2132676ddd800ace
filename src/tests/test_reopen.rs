//! Tests for reopening a log under various conditions.
//!
//! These tests verify that a log recovers its state from the segment files
//! alone: next offset from the close-truncated index sizes, segment order
//! from the file names, and that appends resume where they left off.

use std::fs;

use pretty_assertions::assert_eq;

use crate::errors::LogError;
use crate::testing::index_bytes_for;
use crate::testing::rec;
use crate::tests::context::TestContext;

#[test]
fn test_re_open() -> Result<(), LogError> {
    let ctx = TestContext::new()?;

    {
        let mut log = ctx.new_log()?;
        assert_eq!(log.append(rec("x"))?, 0);
        log.close()?;
    }

    // Re-open
    {
        let mut log = ctx.new_log()?;

        assert_eq!(log.append(rec("y"))?, 1);

        assert_eq!(log.read(0)?.value, b"x");
        assert_eq!(log.read(1)?.value, b"y");

        assert_eq!(log.lowest_offset(), 0);
        assert_eq!(log.highest_offset(), 1);
    }

    Ok(())
}

#[test]
fn test_re_open_multi_segment() -> Result<(), LogError> {
    let mut ctx = TestContext::new()?;
    ctx.config.max_index_bytes = Some(index_bytes_for(3));

    let records = {
        let mut log = ctx.new_log()?;

        for i in 0..8u64 {
            log.append(rec(format!("payload_{}", i)))?;
        }

        let records = (0..8u64)
            .map(|i| log.read(i))
            .collect::<Result<Vec<_>, _>>()?;

        log.close()?;
        records
    };

    // Re-open
    {
        let mut log = ctx.new_log()?;

        let reread = (0..8u64)
            .map(|i| log.read(i))
            .collect::<Result<Vec<_>, _>>()?;
        assert_eq!(records, reread);

        let stat = log.stat();
        assert_eq!(stat.segments.len(), 3);
        assert_eq!(stat.segments[2].base_offset, 6);
        assert_eq!(stat.segments[2].next_offset, 8);

        // appends resume at the previous next offset
        assert_eq!(log.append(rec("payload_8"))?, 8);
    }

    Ok(())
}

#[test]
fn test_re_open_empty_log() -> Result<(), LogError> {
    let ctx = TestContext::new()?;

    {
        let log = ctx.new_log()?;
        log.close()?;
    }

    {
        let mut log = ctx.new_log()?;
        assert_eq!(log.append(rec("x"))?, 0);
    }

    Ok(())
}

/// A missing segment pair between two surviving ones is refused at open
/// rather than silently served with a hole in the offset space.
#[test]
fn test_re_open_gap_between_segments() -> Result<(), LogError> {
    let mut ctx = TestContext::new()?;
    // one entry per segment
    ctx.config.max_index_bytes = Some(index_bytes_for(1));

    {
        let mut log = ctx.new_log()?;
        for payload in ["a", "b", "c"] {
            log.append(rec(payload))?;
        }
        log.close()?;
    }

    fs::remove_file(ctx.config.store_path(1))?;
    fs::remove_file(ctx.config.index_path(1))?;

    let err = ctx.new_log().unwrap_err();
    assert_eq!(
        "Gap between segments: 00_000_000_000_000_000_001 -> \
        00_000_000_000_000_000_002; Can not open, \
        fix this error and re-open",
        err.to_string()
    );

    Ok(())
}

/// Files the directory scan cannot parse are skipped, not fatal.
#[test]
fn test_re_open_ignores_unrecognized_files() -> Result<(), LogError> {
    let ctx = TestContext::new()?;

    {
        let mut log = ctx.new_log()?;
        log.append(rec("x"))?;
        log.close()?;
    }

    fs::write(format!("{}/README", ctx.config.dir), b"not a segment")?;

    let log = ctx.new_log()?;
    assert_eq!(log.read(0)?.value, b"x");
    assert_eq!(log.stat().segments.len(), 1);

    Ok(())
}

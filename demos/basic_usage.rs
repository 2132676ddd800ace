//! This example demonstrates basic usage of the commit log, including:
//! - Opening a log over a directory
//! - Appending records and receiving their offsets
//! - Reading records back by offset
//! - Closing and reopening with the state intact

use std::io;
use std::sync::Arc;

use commit_log::Config;
use commit_log::Log;
use commit_log::Record;

fn main() -> Result<(), io::Error> {
    // Create a temporary directory for the log data
    let temp_dir = tempfile::tempdir()?;
    let config = Arc::new(Config {
        dir: temp_dir.path().to_str().unwrap().to_string(),
        ..Default::default()
    });

    // Open a log instance; the directory is empty, so the first segment
    // starts at the initial offset (0 by default).
    let mut log = Log::<Record>::open(config.clone())?;

    // Append a few records. The log assigns each one the next offset.
    for payload in ["first record", "second record", "third record"] {
        let offset = log.append(Record::new(payload))?;
        println!("appended {:?} at offset {}", payload, offset);
    }

    // Read one back by offset.
    let record = log.read(1)?;
    println!(
        "read offset {}: {}",
        record.offset,
        String::from_utf8_lossy(&record.value)
    );

    println!(
        "log covers offsets [{}, {}]",
        log.lowest_offset(),
        log.highest_offset()
    );

    // Close flushes buffers and tight-packs the index files.
    log.close()?;

    // Reopen: the next append resumes after the previous highest offset.
    let mut log = Log::<Record>::open(config)?;
    let offset = log.append(Record::new("fourth record"))?;
    println!("after reopen, appended at offset {}", offset);

    log.close()?;

    Ok(())
}

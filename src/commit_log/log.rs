use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::sync::Arc;

use log::info;
use log::warn;

use crate::api::commit_log::CommitLog;
use crate::api::log_record::LogRecord;
use crate::commit_log::segment::Segment;
use crate::commit_log::stat::Stat;
use crate::config::Config;
use crate::errors::LogError;
use crate::errors::OffsetOutOfRange;
use crate::num::format_pad_u64;

/// The multi-segment commit log: a directory of segments sorted by base
/// offset. Exactly one segment, the last, is active and takes all writes.
///
/// Offsets are dense and monotonically increasing; segments are contiguous,
/// each base offset equal to its predecessor's next offset. Reads are
/// routed to the segment covering the requested offset. When the active
/// segment reaches either of its configured capacities, the next append
/// rolls a new segment at the log's next offset.
///
/// The directory is owned exclusively by one log instance; running two
/// instances over the same directory is undefined.
#[derive(Debug)]
pub struct Log<R> {
    config: Arc<Config>,

    /// Sorted by base offset. Never empty; the last segment is active.
    segments: Vec<Segment<R>>,
}

impl<R> Log<R>
where R: LogRecord
{
    /// Opens the log in `config.dir`, rebuilding one segment per
    /// `<base_offset>.store`/`<base_offset>.index` pair found there.
    ///
    /// The highest-base-offset segment becomes active. An empty directory
    /// gets a fresh segment at the configured initial offset. Because a
    /// cleanly closed index is truncated to its valid entries, each
    /// segment's next offset is recovered from file sizes alone.
    pub fn open(config: Arc<Config>) -> Result<Self, LogError> {
        fs::create_dir_all(&config.dir)?;

        let base_offsets = load_base_offsets(&config)?;

        let mut segments = Vec::with_capacity(base_offsets.len().max(1));
        let mut prev_next_offset = None;

        for base_offset in base_offsets {
            if let Some(prev_next) = prev_next_offset {
                if prev_next != base_offset {
                    let message = format!(
                        "Gap between segments: {} -> {}; Can not open, \
                        fix this error and re-open",
                        format_pad_u64(prev_next),
                        format_pad_u64(base_offset),
                    );
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        message,
                    )
                    .into());
                }
            }

            let segment = Segment::open(config.clone(), base_offset)?;
            prev_next_offset = Some(segment.next_offset());
            segments.push(segment);
        }

        if segments.is_empty() {
            segments
                .push(Segment::open(config.clone(), config.initial_offset())?);
        }

        info!(
            "commit log opened: dir: '{}', segments: {}, offsets: [{}, {})",
            config.dir,
            segments.len(),
            segments.first().map(|s| s.base_offset()).unwrap_or_default(),
            segments.last().map(|s| s.next_offset()).unwrap_or_default(),
        );

        Ok(Self { config, segments })
    }

    /// Appends the record to the active segment, first rolling to a new
    /// segment when the active one is at capacity.
    ///
    /// Returns the offset the record was assigned.
    pub fn append(&mut self, record: R) -> Result<u64, LogError> {
        if self.active().is_maxed() {
            self.roll()?;
        }

        self.active_mut().append(record)
    }

    /// Reads the record stored at `offset` from the segment covering it.
    ///
    /// Fails with [`OffsetOutOfRange`] when no segment covers `offset`.
    pub fn read(&self, offset: u64) -> Result<R, LogError> {
        let i = self
            .segments
            .partition_point(|s| s.base_offset() <= offset);

        match i.checked_sub(1).map(|i| &self.segments[i]) {
            Some(s) if offset < s.next_offset() => s.read(offset),
            _ => Err(OffsetOutOfRange::new(offset).into()),
        }
    }

    /// First offset still present in the log.
    pub fn lowest_offset(&self) -> u64 {
        self.segments
            .first()
            .map(|s| s.base_offset())
            .unwrap_or_default()
    }

    /// Offset of the most recently appended record, or 0 when the log is
    /// empty.
    pub fn highest_offset(&self) -> u64 {
        self.segments
            .last()
            .map(|s| s.next_offset())
            .unwrap_or_default()
            .saturating_sub(1)
    }

    /// Removes every segment whose records all have offsets at or below
    /// `lowest`, reclaiming the disk they occupy.
    ///
    /// The active segment is never removed, so the log always keeps
    /// exactly one segment accepting writes.
    pub fn truncate(&mut self, lowest: u64) -> Result<(), LogError> {
        while self.segments.len() > 1 {
            let first = &self.segments[0];
            if first.next_offset().saturating_sub(1) > lowest {
                break;
            }

            let segment = self.segments.remove(0);
            info!(
                "removing segment below offset {}: base offset: {}",
                lowest,
                format_pad_u64(segment.base_offset()),
            );
            segment.remove()?;
        }

        Ok(())
    }

    /// Closes every segment, flushing write buffers and truncating indexes
    /// so the on-disk state is tight-packed for the next open.
    pub fn close(mut self) -> Result<(), LogError> {
        for segment in self.segments.drain(..) {
            segment.close()?;
        }
        Ok(())
    }

    /// Closes the log and deletes its directory.
    pub fn remove(self) -> Result<(), LogError> {
        let dir = self.config.dir.clone();
        self.close()?;
        fs::remove_dir_all(dir)?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        self.config.as_ref()
    }

    /// Point-in-time statistics for every segment.
    pub fn stat(&self) -> Stat {
        Stat {
            segments: self.segments.iter().map(|s| s.stat()).collect(),
        }
    }

    fn roll(&mut self) -> Result<(), LogError> {
        let base_offset = self.active().next_offset();

        info!(
            "rolling to new segment: base offset: {}",
            format_pad_u64(base_offset)
        );

        let segment = Segment::open(self.config.clone(), base_offset)?;
        self.segments.push(segment);

        Ok(())
    }

    fn active(&self) -> &Segment<R> {
        self.segments.last().expect("segments is never empty")
    }

    fn active_mut(&mut self) -> &mut Segment<R> {
        self.segments.last_mut().expect("segments is never empty")
    }
}

impl<R> CommitLog<R> for Log<R>
where R: LogRecord
{
    fn append(&mut self, record: R) -> Result<u64, LogError> {
        Log::append(self, record)
    }

    fn read(&self, offset: u64) -> Result<R, LogError> {
        Log::read(self, offset)
    }
}

/// Scans the log directory and returns the base offsets of the segment
/// pairs found there, ascending.
///
/// The store and the index of one segment parse to the same base offset;
/// the set folds the pair. Files that are not segment files are skipped
/// with a warning.
pub(crate) fn load_base_offsets(
    config: &Config,
) -> Result<Vec<u64>, LogError> {
    let mut base_offsets = BTreeSet::new();

    for entry in fs::read_dir(&config.dir)? {
        let entry = entry?;
        let file_name = entry.file_name();
        let fn_str = file_name.to_string_lossy();

        match Config::parse_segment_file_name(&fn_str) {
            Ok(base_offset) => {
                base_offsets.insert(base_offset);
            }
            Err(err) => {
                warn!(
                    "Ignore unrecognized file in log dir: '{}': {}",
                    fn_str, err
                );
            }
        }
    }

    Ok(base_offsets.into_iter().collect())
}

use std::format;

use crate::errors::InvalidSegmentFileName;

/// Configuration for a commit log.
///
/// This struct holds the log directory and the capacity limits that decide
/// when the active segment rolls.
///
/// Optional parameters are `Option<T>` in this struct, and default values
/// are evaluated when a getter method is called.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Base directory holding the segment files
    pub dir: String,

    /// Maximum size of a segment's store file in bytes
    pub max_store_bytes: Option<u64>,

    /// Maximum size of a segment's index file in bytes
    pub max_index_bytes: Option<u64>,

    /// Base offset of the first segment when the log directory is empty
    pub initial_offset: Option<u64>,
}

impl Config {
    /// Creates a new Config with the specified directory and default values
    /// for other fields
    pub fn new(dir: impl ToString) -> Self {
        Self {
            dir: dir.to_string(),
            ..Default::default()
        }
    }

    /// Returns the maximum store size in bytes (defaults to 1 GiB)
    pub fn max_store_bytes(&self) -> u64 {
        self.max_store_bytes.unwrap_or(1024 * 1024 * 1024)
    }

    /// Returns the maximum index size in bytes (defaults to 12 MiB, room
    /// for one million entries)
    pub fn max_index_bytes(&self) -> u64 {
        self.max_index_bytes.unwrap_or(12 * 1024 * 1024)
    }

    /// Returns the base offset the first segment receives when the log is
    /// created over an empty directory (defaults to 0)
    pub fn initial_offset(&self) -> u64 {
        self.initial_offset.unwrap_or(0)
    }

    /// Returns the full path of the store file for a given base offset
    pub fn store_path(&self, base_offset: u64) -> String {
        format!("{}/{}", self.dir, Self::store_file_name(base_offset))
    }

    /// Returns the full path of the index file for a given base offset
    pub fn index_path(&self, base_offset: u64) -> String {
        format!("{}/{}", self.dir, Self::index_file_name(base_offset))
    }

    /// The file name format is "{base_offset}.store", base offset in plain
    /// decimal
    pub(crate) fn store_file_name(base_offset: u64) -> String {
        format!("{}.store", base_offset)
    }

    /// The file name format is "{base_offset}.index", base offset in plain
    /// decimal
    pub(crate) fn index_file_name(base_offset: u64) -> String {
        format!("{}.index", base_offset)
    }

    /// Parses a segment file name and returns the base offset.
    ///
    /// Both halves of a segment pair parse to the same base offset:
    /// "{base_offset}.store" and "{base_offset}.index".
    ///
    /// # Returns
    /// * `Ok(u64)` - The base offset if parsing succeeds
    /// * `Err(InvalidSegmentFileName)` - If the file name format is invalid
    pub(crate) fn parse_segment_file_name(
        file_name: &str,
    ) -> Result<u64, InvalidSegmentFileName> {
        // 1. Strip the ".store" or ".index" suffix or return an error
        let digits = if let Some(d) = file_name.strip_suffix(".store") {
            d
        } else if let Some(d) = file_name.strip_suffix(".index") {
            d
        } else {
            return Err(InvalidSegmentFileName::new(
                file_name,
                "has neither '.store' nor '.index' suffix",
            ));
        };

        // 2. Parse the remaining string as an u64
        digits.parse::<u64>().map_err(|e| {
            InvalidSegmentFileName::new(
                file_name,
                format!("cannot parse base offset as u64: {}", e),
            )
        })
    }
}

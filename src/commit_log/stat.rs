use std::fmt;
use std::fmt::Formatter;

use crate::num::format_pad9_u64;
use crate::num::format_pad_u64;

/// Point-in-time statistics for every segment in a log, first to last.
#[derive(Debug, Clone)]
pub struct Stat {
    pub segments: Vec<SegmentStat>,
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let lb = if f.alternate() { "\n" } else { "" };
        let idt = if f.alternate() { "  " } else { "" };
        write!(
            f,
            "Stat{{{lb} segments: [{lb}{idt}{}{lb} ]{lb}}}",
            self.segments
                .iter()
                .map(|s| format!("{}", s))
                .collect::<Vec<String>>()
                .join(&format!(",{lb}{idt}")),
        )
    }
}

/// Statistics about a single segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentStat {
    /// First absolute offset that may live in this segment
    pub base_offset: u64,
    /// Absolute offset the next append to this segment would receive
    pub next_offset: u64,
    /// Logical size of the store file in bytes
    pub store_size: u64,
    /// Number of entries in the index
    pub index_entries: u64,
}

impl fmt::Display for SegmentStat {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SegmentStat({}){{offsets: [{}, {}), store size: {}, entries: {}}}",
            format_pad_u64(self.base_offset),
            format_pad9_u64(self.base_offset),
            format_pad9_u64(self.next_offset),
            format_pad9_u64(self.store_size),
            self.index_entries,
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::commit_log::stat::SegmentStat;
    use crate::commit_log::stat::Stat;

    #[test]
    fn test_segment_stat_display() {
        let stat = SegmentStat {
            base_offset: 3,
            next_offset: 6,
            store_size: 99,
            index_entries: 3,
        };

        assert_eq!(
            stat.to_string(),
            "SegmentStat(00_000_000_000_000_000_003)\
            {offsets: [000_000_003, 000_000_006), \
            store size: 000_000_099, entries: 3}"
        );
    }

    #[test]
    fn test_stat_display_compact_and_alternate() {
        let stat = Stat {
            segments: vec![
                SegmentStat {
                    base_offset: 0,
                    next_offset: 3,
                    store_size: 99,
                    index_entries: 3,
                },
                SegmentStat {
                    base_offset: 3,
                    next_offset: 4,
                    store_size: 33,
                    index_entries: 1,
                },
            ],
        };

        let compact = format!("{}", stat);
        assert!(compact.starts_with("Stat{ segments: ["));
        assert!(!compact.contains('\n'));

        let alternate = format!("{:#}", stat);
        // Stat{ / segments: [ / one line per segment / ] / }
        assert_eq!(alternate.lines().count(), 6);
    }
}

use std::fmt;
use std::fmt::Formatter;

use crate::num::format_pad9_u64;

/// Statistics about a sequential log store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
    /// Number of stored entries
    pub entries_count: u64,
    /// Index the next appended entry will be stored at
    pub first_available_index: u64,
    /// Size of the data file in bytes
    pub data_size: u64,
    /// Size of the index file in bytes
    pub index_size: u64,
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let lb = if f.alternate() { "\n" } else { "" };
        let idt = if f.alternate() { "  " } else { " " };
        write!(
            f,
            "Stat{{{lb}{idt}entries: {},{lb}{idt}first_available: {},{lb}{idt}\
            data_size: {},{lb}{idt}index_size: {}{lb}}}",
            format_pad9_u64(self.entries_count),
            format_pad9_u64(self.first_available_index),
            format_pad9_u64(self.data_size),
            format_pad9_u64(self.index_size),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Stat;

    #[test]
    fn test_stat_display() {
        let stat = Stat {
            entries_count: 3,
            first_available_index: 4,
            data_size: 45,
            index_size: 48,
        };

        assert_eq!(
            "Stat{ entries: 000_000_003, first_available: 000_000_004, \
            data_size: 000_000_045, index_size: 000_000_048}",
            format!("{}", stat)
        );

        assert_eq!(
            "Stat{
  entries: 000_000_003,
  first_available: 000_000_004,
  data_size: 000_000_045,
  index_size: 000_000_048
}",
            format!("{:#}", stat)
        );
    }
}

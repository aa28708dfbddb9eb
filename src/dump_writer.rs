use std::io;

use crate::index_table::index_record::IndexRecord;
use crate::LogEntry;

/// Write one index record and the entry it points to on a single line.
///
/// `position` is the 1-based log index of the record.
pub fn multiline_string<W: io::Write>(
    w: &mut W,
    position: u64,
    res: Result<(IndexRecord, LogEntry), io::Error>,
) -> Result<(), io::Error> {
    match res {
        Ok((rec, entry)) => {
            writeln!(w, "  I-{position:05}: {}: {}", rec, entry)?;
        }
        Err(io_err) => {
            writeln!(w, "  I-{position:05}: Error: {}", io_err)?;
        }
    }
    Ok(())
}

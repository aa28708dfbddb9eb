use std::fmt;
use std::io;

use byteorder::BigEndian;
use byteorder::ReadBytesExt;
use byteorder::WriteBytesExt;
use codeq::ChecksumReader;
use codeq::ChecksumWriter;

use crate::num::format_pad9_u64;
use crate::LogEntry;

/// Where the encoded entry at one log position lives in the data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexRecord {
    /// Byte offset in the data file.
    pub offset: u64,
    /// Size in bytes of the encoded entry.
    pub size: u64,
}

impl IndexRecord {
    /// Encoded size: offset(8), size(8), checksum(8).
    pub const SIZE: u64 = 24;

    pub fn new(offset: u64, size: u64) -> Self {
        Self { offset, size }
    }

    /// Returns the data file offset right after this entry.
    pub fn end(&self) -> u64 {
        self.offset + self.size
    }

    /// Check this record against the end of the previous one and the current
    /// data file size.
    pub(crate) fn check(
        &self,
        prev_end: u64,
        data_size: u64,
    ) -> Result<(), RecordFault> {
        if self.offset != prev_end {
            return Err(RecordFault::Damaged(format!(
                "{} does not start at the end of previous record {}",
                self, prev_end
            )));
        }

        if self.size < LogEntry::HEADER_SIZE as u64 {
            return Err(RecordFault::Damaged(format!(
                "{} is smaller than a log entry header",
                self
            )));
        }

        match self.offset.checked_add(self.size) {
            Some(end) if end <= data_size => Ok(()),
            _ => Err(RecordFault::OutrunsData(format!(
                "{} outruns data file size {}",
                self, data_size
            ))),
        }
    }
}

/// Why an index record found during recovery can not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RecordFault {
    /// The record was written but its data was not.
    OutrunsData(String),

    /// The record bytes themselves make no sense.
    Damaged(String),
}

impl fmt::Display for IndexRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}) Size({})",
            format_pad9_u64(self.offset),
            format_pad9_u64(self.offset.saturating_add(self.size)),
            self.size
        )
    }
}

/// Encoded as:
/// - 8 bytes: offset
/// - 8 bytes: size
/// - 8 bytes: checksum of the above
impl codeq::Encode for IndexRecord {
    fn encode<W: io::Write>(&self, mut w: W) -> Result<usize, io::Error> {
        let mut cw = ChecksumWriter::new(&mut w);

        cw.write_u64::<BigEndian>(self.offset)?;
        cw.write_u64::<BigEndian>(self.size)?;
        cw.write_checksum()?;

        Ok(Self::SIZE as usize)
    }
}

impl codeq::Decode for IndexRecord {
    fn decode<R: io::Read>(r: R) -> Result<Self, io::Error> {
        let mut cr = ChecksumReader::new(r);

        let offset = cr.read_u64::<BigEndian>()?;
        let size = cr.read_u64::<BigEndian>()?;

        cr.verify_checksum(|| "IndexRecord::decode()")?;

        Ok(Self { offset, size })
    }
}

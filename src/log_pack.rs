//! The wire form of a contiguous range of log entries.
//!
//! A pack is encoded as:
//! - 4 bytes: number of entries
//! - for each entry: 4 bytes encoded entry length, then the encoded entry
//!
//! All integers are big-endian. There is no compression and no checksum.

use std::io;
use std::io::Read;

use byteorder::BigEndian;
use byteorder::ReadBytesExt;
use byteorder::WriteBytesExt;
use codeq::Encode;

use crate::errors::CorruptRecord;
use crate::LogEntry;

/// A decoded pack: the entries of a contiguous log range, in index order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogPack {
    entries: Vec<LogEntry>,
}

impl LogPack {
    pub fn new(entries: Vec<LogEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<LogEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decode a pack that occupies exactly `buf`.
    pub fn decode_exact(buf: &[u8]) -> Result<Self, io::Error> {
        let mut r = buf;
        let pack = <Self as codeq::Decode>::decode(&mut r)?;

        if !r.is_empty() {
            return Err(CorruptRecord::new(format!(
                "{} trailing bytes after log pack of {} entries",
                r.len(),
                pack.len()
            ))
            .into());
        }

        Ok(pack)
    }
}

/// Write a pack directly from already encoded entries.
///
/// Used by the store to pack entries without decoding them.
pub(crate) fn write_encoded<'a, W, I>(
    mut w: W,
    encoded_entries: I,
) -> Result<usize, io::Error>
where
    W: io::Write,
    I: ExactSizeIterator<Item = &'a [u8]>,
{
    let count = to_u32(encoded_entries.len(), "log pack entry count")?;
    w.write_u32::<BigEndian>(count)?;
    let mut n = 4;

    for buf in encoded_entries {
        w.write_u32::<BigEndian>(to_u32(buf.len(), "log pack entry size")?)?;
        w.write_all(buf)?;
        n += 4 + buf.len();
    }

    Ok(n)
}

fn to_u32(n: usize, what: &str) -> Result<u32, io::Error> {
    u32::try_from(n).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} exceeds u32: {}", what, n),
        )
    })
}

impl codeq::Encode for LogPack {
    fn encode<W: io::Write>(&self, w: W) -> Result<usize, io::Error> {
        let mut encoded = Vec::with_capacity(self.entries.len());
        for entry in self.entries.iter() {
            let mut buf = Vec::with_capacity(entry.encoded_size());
            entry.encode(&mut buf)?;
            encoded.push(buf);
        }

        write_encoded(w, encoded.iter().map(|b| b.as_slice()))
    }
}

impl codeq::Decode for LogPack {
    fn decode<R: io::Read>(mut r: R) -> Result<Self, io::Error> {
        let count = r.read_u32::<BigEndian>()?;

        // `count` may come from damaged bytes, do not trust it for allocation.
        let mut entries = Vec::with_capacity(count.min(1024) as usize);

        for i in 0..count {
            let size = r.read_u32::<BigEndian>()? as u64;

            let mut buf = Vec::new();
            let n = (&mut r).take(size).read_to_end(&mut buf)?;
            if n as u64 != size {
                return Err(CorruptRecord::new(format!(
                    "log pack entry {} declares {} bytes but only {} available",
                    i, size, n
                ))
                .into());
            }

            entries.push(LogEntry::decode_exact(&buf)?);
        }

        Ok(Self { entries })
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use codeq::Encode;

    use super::write_encoded;
    use super::LogPack;
    use crate::testing::test_codec_without_corruption;
    use crate::LogEntry;
    use crate::LogValueType;

    #[test]
    fn test_log_pack_codec() -> Result<(), io::Error> {
        let pack = LogPack::new(vec![
            LogEntry::new(5, LogValueType::Application, "a"),
            LogEntry::new(6, LogValueType::LogPack, ""),
        ]);

        let b = vec![
            0, 0, 0, 2, // count
            0, 0, 0, 14, // entry size
            0, 0, 0, 0, 0, 0, 0, 5, // term
            1, // value type
            0, 0, 0, 1,  // value len
            97, // value
            0, 0, 0, 13, // entry size
            0, 0, 0, 0, 0, 0, 0, 6, // term
            4, // value type
            0, 0, 0, 0, // value len
        ];

        test_codec_without_corruption(&b, &pack)
    }

    #[test]
    fn test_empty_log_pack() -> Result<(), io::Error> {
        test_codec_without_corruption(&[0, 0, 0, 0], &LogPack::default())
    }

    #[test]
    fn test_write_encoded() -> Result<(), io::Error> {
        let entries = vec![
            LogEntry::new(1, LogValueType::Configuration, "xy"),
            LogEntry::new(2, LogValueType::ClusterServer, "z"),
        ];

        let mut encoded = vec![];
        for e in entries.iter() {
            let mut b = vec![];
            e.encode(&mut b)?;
            encoded.push(b);
        }

        let mut got = vec![];
        let n = write_encoded(&mut got, encoded.iter().map(|b| b.as_slice()))?;
        assert_eq!(got.len(), n);

        let mut want = vec![];
        LogPack::new(entries).encode(&mut want)?;

        assert_eq!(want, got);

        Ok(())
    }

    #[test]
    fn test_decode_corrupt_pack() {
        // Fewer entries than declared
        let err = LogPack::decode_exact(&[0, 0, 0, 1]).unwrap_err();
        assert_eq!(io::ErrorKind::UnexpectedEof, err.kind());

        // Entry shorter than declared
        let b = vec![
            0, 0, 0, 1, // count
            0, 0, 0, 20, // entry size
            0, 0, 0, 0, 0, 0, 0, 5, // term
            1, // value type
            0, 0, 0, 0, // value len
        ];
        let err = LogPack::decode_exact(&b).unwrap_err();
        assert_eq!(io::ErrorKind::InvalidData, err.kind());

        // Entry size disagrees with the encoded entry
        let b = vec![
            0, 0, 0, 1, // count
            0, 0, 0, 14, // entry size
            0, 0, 0, 0, 0, 0, 0, 5, // term
            1, // value type
            0, 0, 0, 0, // value len
            0, // garbage
        ];
        let err = LogPack::decode_exact(&b).unwrap_err();
        assert_eq!(io::ErrorKind::InvalidData, err.kind());

        // Invalid value type
        let b = vec![
            0, 0, 0, 1, // count
            0, 0, 0, 13, // entry size
            0, 0, 0, 0, 0, 0, 0, 5, // term
            7, // value type
            0, 0, 0, 0, // value len
        ];
        let err = LogPack::decode_exact(&b).unwrap_err();
        assert_eq!(io::ErrorKind::InvalidData, err.kind());

        // Trailing bytes after the last entry
        let err = LogPack::decode_exact(&[0, 0, 0, 0, 1]).unwrap_err();
        assert_eq!(io::ErrorKind::InvalidData, err.kind());
    }
}

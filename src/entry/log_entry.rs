use std::fmt;
use std::io;
use std::io::Read;

use byteorder::BigEndian;
use byteorder::ReadBytesExt;
use byteorder::WriteBytesExt;

use crate::entry::value_type::LogValueType;
use crate::errors::CorruptRecord;

/// A single durable record in the consensus log.
///
/// An empty value and an absent value are the same thing: the constructor
/// normalizes an empty value to `None`, which is also what decoding a zero
/// length value yields. Thus `decode(encode(e)) == e` for every entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogEntry {
    term: i64,
    value_type: LogValueType,
    value: Option<Vec<u8>>,
}

impl LogEntry {
    /// Size of the fixed header: term(8), value type(1), value length(4).
    pub const HEADER_SIZE: usize = 8 + 1 + 4;

    pub fn new(
        term: i64,
        value_type: LogValueType,
        value: impl Into<Vec<u8>>,
    ) -> Self {
        let value = value.into();
        Self {
            term,
            value_type,
            value: if value.is_empty() { None } else { Some(value) },
        }
    }

    /// The sentinel entry returned as the last entry of an empty store.
    ///
    /// Term 0 is reserved: a store refuses to persist an entry of term 0.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn term(&self) -> i64 {
        self.term
    }

    pub fn value_type(&self) -> LogValueType {
        self.value_type
    }

    pub fn value(&self) -> Option<&[u8]> {
        self.value.as_deref()
    }

    /// Whether this is the sentinel empty entry.
    pub fn is_empty(&self) -> bool {
        self.term == 0 && self.value.is_none()
    }

    /// Size of the encoded form in bytes.
    pub fn encoded_size(&self) -> usize {
        Self::HEADER_SIZE + self.value().map(|v| v.len()).unwrap_or_default()
    }

    /// Decode an entry that occupies exactly `buf`.
    ///
    /// Bytes left over after the entry, or a declared value length longer
    /// than `buf`, are reported as a corrupt record.
    pub fn decode_exact(buf: &[u8]) -> Result<Self, io::Error> {
        let mut r = buf;
        let entry = <Self as codeq::Decode>::decode(&mut r)?;

        if !r.is_empty() {
            return Err(CorruptRecord::new(format!(
                "{} trailing bytes after log entry of size {}",
                r.len(),
                entry.encoded_size()
            ))
            .into());
        }

        Ok(entry)
    }
}

/// Encoded as:
/// - 8 bytes: term
/// - 1 byte: value type
/// - 4 bytes: value length
/// - value bytes
impl codeq::Encode for LogEntry {
    fn encode<W: io::Write>(&self, mut w: W) -> Result<usize, io::Error> {
        let value = self.value().unwrap_or_default();

        let len = u32::try_from(value.len()).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("log entry value too large: {} bytes", value.len()),
            )
        })?;

        w.write_i64::<BigEndian>(self.term)?;
        w.write_u8(self.value_type.as_u8())?;
        w.write_u32::<BigEndian>(len)?;
        w.write_all(value)?;

        Ok(Self::HEADER_SIZE + value.len())
    }
}

impl codeq::Decode for LogEntry {
    fn decode<R: io::Read>(mut r: R) -> Result<Self, io::Error> {
        let term = r.read_i64::<BigEndian>()?;
        let value_type = LogValueType::try_from(r.read_u8()?)?;
        let len = r.read_u32::<BigEndian>()? as u64;

        // Do not trust `len` for allocation, it may come from damaged bytes.
        let mut value = Vec::new();
        let n = r.take(len).read_to_end(&mut value)?;

        if n as u64 != len {
            return Err(CorruptRecord::new(format!(
                "log entry declares {} value bytes but only {} available",
                len, n
            ))
            .into());
        }

        Ok(Self::new(term, value_type, value))
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LogEntry{{term: {}, type: {}, value: ",
            self.term, self.value_type
        )?;
        match self.value() {
            None => write!(f, "None")?,
            Some(v) => {
                write!(f, "0x")?;
                for b in v {
                    write!(f, "{:02x}", b)?;
                }
            }
        }
        write!(f, "}}")
    }
}

use std::fs::File;
use std::io;
use std::io::BufReader;
use std::io::Read;
use std::io::Seek;
use std::sync::Arc;

use codeq::error_context_ext::ErrorContextExt;
use codeq::Decode;

use crate::dump_writer;
use crate::index_table::index_record::IndexRecord;
use crate::Config;
use crate::LogEntry;

/// Read-only view of the files of a store, for debugging.
///
/// It does not acquire the directory lock and does not repair anything: an
/// index record that can not be resolved is reported as an error line and
/// the dump goes on with the next one.
pub struct Dump {
    config: Arc<Config>,
}

impl Dump {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    pub fn write_to_string(&self) -> Result<String, io::Error> {
        let mut buf = Vec::new();
        self.write(&mut buf)?;
        String::from_utf8(buf)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }

    pub fn write<W: io::Write>(&self, mut w: W) -> Result<(), io::Error> {
        writeln!(&mut w, "SeqLogStore:")?;
        self.write_with(w, dump_writer::multiline_string)
    }

    pub fn write_with<W: io::Write, D>(
        &self,
        mut w: W,
        write_record: D,
    ) -> Result<(), io::Error>
    where
        D: Fn(
            &mut W,
            u64,
            Result<(IndexRecord, LogEntry), io::Error>,
        ) -> Result<(), io::Error>,
    {
        let config = self.config.as_ref();

        let index_path = config.index_path();
        let index_f = File::open(&index_path)
            .context(|| format!("open {} for dump", index_path))?;
        let index_size = index_f.metadata()?.len();

        let data_path = config.data_path();
        let mut data_f = File::open(&data_path)
            .context(|| format!("open {} for dump", data_path))?;
        let data_size = data_f.metadata()?.len();

        let mut br = BufReader::with_capacity(config.read_buffer_size(), index_f);

        let n = index_size / IndexRecord::SIZE;
        let mut buf = [0u8; IndexRecord::SIZE as usize];

        for position in 1..=n {
            br.read_exact(&mut buf)?;

            let res = IndexRecord::decode(&buf[..]).and_then(|rec| {
                let entry = Self::load_entry(&mut data_f, data_size, rec)?;
                Ok((rec, entry))
            });
            write_record(&mut w, position, res)?;
        }

        let partial = index_size % IndexRecord::SIZE;
        if partial > 0 {
            let err = io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("incomplete index record: {} bytes", partial),
            );
            write_record(&mut w, n + 1, Err(err))?;
        }

        Ok(())
    }

    fn load_entry(
        data_f: &mut File,
        data_size: u64,
        rec: IndexRecord,
    ) -> Result<LogEntry, io::Error> {
        if rec.offset.checked_add(rec.size).is_none()
            || rec.end() > data_size
        {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("{} outruns data file size {}", rec, data_size),
            ));
        }

        data_f.seek(io::SeekFrom::Start(rec.offset))?;
        let mut buf = Vec::new();
        data_f.take(rec.size).read_to_end(&mut buf)?;

        LogEntry::decode_exact(&buf)
    }
}

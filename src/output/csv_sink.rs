use crate::output::{ExtractedRecord, RecordSink};
use crate::SinkError;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Header row written once at the top of every output file
pub const CSV_HEADER: [&str; 3] = ["URL", "Selector", "Content"];

/// CSV-backed record sink
///
/// Rows are `URL,Selector,Content`, UTF-8, comma separated, quoted by the
/// csv crate when needed. Every row is flushed as soon as it is written.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    rows_written: u64,
}

impl CsvSink<File> {
    /// Creates (or truncates) the file at `path` and writes the header row
    pub fn create(path: &Path) -> Result<Self, SinkError> {
        let file = File::create(path)?;
        Self::from_writer(file)
    }
}

impl<W: Write> CsvSink<W> {
    /// Wraps any writer and writes the header row
    pub fn from_writer(inner: W) -> Result<Self, SinkError> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b',')
            .double_quote(true)
            .from_writer(inner);
        writer.write_record(CSV_HEADER)?;
        writer.flush()?;

        Ok(Self {
            writer,
            rows_written: 0,
        })
    }

    /// Number of data rows written (header excluded)
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Gets a reference to the underlying writer
    pub fn get_ref(&self) -> &W {
        self.writer.get_ref()
    }
}

impl<W: Write> RecordSink for CsvSink<W> {
    fn append(&mut self, record: &ExtractedRecord) -> Result<(), SinkError> {
        self.writer.write_record([
            record.source_url.as_str(),
            record.selector.as_str(),
            record.text.as_str(),
        ])?;
        self.writer.flush()?;
        self.rows_written += 1;
        Ok(())
    }
}

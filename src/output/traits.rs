//! Record sink trait and types
//!
//! This module defines the record extracted from a page and the trait
//! interface every output backend implements.

use crate::SinkError;

/// One piece of text pulled out of a page by a selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedRecord {
    /// The page the text came from
    pub source_url: String,

    /// The selector that matched
    pub selector: String,

    /// Trimmed visible text of the matched element (never empty)
    pub text: String,
}

impl ExtractedRecord {
    /// Creates a new record
    pub fn new(
        source_url: impl Into<String>,
        selector: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            source_url: source_url.into(),
            selector: selector.into(),
            text: text.into(),
        }
    }
}

/// Append-only destination for extracted records
///
/// Implementations must make each appended record durable before returning,
/// so that partial progress survives a crash. Errors are fatal to the crawl.
pub trait RecordSink {
    /// Appends one record
    fn append(&mut self, record: &ExtractedRecord) -> Result<(), SinkError>;

    /// Appends records in order, stopping at the first failure
    fn append_all(&mut self, records: &[ExtractedRecord]) -> Result<(), SinkError> {
        for record in records {
            self.append(record)?;
        }
        Ok(())
    }
}

/// In-memory sink for library callers that consume records directly
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Vec<ExtractedRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every record appended so far, in emission order
    pub fn records(&self) -> &[ExtractedRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ExtractedRecord> {
        self.records
    }
}

impl RecordSink for MemorySink {
    fn append(&mut self, record: &ExtractedRecord) -> Result<(), SinkError> {
        self.records.push(record.clone());
        Ok(())
    }
}

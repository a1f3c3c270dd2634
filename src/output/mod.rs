//! Output module for persisting extracted records and reporting on a crawl
//!
//! This module handles:
//! - The `RecordSink` seam the crawler writes through
//! - CSV persistence of extracted records
//! - Per-site and whole-run crawl statistics

mod csv_sink;
pub mod stats;
mod traits;

pub use csv_sink::{CsvSink, CSV_HEADER};
pub use stats::{print_statistics, CrawlStatistics, SiteStatistics};
pub use traits::{ExtractedRecord, MemorySink, RecordSink};

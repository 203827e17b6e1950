//! Row source abstraction
//!
//! The directory never talks to the spreadsheet directly. It reads through a
//! `RowSource` and registration writes through a `RowSink`, so tests can swap
//! in in-memory doubles.

use async_trait::async_trait;

use crate::columns::Row;
use crate::error::SourceError;

/// Read side of the tutor sheet.
#[async_trait]
pub trait RowSource: Send + Sync {
    /// Fetch every data row. The header row is consumed by the implementation
    /// and used as the keys of each returned `Row`.
    async fn fetch_all_rows(&self) -> Result<Vec<Row>, SourceError>;
}

/// Write side of the tutor sheet.
#[async_trait]
pub trait RowSink: Send + Sync {
    /// Append one row after the last data row. Keys that do not match a sheet
    /// header are dropped.
    async fn append_row(&self, row: &Row) -> Result<(), SourceError>;
}

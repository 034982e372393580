//! The `OutputWriter` trait implemented by all backend writers.

use crate::{BusinessSnapshotRow, OutputResult, ResourceTotalsRow, SystemSummaryRow};

/// Trait implemented by the CSV and SQLite writers.
///
/// Errors surface to the observer, which keeps the first one for
/// [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    fn write_business_snapshots(&mut self, rows: &[BusinessSnapshotRow]) -> OutputResult<()>;

    fn write_system_summary(&mut self, row: &SystemSummaryRow) -> OutputResult<()>;

    fn write_resource_totals(&mut self, rows: &[ResourceTotalsRow]) -> OutputResult<()>;

    /// Flush and close all underlying handles.  Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}

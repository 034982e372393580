//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `business_snapshots.csv`
//! - `system_summaries.csv`
//! - `resource_totals.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{BusinessSnapshotRow, OutputResult, ResourceTotalsRow, SystemSummaryRow};

pub const BUSINESS_SNAPSHOT_HEADERS: [&str; 8] = [
    "tick",
    "business_id",
    "company_name",
    "functionality",
    "revenue",
    "binding_factor",
    "employee_availability",
    "customer_base",
];

pub const SYSTEM_SUMMARY_HEADERS: [&str; 6] = [
    "tick",
    "unix_time_secs",
    "total_revenue",
    "baseline_revenue",
    "mean_functionality",
    "nonfunctional_businesses",
];

pub const RESOURCE_TOTALS_HEADERS: [&str; 5] = ["tick", "resource", "demand", "supply", "consumption"];

/// Missing ratios are written as empty fields.
fn opt(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

/// Writes simulation output to three CSV files.
pub struct CsvWriter {
    snapshots: Writer<File>,
    summaries: Writer<File>,
    totals:    Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create the three CSV files in `dir` and write their header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut snapshots = Writer::from_path(dir.join("business_snapshots.csv"))?;
        snapshots.write_record(BUSINESS_SNAPSHOT_HEADERS)?;

        let mut summaries = Writer::from_path(dir.join("system_summaries.csv"))?;
        summaries.write_record(SYSTEM_SUMMARY_HEADERS)?;

        let mut totals = Writer::from_path(dir.join("resource_totals.csv"))?;
        totals.write_record(RESOURCE_TOTALS_HEADERS)?;

        tracing::debug!(dir = %dir.display(), "csv output opened");
        Ok(Self { snapshots, summaries, totals, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_business_snapshots(&mut self, rows: &[BusinessSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.tick.to_string(),
                row.business_id.to_string(),
                row.company_name.clone(),
                row.functionality.to_string(),
                row.revenue.to_string(),
                row.binding_factor.clone(),
                opt(row.employee_availability),
                opt(row.customer_base),
            ])?;
        }
        Ok(())
    }

    fn write_system_summary(&mut self, row: &SystemSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.unix_time_secs.to_string(),
            row.total_revenue.to_string(),
            row.baseline_revenue.to_string(),
            row.mean_functionality.to_string(),
            row.nonfunctional_businesses.to_string(),
        ])?;
        Ok(())
    }

    fn write_resource_totals(&mut self, rows: &[ResourceTotalsRow]) -> OutputResult<()> {
        for row in rows {
            self.totals.write_record(&[
                row.tick.to_string(),
                row.resource.clone(),
                row.demand.to_string(),
                row.supply.to_string(),
                row.consumption.to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        self.summaries.flush()?;
        self.totals.flush()?;
        Ok(())
    }
}

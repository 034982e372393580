//! `br-output`: simulation output writers for the business-recovery twin.
//!
//! Two backends are provided:
//!
//! | Feature   | Backend | Files created                                                           |
//! |-----------|---------|-------------------------------------------------------------------------|
//! | *(none)*  | CSV     | `business_snapshots.csv`, `system_summaries.csv`, `resource_totals.csv` |
//! | `sqlite`  | SQLite  | `output.db`                                                             |
//!
//! Both implement [`OutputWriter`] and are driven by [`SimOutputObserver`],
//! which implements `br_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use br_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer, &config);
//! sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{BusinessSnapshotRow, ResourceTotalsRow, SystemSummaryRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;

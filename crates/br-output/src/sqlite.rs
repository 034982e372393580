//! SQLite output backend (feature `sqlite`).
//!
//! Creates `output.db` in the configured output directory with three
//! tables: `business_snapshots`, `system_summaries`, and `resource_totals`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{BusinessSnapshotRow, OutputResult, ResourceTotalsRow, SystemSummaryRow};

pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS business_snapshots (
                 tick                  INTEGER NOT NULL,
                 business_id           INTEGER NOT NULL,
                 company_name          TEXT    NOT NULL,
                 functionality         REAL    NOT NULL,
                 revenue               REAL    NOT NULL,
                 binding_factor        TEXT    NOT NULL,
                 employee_availability REAL,
                 customer_base         REAL
             );
             CREATE TABLE IF NOT EXISTS system_summaries (
                 tick                     INTEGER PRIMARY KEY,
                 unix_time_secs           INTEGER NOT NULL,
                 total_revenue            REAL    NOT NULL,
                 baseline_revenue         REAL    NOT NULL,
                 mean_functionality       REAL    NOT NULL,
                 nonfunctional_businesses INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS resource_totals (
                 tick        INTEGER NOT NULL,
                 resource    TEXT    NOT NULL,
                 demand      REAL    NOT NULL,
                 supply      REAL    NOT NULL,
                 consumption REAL    NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_business_snapshots(&mut self, rows: &[BusinessSnapshotRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO business_snapshots \
                 (tick, business_id, company_name, functionality, revenue, \
                  binding_factor, employee_availability, customer_base) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.tick as i64,
                    row.business_id,
                    row.company_name,
                    row.functionality,
                    row.revenue,
                    row.binding_factor,
                    row.employee_availability,
                    row.customer_base,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_system_summary(&mut self, row: &SystemSummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO system_summaries \
             (tick, unix_time_secs, total_revenue, baseline_revenue, \
              mean_functionality, nonfunctional_businesses) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                row.tick as i64,
                row.unix_time_secs,
                row.total_revenue,
                row.baseline_revenue,
                row.mean_functionality,
                row.nonfunctional_businesses as i64,
            ],
        )?;
        Ok(())
    }

    fn write_resource_totals(&mut self, rows: &[ResourceTotalsRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO resource_totals (tick, resource, demand, supply, consumption) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.tick as i64,
                    row.resource,
                    row.demand,
                    row.supply,
                    row.consumption,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}

//! `SimOutputObserver<W>`: bridges `SimObserver` to an `OutputWriter`.

use br_business::World;
use br_core::{SimConfig, Tick};
use br_sim::{ResourceTotals, SimObserver, SystemSnapshot};

use crate::row::{BusinessSnapshotRow, ResourceTotalsRow, SystemSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes a system summary every tick, and business
/// snapshots plus resource totals at every snapshot interval.
///
/// `SimObserver` methods return nothing, so the first write error is kept
/// and later writes still go ahead.  Check it with
/// [`take_error`][Self::take_error] after `sim.run()` returns.
pub struct SimOutputObserver<W: OutputWriter> {
    writer:             W,
    start_unix_secs:    i64,
    tick_duration_secs: u32,
    last_error:         Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W, config: &SimConfig) -> Self {
        Self {
            writer,
            start_unix_secs:    config.start_unix_secs,
            tick_duration_secs: config.tick_duration_secs,
            last_error:         None,
        }
    }

    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn unix_time(&self, tick: Tick) -> i64 {
        self.start_unix_secs + tick.0 as i64 * self.tick_duration_secs as i64
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            tracing::warn!(error = %e, "output write failed");
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_tick_end(&mut self, tick: Tick, snapshot: &SystemSnapshot) {
        let row = SystemSummaryRow::new(snapshot, self.unix_time(tick));
        let result = self.writer.write_system_summary(&row);
        self.store_err(result);
    }

    fn on_snapshot(
        &mut self,
        tick:      Tick,
        world:     &World,
        _snapshot: &SystemSnapshot,
        totals:    &[ResourceTotals],
    ) {
        let rows = BusinessSnapshotRow::collect(tick, world);
        if !rows.is_empty() {
            let result = self.writer.write_business_snapshots(&rows);
            self.store_err(result);
        }

        let totals: Vec<ResourceTotalsRow> =
            totals.iter().map(|t| ResourceTotalsRow::new(tick, t)).collect();
        let result = self.writer.write_resource_totals(&totals);
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}

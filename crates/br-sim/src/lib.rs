//! `br-sim`: timestep loop orchestrator for the business-recovery twin.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Recovery  : ComponentRecovery::update sets component functionality,
//!                  shelter, and met demand for this tick.
//!   ② Traffic   : TrafficDistributionModel::distribute (simulator runs on
//!                  gated ticks only).
//!   ③ Open      : every business begins the timestep (home component and
//!                  infrastructure factors).
//!   ④ Models    : each BusinessModel::distribute, in registration order.
//!   ⑤ Resilience: ResilienceAggregator::update reads the settled state.
//!   ⑥ Observer  : on_tick_end, then on_snapshot every output interval.
//! ```
//!
//! Everything runs on one thread, one tick at a time; no model reads tick
//! `t` results before every model gated at `t` has written them.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! let mut sim = SimBuilder::new(config, world, traffic, NoRecovery)
//!     .labor(DistributionSchedule::every(7, 90))
//!     .customers(DistributionSchedule::every(7, 90))
//!     .commodities(DistributionSchedule::every(7, 90))
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! println!("lost revenue: {}", sim.resilience.lost_revenue());
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod recovery;
pub mod resilience;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use recovery::{ComponentRecovery, ComponentUpdate, NoRecovery, ScheduledRecovery};
pub use resilience::{ResilienceAggregator, SystemSnapshot};
pub use sim::{ResourceTotals, Sim};

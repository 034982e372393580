//! `br-business`: businesses and the world that hosts them.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                      |
//! |--------------|---------------------------------------------------------------|
//! | [`factor`]   | `Factor` (reason labels), `CausalEntry`                       |
//! | [`params`]   | `BusinessParams`, `CustomerShares`, `CustomerOrigin`          |
//! | [`business`] | `Business`: per-timestep functionality/revenue state machine  |
//! | [`world`]    | `World` arena (components + businesses), `WorldBuilder`       |
//! | [`error`]    | `BusinessError`, `BusinessResult<T>`                          |
//!
//! # Functionality aggregation
//!
//! ```text
//! begin_timestep(t, home):  f = 1.0; log[t] = []; apply(t, home, "Home Component Functionality")
//! apply_factor(t, level):   if level < f { f = level; log[t].push((reason, level)) }
//!                           revenue[t] = min(revenue[0] × f, revenue[t] or +∞)
//! ```
//!
//! Functionality at `t` is therefore the minimum over every factor applied
//! during `t`.  Only binding factors reach the causal log.

pub mod business;
pub mod error;
pub mod factor;
pub mod params;
pub mod world;

#[cfg(test)]
mod tests;

pub use business::Business;
pub use error::{BusinessError, BusinessResult};
pub use factor::{CausalEntry, Factor};
pub use params::{BusinessParams, CustomerOrigin, CustomerShares};
pub use world::{World, WorldBuilder};

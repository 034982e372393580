//! `br-distribution`: the business-facing distribution models.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                        |
//! |---------------|-----------------------------------------------------------------|
//! | [`model`]     | `BusinessModel` trait                                           |
//! | [`context`]   | `DistributionContext<'a>`: tick, travel times, cutoffs          |
//! | [`labor`]     | `LaborModel`: employee availability → "Labor" factor            |
//! | [`customers`] | `CustomerModel`: zone population → "Customer Base" factor       |
//! | [`commodity`] | `CommodityModel`: supplier access → "LocalSuppliers" factor     |
//! | [`error`]     | `DistributionError`, `DistributionResult<T>`                    |
//!
//! # Design notes
//!
//! Each model is a thin policy layer.  At a gated tick it reads component
//! and travel-time state through `&World` and the context, collects one
//! factor per business, and only then pushes the factors into the
//! businesses.  Ungated ticks are a no-op.

mod access;
pub mod commodity;
pub mod context;
pub mod customers;
pub mod error;
pub mod labor;
pub mod model;

#[cfg(test)]
mod tests;

pub use commodity::CommodityModel;
pub use context::DistributionContext;
pub use customers::CustomerModel;
pub use error::{DistributionError, DistributionResult};
pub use labor::LaborModel;
pub use model::BusinessModel;

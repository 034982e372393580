//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

use crate::{BusinessId, ComponentId, Tick};

/// The top-level error type for `br-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("component {0} not found")]
    ComponentNotFound(ComponentId),

    #[error("business {0} not found")]
    BusinessNotFound(BusinessId),

    #[error("distribution schedule is not strictly increasing at {0}")]
    UnorderedSchedule(Tick),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `br-core`.
pub type CoreResult<T> = Result<T, CoreError>;

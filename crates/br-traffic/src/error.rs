use br_core::{CoreError, Tick, TripId};
use thiserror::Error;

use crate::SimulatorError;

#[derive(Debug, Error)]
pub enum TrafficError {
    #[error("traffic simulation failed at {tick}: {source}")]
    Simulator {
        tick:   Tick,
        #[source]
        source: SimulatorError,
    },

    #[error("distribute called for {got} but the history expects {expected}")]
    TimestepOutOfOrder { expected: Tick, got: Tick },

    #[error("traffic schedule must include tick 0 (the pre-disaster baseline)")]
    MissingBaseline,

    #[error("scope {0:?} not supported; only \"All\" is")]
    UnsupportedScope(String),

    #[error("duplicate agent id {0} in OD trip table")]
    DuplicateTrip(TripId),

    #[error("OD trip store error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type TrafficResult<T> = Result<T, TrafficError>;

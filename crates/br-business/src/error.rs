use br_core::{BusinessId, ComponentId, CoreError, ExposureId, Tick};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BusinessError {
    #[error("{business}: timestep {tick} is not after the last recorded timestep {last}")]
    RetroactiveTimestep {
        business: BusinessId,
        tick:     Tick,
        last:     Tick,
    },

    #[error("{business}: factor applied at {tick} but the open timestep is {open:?}")]
    TimestepNotOpen {
        business: BusinessId,
        tick:     Tick,
        open:     Option<Tick>,
    },

    #[error("{business}: factor level {level} is outside [0, 1]")]
    LevelOutOfRange { business: BusinessId, level: f64 },

    #[error("home component {0} of a business is not a building")]
    HomeNotBuilding(ComponentId),

    #[error("duplicate exposure id {0}")]
    DuplicateExposure(ExposureId),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type BusinessResult<T> = Result<T, BusinessError>;

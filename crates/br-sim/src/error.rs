use thiserror::Error;

use br_business::BusinessError;
use br_core::CoreError;
use br_distribution::DistributionError;
use br_traffic::TrafficError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Business(#[from] BusinessError),

    #[error(transparent)]
    Traffic(#[from] TrafficError),

    #[error(transparent)]
    Distribution(#[from] DistributionError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type SimResult<T> = Result<T, SimError>;

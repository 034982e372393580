use thiserror::Error;

use br_business::BusinessError;
use br_core::CoreError;
use br_traffic::TrafficError;

#[derive(Debug, Error)]
pub enum DistributionError {
    #[error(transparent)]
    Business(#[from] BusinessError),

    #[error(transparent)]
    Traffic(#[from] TrafficError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type DistributionResult<T> = Result<T, DistributionError>;

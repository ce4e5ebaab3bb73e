use cb_core::{CoreError, RiderId};
use cb_station::StationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("goal station {0:?} is not in the station set")]
    UnknownGoal(String),

    #[error("station invariant violated by {rider}: {source}")]
    Invariant {
        rider:  RiderId,
        #[source]
        source: StationError,
    },

    #[error("could not start the rider pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl SimError {
    /// `true` for errors caught before any rider started.
    pub fn is_config(&self) -> bool {
        matches!(self, SimError::Config(_) | SimError::Core(_) | SimError::UnknownGoal(_))
    }
}

pub type SimResult<T> = Result<T, SimError>;

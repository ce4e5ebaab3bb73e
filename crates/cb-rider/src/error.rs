use cb_core::RiderId;
use cb_station::StationError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RideError {
    #[error("{rider}: {source}")]
    Station {
        rider:  RiderId,
        #[source]
        source: StationError,
    },
}

pub type RideResult<T> = Result<T, RideError>;

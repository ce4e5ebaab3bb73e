use thiserror::Error;

use crate::DockOp;

/// Station mutation failure.
///
/// A programming error, never a resource shortage: riders use the checked
/// `try_*` operations, which report "unavailable" as `Ok(None)`.  The
/// unchecked `take_bike`/`return_bike` raise it on an empty or full station,
/// and any operation raises it if a counter would overflow.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StationError {
    #[error("station {station:?}: {op} would break the dock counters")]
    Invariant { station: String, op: DockOp },
}

pub type StationResult<T> = Result<T, StationError>;

/// Failures while reading a city document.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("city JSON decode error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type LoadResult<T> = Result<T, LoadError>;

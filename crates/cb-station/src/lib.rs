//! `cb-station`: shared docking stations and the data-source adapter.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`station`] | `Station` (one mutex per dock), `DockCounts`, `DockOp`          |
//! | [`set`]     | `StationSet`: the immutable list riders pick from               |
//! | [`record`]  | `City`, `Network`, `StationRecord`: decoded input data          |
//! | [`loader`]  | `load_city_path`, `load_city_reader`                            |
//! | [`error`]   | `StationError`, `LoadError`                                     |
//!
//! # Locking model
//!
//! Every [`Station`] owns its own `Mutex<DockCounts>`.  Operations on one
//! station serialize against each other; operations on different stations
//! never contend.  There is no lock around the set itself; it is immutable
//! once built and shared by reference across all rider threads.

pub mod error;
pub mod loader;
pub mod record;
pub mod set;
pub mod station;


pub use error::{LoadError, LoadResult, StationError, StationResult};
pub use loader::{load_city_path, load_city_reader};
pub use record::{City, Network, StationRecord};
pub use set::StationSet;
pub use station::{DockCounts, DockOp, Station};

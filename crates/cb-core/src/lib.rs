//! `cb-core`: foundational types for the `concurrent_bikes` simulator.
//!
//! This crate is a dependency of every other `cb-*` crate.  It has no `cb-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `RiderId`, `StationIdx`                               |
//! | [`config`]      | `SimConfig` (seed, worker threads, delays)            |
//! | [`rng`]         | `RiderRng` (per-rider station picks)                  |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids and `SimConfig`.     |

pub mod config;
pub mod error;
pub mod ids;
pub mod rng;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{DEFAULT_DELAY_MS, SimConfig};
pub use error::{CoreError, CoreResult};
pub use ids::{RiderId, StationIdx};
pub use rng::RiderRng;

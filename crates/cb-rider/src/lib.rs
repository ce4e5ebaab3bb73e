//! `cb-rider`: the rider state machine and its run-wide coordination.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                        |
//! |--------------|-----------------------------------------------------------------|
//! | [`rider`]    | `Rider`, `RiderPhase`, `RideContext`, `SimulationResult`        |
//! | [`signal`]   | `StopSignal`: broadcast-once cancellation shared by a run       |
//! | [`observer`] | `StepObserver` trait, `StepEvent`, `NoopObserver`, `TracingObserver` |
//! | [`error`]    | `RideError`, `RideResult<T>`                                    |
//!
//! # Rider loop
//!
//! ```text
//! while paths_completed < target && !stop.is_raised():
//!   station = uniform pick over the whole set (fresh every attempt)
//!   SeekBike: bike free?  take it → sleep step_delay → SeekSlot
//!             otherwise   sleep wait_delay, add it to total_wait
//!   SeekSlot: slot free?  return it → sleep step_delay → paths += 1
//!                         station == goal → raise stop
//!             otherwise   sleep wait_delay, add it to total_wait
//! ```

pub mod error;
pub mod observer;
pub mod rider;
pub mod signal;

#[cfg(test)]
mod tests;

pub use error::{RideError, RideResult};
pub use observer::{NoopObserver, StepAction, StepEvent, StepObserver, TracingObserver};
pub use rider::{RideContext, Rider, RiderPhase, SimulationResult};
pub use signal::StopSignal;

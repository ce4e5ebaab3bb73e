//! `cb-sim`: orchestrator for the concurrent_bikes simulator.
//!
//! # Run lifecycle
//!
//! ```text
//! SimBuilder::build
//!   validate config, station set, rider count, path budget, goal id
//! Simulation::run
//!   ① Fan-out: one Rayon job per rider on a dedicated pool; every rider
//!               borrows the same StationSet and StopSignal.
//!   ② Ride:    each rider loops take → ride → return until its budget is
//!               spent or the stop signal is raised (goal, deadline, failure).
//!   ③ Fan-in:  collect SimulationResults in rider-id order and sum them
//!               into a SimReport.
//! ```
//!
//! # Stopping a run
//!
//! | Trigger                        | Effect                                        |
//! |--------------------------------|-----------------------------------------------|
//! | A rider docks at the goal      | Stop raised; `goal_reached_by` set            |
//! | `stop_handle().raise()`        | Stop raised; riders report `stopped_early`    |
//! | A rider panics                 | Stop raised; counted in `failed_riders`       |
//! | A station invariant error      | Stop raised; `run` returns `SimError::Invariant` |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use cb_core::SimConfig;
//! use cb_rider::NoopObserver;
//! use cb_sim::SimBuilder;
//!
//! let sim = SimBuilder::new(SimConfig::default(), stations)
//!     .riders(50)
//!     .paths_per_rider(10)
//!     .build()?;
//! let report = sim.run(&NoopObserver)?;
//! println!("{report}");
//! ```

pub mod builder;
pub mod error;
pub mod report;
pub mod sim;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use report::SimReport;
pub use sim::{Simulation, run_simulation};

//! A single docking station.
//!
//! `free_bikes + free_slots` is fixed at construction (the dock's capacity)
//! and both counters are unsigned, so the two invariants reduce to "every
//! mutation moves exactly one unit between the counters without underflow".
//! Counters live behind one `Mutex` per station and are only ever replaced as
//! a whole `DockCounts` value, so a reader can never observe a take or return
//! that has updated one counter but not the other.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{StationError, StationRecord, StationResult};

// ── DockOp ────────────────────────────────────────────────────────────────────

/// The two mutations a rider can perform on a station.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DockOp {
    /// `free_bikes -= 1`, `free_slots += 1`.
    TakeBike,
    /// `free_bikes += 1`, `free_slots -= 1`.
    ReturnBike,
}

impl DockOp {
    pub fn as_str(self) -> &'static str {
        match self {
            DockOp::TakeBike   => "take_bike",
            DockOp::ReturnBike => "return_bike",
        }
    }
}

impl fmt::Display for DockOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── DockCounts ────────────────────────────────────────────────────────────────

/// Snapshot of a station's counters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct DockCounts {
    pub free_bikes: u32,
    pub free_slots: u32,
}

impl DockCounts {
    #[inline]
    pub fn new(free_bikes: u32, free_slots: u32) -> Self {
        Self { free_bikes, free_slots }
    }

    /// Total docks (bikes + empty slots).
    #[inline]
    pub fn capacity(self) -> u64 {
        self.free_bikes as u64 + self.free_slots as u64
    }

    /// `true` if `op` can be applied without underflowing a counter.
    #[inline]
    pub fn allows(self, op: DockOp) -> bool {
        match op {
            DockOp::TakeBike   => self.free_bikes > 0,
            DockOp::ReturnBike => self.free_slots > 0,
        }
    }

    /// The counts after `op`, or `None` if `op` would underflow (or overflow)
    /// a counter.
    pub fn after(self, op: DockOp) -> Option<DockCounts> {
        let next = match op {
            DockOp::TakeBike => DockCounts {
                free_bikes: self.free_bikes.checked_sub(1)?,
                free_slots: self.free_slots.checked_add(1)?,
            },
            DockOp::ReturnBike => DockCounts {
                free_bikes: self.free_bikes.checked_add(1)?,
                free_slots: self.free_slots.checked_sub(1)?,
            },
        };
        Some(next)
    }
}

impl fmt::Display for DockCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bikes={} slots={}", self.free_bikes, self.free_slots)
    }
}

// ── Station ───────────────────────────────────────────────────────────────────

/// A docking station shared by every rider in a run.
///
/// `Station` is `Sync`: all methods take `&self` and serialize through the
/// station's own lock.
#[derive(Debug)]
pub struct Station {
    id:        String,
    name:      String,
    latitude:  f64,
    longitude: f64,
    capacity:  u64,
    dock:      Mutex<DockCounts>,
}

impl Station {
    /// Create a station with no location data.
    pub fn new(id: impl Into<String>, name: impl Into<String>, counts: DockCounts) -> Self {
        Self {
            id:        id.into(),
            name:      name.into(),
            latitude:  0.0,
            longitude: 0.0,
            capacity:  counts.capacity(),
            dock:      Mutex::new(counts),
        }
    }

    /// Attach decoded coordinates.  Carried through untouched; the simulation
    /// never reads them.
    pub fn with_location(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }

    /// Build a station from a decoded input record (`empty_slots` becomes
    /// `free_slots`).
    pub fn from_record(record: StationRecord) -> Self {
        Station::new(
            record.id,
            record.name,
            DockCounts::new(record.free_bikes, record.empty_slots),
        )
        .with_location(record.latitude, record.longitude)
    }

    // ── Identity ──────────────────────────────────────────────────────────

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Total docks, fixed for the station's lifetime.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    // ── Reads ─────────────────────────────────────────────────────────────

    /// Consistent snapshot of both counters.
    pub fn counts(&self) -> DockCounts {
        *self.lock()
    }

    pub fn free_bikes(&self) -> u32 {
        self.counts().free_bikes
    }

    pub fn free_slots(&self) -> u32 {
        self.counts().free_slots
    }

    // ── Unchecked mutations ───────────────────────────────────────────────

    /// Take a bike.  The caller is expected to have checked availability;
    /// taking from an empty station is an invariant breach and returns
    /// [`StationError::Invariant`] without touching the counters.
    pub fn take_bike(&self) -> StationResult<DockCounts> {
        self.apply(DockOp::TakeBike)
    }

    /// Return a bike.  Returning into a full station is an invariant breach.
    pub fn return_bike(&self) -> StationResult<DockCounts> {
        self.apply(DockOp::ReturnBike)
    }

    /// Apply `op`, failing if it would break the counter invariant.
    pub fn apply(&self, op: DockOp) -> StationResult<DockCounts> {
        let mut dock = self.lock();
        let next = dock.after(op).ok_or_else(|| StationError::Invariant {
            station: self.id.clone(),
            op,
        })?;
        debug_assert_eq!(next.capacity(), self.capacity);
        *dock = next;
        Ok(next)
    }

    // ── Checked (check-and-act) mutations ─────────────────────────────────

    /// Take a bike if one is free.  Availability check and mutation happen
    /// under the same lock, so two riders can never both take the last bike.
    ///
    /// Returns `Ok(None)` if the station has no free bike.
    pub fn try_take_bike(&self) -> StationResult<Option<DockCounts>> {
        self.try_apply(DockOp::TakeBike)
    }

    /// Return a bike if a slot is free.  Returns `Ok(None)` if the station is
    /// full.
    pub fn try_return_bike(&self) -> StationResult<Option<DockCounts>> {
        self.try_apply(DockOp::ReturnBike)
    }

    /// Apply `op` if the station allows it right now.
    pub fn try_apply(&self, op: DockOp) -> StationResult<Option<DockCounts>> {
        let mut dock = self.lock();
        if !dock.allows(op) {
            return Ok(None);
        }
        let next = dock.after(op).ok_or_else(|| StationError::Invariant {
            station: self.id.clone(),
            op,
        })?;
        debug_assert_eq!(next.capacity(), self.capacity);
        *dock = next;
        Ok(Some(next))
    }

    // ── Locking ───────────────────────────────────────────────────────────

    /// Lock the counters.
    ///
    /// A poisoned lock is recovered: the guarded value is only ever replaced
    /// by a single whole-value store after all checks pass, so a panic while
    /// holding the lock cannot leave it half-updated.
    fn lock(&self) -> MutexGuard<'_, DockCounts> {
        self.dock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

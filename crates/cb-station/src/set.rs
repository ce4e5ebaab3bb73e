//! `StationSet`: the station list shared by one run.

use std::ops::Range;

use cb_core::StationIdx;

use crate::{City, Station, StationRecord};

/// Immutable, index-addressed list of stations.
///
/// The set itself is never locked; only the individual stations are.  Riders
/// hold `&StationSet` and address stations by [`StationIdx`].
#[derive(Debug, Default)]
pub struct StationSet {
    stations: Vec<Station>,
}

impl StationSet {
    pub fn new(stations: Vec<Station>) -> Self {
        Self { stations }
    }

    /// Build stations from decoded records, preserving order.
    pub fn from_records(records: impl IntoIterator<Item = StationRecord>) -> Self {
        Self::new(records.into_iter().map(Station::from_record).collect())
    }

    /// All stations of a decoded city document.
    pub fn from_city(city: City) -> Self {
        Self::from_records(city.network.stations)
    }

    /// A fresh set holding copies of the stations in `range` with their
    /// current counts.  Out-of-range bounds are clamped.
    pub fn subset(&self, range: Range<usize>) -> StationSet {
        let end = range.end.min(self.stations.len());
        let start = range.start.min(end);
        let stations = self.stations[start..end]
            .iter()
            .map(|s| {
                Station::new(s.id(), s.name(), s.counts())
                    .with_location(s.latitude(), s.longitude())
            })
            .collect();
        Self::new(stations)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Station at `idx`.
    ///
    /// # Panics
    /// Panics if `idx` is out of range.  Indices come from
    /// [`RiderRng::pick_station`](cb_core::RiderRng::pick_station) over
    /// `0..len()`, or from [`position`](Self::position).
    #[inline]
    pub fn get(&self, idx: StationIdx) -> &Station {
        &self.stations[idx.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Station> + '_ {
        self.stations.iter()
    }

    /// Index of the first station whose id equals `id`.
    pub fn position(&self, id: &str) -> Option<StationIdx> {
        self.stations
            .iter()
            .position(|s| s.id() == id)
            .map(|i| StationIdx(i as u32))
    }

    /// Free bikes summed over the set (each station read under its own lock,
    /// so the sum is only a consistent total while no rider is running).
    pub fn total_free_bikes(&self) -> u64 {
        self.stations.iter().map(|s| s.free_bikes() as u64).sum()
    }

    /// Total docks across the set.
    pub fn total_capacity(&self) -> u64 {
        self.stations.iter().map(Station::capacity).sum()
    }
}

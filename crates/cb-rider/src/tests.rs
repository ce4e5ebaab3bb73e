//! Unit tests for cb-rider.

use std::sync::Mutex;
use std::time::Duration;

use cb_core::{RiderId, SimConfig, StationIdx};
use cb_station::{DockCounts, Station, StationSet};

use crate::{
    NoopObserver, RideContext, RideError, Rider, RiderPhase, SimulationResult, StepAction,
    StepEvent, StepObserver, StopSignal,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn fast_config() -> SimConfig {
    SimConfig { wait_delay_ms: 0, step_delay_ms: 0, ..SimConfig::default() }
}

fn ctx<'a>(
    stations: &'a StationSet,
    target:   u32,
    goal:     Option<&'a str>,
    stop:     &'a StopSignal,
    observer: &'a dyn StepObserver,
) -> RideContext<'a> {
    RideContext::new(stations, target, goal, &fast_config(), stop, observer)
}

/// Observer that records every step.
#[derive(Default)]
struct Recorder {
    steps:    Mutex<Vec<(StepAction, DockCounts)>>,
    goals:    Mutex<Vec<RiderId>>,
    finished: Mutex<Vec<SimulationResult>>,
}

impl StepObserver for Recorder {
    fn on_step(&self, event: &StepEvent<'_>) {
        self.steps.lock().unwrap().push((event.action, event.counts));
    }
    fn on_goal_reached(&self, rider: RiderId, _station_id: &str) {
        self.goals.lock().unwrap().push(rider);
    }
    fn on_rider_finished(&self, result: &SimulationResult) {
        self.finished.lock().unwrap().push(*result);
    }
}

// ── Rider loop ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod rider_tests {
    use super::*;

    #[test]
    fn completes_path_budget_without_waiting() {
        let stations = StationSet::new(vec![Station::new("a", "A", DockCounts::new(3, 3))]);
        let stop = StopSignal::new();
        let result = Rider::new(RiderId(0), 1)
            .run(&ctx(&stations, 10, None, &stop, &NoopObserver))
            .unwrap();

        assert_eq!(result.paths_completed, 10);
        assert_eq!(result.wait_time, Duration::ZERO);
        assert!(!result.stopped_early);
        assert!(!result.holding_bike);
        assert_eq!(stations.get(StationIdx(0)).counts(), DockCounts::new(3, 3));
    }

    #[test]
    fn steps_alternate_take_and_return() {
        let stations = StationSet::new(vec![
            Station::new("a", "A", DockCounts::new(2, 2)),
            Station::new("b", "B", DockCounts::new(2, 2)),
        ]);
        let stop = StopSignal::new();
        let rec = Recorder::default();
        Rider::new(RiderId(4), 7).run(&ctx(&stations, 5, None, &stop, &rec)).unwrap();

        let steps = rec.steps.lock().unwrap();
        let moves: Vec<_> = steps.iter().filter(|(a, _)| !a.is_wait()).map(|(a, _)| *a).collect();
        assert_eq!(moves.len(), 10);
        for pair in moves.chunks(2) {
            assert_eq!(pair, [StepAction::TookBike, StepAction::ReturnedBike]);
        }
        assert!(steps.iter().all(|(_, c)| c.capacity() == 4));
        assert_eq!(rec.finished.lock().unwrap().len(), 1);
    }

    #[test]
    fn empty_station_accumulates_wait() {
        let stations = StationSet::new(vec![Station::new("a", "A", DockCounts::new(0, 5))]);
        let stop = StopSignal::new();
        let rec = Recorder::default();
        let mut context = ctx(&stations, 1, None, &stop, &rec);
        context.wait_delay = Duration::from_millis(1);

        let mut rider = Rider::new(RiderId(0), 0);
        for _ in 0..3 {
            rider.step(&context).unwrap();
        }
        assert_eq!(rider.phase(), RiderPhase::SeekBike);
        assert_eq!(rider.total_wait(), Duration::from_millis(3));
        assert_eq!(rider.paths_completed(), 0);

        let steps = rec.steps.lock().unwrap();
        assert!(steps.iter().all(|(a, c)| *a == StepAction::WaitedForBike && *c == DockCounts::new(0, 5)));
    }

    #[test]
    fn take_then_dock_at_single_full_station() {
        let stations = StationSet::new(vec![
            Station::new("src", "Source", DockCounts::new(1, 0)),
        ]);
        let stop = StopSignal::new();
        let rec = Recorder::default();
        let mut rider = Rider::new(RiderId(0), 0);
        let context = ctx(&stations, 1, None, &stop, &rec);

        rider.step(&context).unwrap();
        assert!(rider.has_bike());
        assert_eq!(rider.phase(), RiderPhase::SeekSlot);

        // The taken bike freed the only slot; docking succeeds next.
        rider.step(&context).unwrap();
        assert!(!rider.has_bike());
        assert_eq!(rider.paths_completed(), 1);
        assert_eq!(stations.get(StationIdx(0)).counts(), DockCounts::new(1, 0));
    }

    #[test]
    fn raised_stop_ends_loop_before_first_step() {
        let stations = StationSet::new(vec![Station::new("a", "A", DockCounts::new(3, 3))]);
        let stop = StopSignal::new();
        stop.raise();
        let result = Rider::new(RiderId(2), 0)
            .run(&ctx(&stations, 10, None, &stop, &NoopObserver))
            .unwrap();
        assert_eq!(result.paths_completed, 0);
        assert!(result.stopped_early);
    }

    #[test]
    fn docking_at_goal_raises_stop() {
        let stations = StationSet::new(vec![Station::new("goal", "Goal", DockCounts::new(3, 3))]);
        let stop = StopSignal::new();
        let rec = Recorder::default();
        let result = Rider::new(RiderId(9), 0)
            .run(&ctx(&stations, 10, Some("goal"), &stop, &rec))
            .unwrap();

        assert_eq!(result.paths_completed, 1);
        assert!(result.stopped_early);
        assert!(!result.holding_bike);
        assert!(stop.is_raised());
        assert_eq!(stop.goal_winner(), Some(RiderId(9)));
        assert_eq!(*rec.goals.lock().unwrap(), vec![RiderId(9)]);
    }

    #[test]
    fn goal_matches_duplicate_station_id() {
        // The first copy has no docks, so every take and return lands on the second.
        let stations = StationSet::new(vec![
            Station::new("goal", "Closed", DockCounts::new(0, 0)),
            Station::new("goal", "Open",   DockCounts::new(2, 2)),
        ]);
        let stop = StopSignal::new();
        let result = Rider::new(RiderId(1), 3)
            .run(&ctx(&stations, 10, Some("goal"), &stop, &NoopObserver))
            .unwrap();

        assert_eq!(result.paths_completed, 1);
        assert!(stop.is_raised());
        assert_eq!(stop.goal_winner(), Some(RiderId(1)));
        assert_eq!(stations.get(StationIdx(1)).counts(), DockCounts::new(2, 2));
    }

    #[test]
    fn station_invariant_error_stops_run() {
        // Taking a bike would overflow the slot counter.
        let stations = StationSet::new(vec![Station::new("x", "X", DockCounts::new(1, u32::MAX))]);
        let stop = StopSignal::new();
        let err = Rider::new(RiderId(5), 0)
            .run(&ctx(&stations, 3, None, &stop, &NoopObserver))
            .unwrap_err();

        let RideError::Station { rider, .. } = err;
        assert_eq!(rider, RiderId(5));
        assert!(stop.is_raised());
        assert_eq!(stations.get(StationIdx(0)).counts(), DockCounts::new(1, u32::MAX));
    }
}

// ── StopSignal ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod signal_tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn raise_is_idempotent() {
        let stop = StopSignal::new();
        assert!(!stop.is_raised());
        assert!(stop.raise());
        assert!(!stop.raise());
        assert!(stop.is_raised());
        assert_eq!(stop.goal_winner(), None);
    }

    #[test]
    fn clones_share_state() {
        let stop = StopSignal::new();
        let handle = stop.clone();
        handle.raise();
        assert!(stop.is_raised());
    }

    #[test]
    fn concurrent_goal_raises_record_one_winner() {
        let stop = StopSignal::new();
        let winners = AtomicUsize::new(0);
        std::thread::scope(|scope| {
            for i in 0..16 {
                let stop = &stop;
                let winners = &winners;
                scope.spawn(move || {
                    if stop.raise_for_goal(RiderId(i)) {
                        winners.fetch_add(1, Ordering::SeqCst);
                    }
                });
            }
        });
        assert_eq!(winners.load(Ordering::SeqCst), 1);
        assert!(stop.is_raised());
        assert!(stop.goal_winner().is_some_and(|r| r.0 < 16));
    }

    #[test]
    fn goal_after_plain_raise_still_records_winner() {
        let stop = StopSignal::new();
        stop.raise();
        assert!(stop.raise_for_goal(RiderId(3)));
        assert_eq!(stop.goal_winner(), Some(RiderId(3)));
    }
}

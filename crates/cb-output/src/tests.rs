//! Integration tests for cb-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::CsvWriter;
    use crate::row::{RiderRow, StepRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn step_row(rider_id: u32, action: &'static str) -> StepRow<'static> {
        StepRow { rider_id, station_id: "duomo", action, free_bikes: 1, free_slots: 29 }
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("steps.csv").exists());
        assert!(dir.path().join("riders.csv").exists());
    }

    #[test]
    fn missing_output_dir_is_created() {
        let dir = tmp();
        let nested = dir.path().join("runs").join("first");
        let _w = CsvWriter::new(&nested).unwrap();
        assert!(nested.join("steps.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("steps.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["rider_id", "station_id", "action", "free_bikes", "free_slots"]);

        let mut rdr2 = csv::Reader::from_path(dir.path().join("riders.csv")).unwrap();
        let headers2: Vec<_> = rdr2.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers2, ["rider_id", "wait_secs", "paths_completed", "stopped_early", "holding_bike"]);
    }

    #[test]
    fn step_rows_written_in_order() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_step(&step_row(0, "took_bike")).unwrap();
        w.write_step(&step_row(3, "waited_for_slot")).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("steps.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "0");
        assert_eq!(&rows[0][1], "duomo");
        assert_eq!(&rows[0][2], "took_bike");
        assert_eq!(&rows[0][3], "1");
        assert_eq!(&rows[0][4], "29");
        assert_eq!(&rows[1][2], "waited_for_slot");
    }

    #[test]
    fn rider_row_formats_flags_and_wait() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_rider(&RiderRow {
            rider_id:        7,
            wait_secs:       1.25,
            paths_completed: 4,
            stopped_early:   true,
            holding_bike:    false,
        })
        .unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("riders.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "7");
        assert_eq!(&rows[0][1], "1.250");
        assert_eq!(&rows[0][2], "4");
        assert_eq!(&rows[0][3], "1");
        assert_eq!(&rows[0][4], "0");
    }

    #[test]
    fn finish_is_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }
}

#[cfg(test)]
mod observer_tests {
    use std::io;
    use std::time::Duration;

    use cb_core::{RiderId, SimConfig, StationIdx};
    use cb_rider::{SimulationResult, StepAction, StepEvent, StepObserver};
    use cb_sim::SimBuilder;
    use cb_station::{DockCounts, Station, StationSet};
    use tempfile::TempDir;

    use crate::{CsvWriter, OutputError, OutputResult, OutputWriter, RiderRow, StepLogObserver, StepRow};

    /// In-memory writer that records owned copies of every row.
    #[derive(Default)]
    struct MemWriter {
        steps:    Vec<(u32, String, &'static str)>,
        riders:   Vec<RiderRow>,
        finished: usize,
    }

    impl OutputWriter for MemWriter {
        fn write_step(&mut self, row: &StepRow<'_>) -> OutputResult<()> {
            self.steps.push((row.rider_id, row.station_id.to_owned(), row.action));
            Ok(())
        }
        fn write_rider(&mut self, row: &RiderRow) -> OutputResult<()> {
            self.riders.push(*row);
            Ok(())
        }
        fn finish(&mut self) -> OutputResult<()> {
            self.finished += 1;
            Ok(())
        }
    }

    /// Writer whose step writes always fail.
    struct FailingWriter;

    impl OutputWriter for FailingWriter {
        fn write_step(&mut self, _row: &StepRow<'_>) -> OutputResult<()> {
            Err(OutputError::Io(io::Error::other("disk full")))
        }
        fn write_rider(&mut self, _row: &RiderRow) -> OutputResult<()> {
            Ok(())
        }
        fn finish(&mut self) -> OutputResult<()> {
            Ok(())
        }
    }

    fn event(action: StepAction) -> StepEvent<'static> {
        StepEvent {
            rider:      RiderId(2),
            station:    StationIdx(0),
            station_id: "duomo",
            action,
            counts:     DockCounts::new(1, 29),
        }
    }

    fn result() -> SimulationResult {
        SimulationResult {
            rider:           RiderId(2),
            wait_time:       Duration::from_millis(300),
            paths_completed: 3,
            stopped_early:   false,
            holding_bike:    false,
        }
    }

    #[test]
    fn forwards_steps_and_results() {
        let obs = StepLogObserver::new(MemWriter::default());
        obs.on_step(&event(StepAction::TookBike));
        obs.on_step(&event(StepAction::WaitedForSlot));
        obs.on_rider_finished(&result());
        obs.finish().unwrap();
        assert_eq!(obs.rows_written(), 3);

        let w = obs.into_writer();
        assert_eq!(w.steps, vec![(2, "duomo".to_owned(), "took_bike"), (2, "duomo".to_owned(), "waited_for_slot")]);
        assert_eq!(w.riders.len(), 1);
        assert_eq!(w.riders[0].rider_id, 2);
        assert!((w.riders[0].wait_secs - 0.3).abs() < 1e-9);
        assert_eq!(w.finished, 1);
    }

    #[test]
    fn without_waits_skips_wait_rows() {
        let obs = StepLogObserver::new(MemWriter::default()).without_waits();
        obs.on_step(&event(StepAction::WaitedForBike));
        obs.on_step(&event(StepAction::TookBike));
        obs.on_step(&event(StepAction::WaitedForSlot));
        obs.on_step(&event(StepAction::ReturnedBike));

        let w = obs.into_writer();
        let actions: Vec<_> = w.steps.iter().map(|s| s.2).collect();
        assert_eq!(actions, ["took_bike", "returned_bike"]);
    }

    #[test]
    fn first_error_is_stored() {
        let obs = StepLogObserver::new(FailingWriter);
        obs.on_step(&event(StepAction::TookBike));
        obs.on_step(&event(StepAction::ReturnedBike));
        obs.on_rider_finished(&result());

        assert_eq!(obs.rows_written(), 1);
        assert!(matches!(obs.take_error(), Some(OutputError::Io(_))));
        assert!(obs.take_error().is_none());
    }

    #[test]
    fn finish_reports_stored_error() {
        let obs = StepLogObserver::new(FailingWriter);
        obs.on_step(&event(StepAction::TookBike));
        assert!(obs.finish().is_err());
        assert!(obs.finish().is_ok());
    }

    #[test]
    fn logs_a_full_run_to_csv() {
        let dir = TempDir::new().unwrap();
        let stations = StationSet::new(vec![
            Station::new("duomo",   "Duomo",   DockCounts::new(3, 5)),
            Station::new("cadorna", "Cadorna", DockCounts::new(2, 6)),
        ]);
        let config = SimConfig { wait_delay_ms: 0, step_delay_ms: 0, ..SimConfig::default() };
        let sim = SimBuilder::new(config, stations)
            .riders(4)
            .paths_per_rider(5)
            .build()
            .unwrap();

        let obs = StepLogObserver::new(CsvWriter::new(dir.path()).unwrap()).without_waits();
        let report = sim.run(&obs).unwrap();
        obs.finish().unwrap();
        assert_eq!(report.total_paths_completed, 20);

        let mut steps = csv::Reader::from_path(dir.path().join("steps.csv")).unwrap();
        let step_rows: Vec<_> = steps.records().map(|r| r.unwrap()).collect();
        // One take and one return per path.
        assert_eq!(step_rows.len(), 40);
        for row in &step_rows {
            let bikes: u64 = row[3].parse().unwrap();
            let slots: u64 = row[4].parse().unwrap();
            assert_eq!(bikes + slots, 8);
        }

        let mut riders = csv::Reader::from_path(dir.path().join("riders.csv")).unwrap();
        let rider_rows: Vec<_> = riders.records().map(|r| r.unwrap()).collect();
        assert_eq!(rider_rows.len(), 4);
        assert!(rider_rows.iter().all(|r| &r[2] == "5" && &r[3] == "0"));
    }
}

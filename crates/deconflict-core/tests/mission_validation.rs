//! End-to-end checks of trajectory queries and mission validation.

use chrono::{DateTime, Duration, TimeZone, Utc};
use deconflict_core::{
    DeconflictError, DeconflictionRules, DetectionStrategy, FlightRegistry, MissionStatus,
    Presence, Trajectory, TrajectoryDefect, Waypoint,
};

const EPS: f64 = 1e-9;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap()
}

fn straight(id: &str, from: [f64; 3], to: [f64; 3], start: DateTime<Utc>) -> Trajectory {
    Trajectory::new(id, vec![from.into(), to.into()], start, 5.0).expect("valid trajectory")
}

fn primary() -> Trajectory {
    straight("Primary_Test", [50.0, 0.0, 20.0], [50.0, 100.0, 20.0], now())
}

fn survey_path() -> Trajectory {
    Trajectory::new(
        "Survey",
        vec![
            Waypoint::new(0.0, 0.0, 10.0),
            Waypoint::new(40.0, 30.0, 10.0),
            Waypoint::new(40.0, 30.0, 10.0),
            Waypoint::new(40.0, 30.0, 60.0),
            Waypoint::new(-10.0, 30.0, 60.0),
        ],
        now(),
        7.5,
    )
    .unwrap()
}

#[test]
fn endpoints_and_arrivals_reproduce_waypoints() {
    for traj in [primary(), survey_path()] {
        let first = traj.waypoints()[0];
        let last = *traj.waypoints().last().unwrap();

        let start = traj.position_at(0.0).position().unwrap();
        let end = traj.position_at(traj.total_duration()).position().unwrap();
        assert!(start.distance_to(&first) < EPS);
        assert!(end.distance_to(&last) < EPS);

        for (i, arrival) in traj.arrival_times().iter().enumerate() {
            let pos = traj.position_at(*arrival).position().unwrap();
            assert!(
                pos.distance_to(&traj.waypoints()[i]) < EPS,
                "waypoint {} of {} not reproduced",
                i,
                traj.id()
            );
        }
    }
}

#[test]
fn arrival_times_are_monotonic() {
    let traj = survey_path();
    let times = traj.arrival_times();
    for pair in times.windows(2) {
        assert!(pair[1] >= pair[0]);
    }
    // Distinct consecutive waypoints advance the clock.
    assert!(times[1] > times[0]);
    assert_eq!(times[1], times[2]);
    assert!(times[3] > times[2]);
}

#[test]
fn absent_outside_temporal_domain() {
    let traj = survey_path();
    let duration = traj.total_duration();
    for t in [-100.0, -1e-6, duration + 1e-6, duration * 2.0] {
        assert_eq!(traj.position_at(t), Presence::Absent, "t = {}", t);
    }
}

#[test]
fn construction_rejects_short_paths_and_bad_speed() {
    let single = Trajectory::new("one", vec![Waypoint::new(0.0, 0.0, 0.0)], now(), 5.0);
    assert!(matches!(
        single,
        Err(DeconflictError::InvalidTrajectory {
            reason: TrajectoryDefect::TooFewWaypoints(1),
            ..
        })
    ));

    let empty = Trajectory::new("none", Vec::new(), now(), 5.0);
    assert!(empty.is_err());

    for speed in [0.0, -3.0] {
        let result = Trajectory::new(
            "slow",
            vec![Waypoint::new(0.0, 0.0, 0.0), Waypoint::new(10.0, 0.0, 0.0)],
            now(),
            speed,
        );
        assert!(matches!(
            result,
            Err(DeconflictError::InvalidTrajectory { .. })
        ));
    }
}

#[test]
fn empty_registry_is_clear() {
    let registry = FlightRegistry::new();
    for traj in [primary(), survey_path()] {
        let report = registry.validate_mission(&traj, 10.0, 0.5).unwrap();
        assert_eq!(report.status, MissionStatus::Clear);
        assert!(report.conflicts.is_empty());
    }
}

#[test]
fn crossing_flight_conflicts_and_high_flight_does_not() {
    let mut registry = FlightRegistry::new();
    registry.add_flight(straight("Test_Conflict", [0.0, 50.0, 20.0], [100.0, 50.0, 20.0], now()));
    registry.add_flight(straight("Test_Safe", [0.0, 50.0, 80.0], [100.0, 50.0, 80.0], now()));

    let report = registry.validate_mission(&primary(), 10.0, 0.5).unwrap();
    assert_eq!(report.status, MissionStatus::Conflict);
    assert_eq!(report.conflicts.len(), 1);

    let record = report.conflict_with("Test_Conflict").expect("crossing flight reported");
    assert!(record.distance_m < 10.0);
    assert!(record.location.distance_to(&Waypoint::new(50.0, 50.0, 20.0)) < 10.0);
    assert!(report.conflict_with("Test_Safe").is_none());
}

#[test]
fn flights_shifted_beyond_both_durations_never_conflict() {
    let primary = primary();
    let late_start = now() + Duration::seconds(primary.total_duration() as i64 + 60);
    let early_start = now() - Duration::seconds(primary.total_duration() as i64 + 60);

    let mut registry = FlightRegistry::new();
    registry.add_flight(straight("Late", [0.0, 50.0, 20.0], [100.0, 50.0, 20.0], late_start));
    registry.add_flight(straight("Early", [0.0, 50.0, 20.0], [100.0, 50.0, 20.0], early_start));
    // Same path as the primary, but long gone before it departs.
    registry.add_flight(straight("Shadow", [50.0, 0.0, 20.0], [50.0, 100.0, 20.0], early_start));

    for strategy in [DetectionStrategy::FirstBreach, DetectionStrategy::ClosestApproach] {
        let rules = DeconflictionRules::with_buffer(1_000.0).strategy(strategy);
        let report = registry.validate_with_rules(&primary, rules).unwrap();
        assert!(report.is_clear(), "{:?} reported {:?}", strategy, report.conflicts);
    }
}

#[test]
fn validation_is_idempotent() {
    let mut registry = FlightRegistry::new();
    registry.add_flight(straight("A", [0.0, 50.0, 20.0], [100.0, 50.0, 20.0], now()));
    registry.add_flight(straight(
        "B",
        [100.0, 40.0, 22.0],
        [0.0, 60.0, 22.0],
        now() + Duration::milliseconds(1500),
    ));

    let primary = primary();
    let first = registry.validate_mission(&primary, 10.0, 0.5).unwrap();
    let second = registry.validate_mission(&primary, 10.0, 0.5).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.conflicts.len(), 2);
}

#[test]
fn finer_step_finds_brief_encounters() {
    // Flights cross head-on at 20 m/s closing speed; with a 1 m buffer the
    // breach lasts 0.1 s and falls between coarse samples.
    let primary = Trajectory::new(
        "Fast",
        vec![Waypoint::new(0.0, 0.0, 0.0), Waypoint::new(102.6, 0.0, 0.0)],
        now(),
        10.0,
    )
    .unwrap();
    let oncoming = Trajectory::new(
        "Oncoming",
        vec![Waypoint::new(102.6, 0.0, 0.0), Waypoint::new(0.0, 0.0, 0.0)],
        now(),
        10.0,
    )
    .unwrap();

    let mut registry = FlightRegistry::new();
    registry.add_flight(oncoming);

    // Meeting point is at t = 5.13 s.
    assert!(registry.validate_mission(&primary, 1.0, 0.5).unwrap().is_clear());

    let fine = registry.validate_mission(&primary, 1.0, 0.025).unwrap();
    let record = fine.conflict_with("Oncoming").unwrap();
    assert!(record.distance_m < 1.0);
    assert!((record.relative_time_s - 5.13).abs() <= 0.06);
}

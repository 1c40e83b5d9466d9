//! Tests for the engine, mobility, collision, freshness and event systems.

use patrol_core::commands::UnitCommand;
use patrol_core::components::*;
use patrol_core::config::SimConfig;
use patrol_core::entity::EntityId;
use patrol_core::error::PathError;
use patrol_core::types::{Coords, SimContext, SimTime, WorldBounds};

use crate::engine::PatrolEngine;
use crate::error::SimError;
use crate::paths::{FixedStart, HandcraftedPaths, InMemoryPaths};
use crate::systems::{collision, events::EventGenerator, freshness, mobility};

fn ctx(tick_duration_secs: f64) -> SimContext {
    SimContext {
        time: SimTime::default(),
        tick_duration_secs,
        bounds: WorldBounds::new(1500.0, 1500.0),
    }
}

fn path_config(seed: u64) -> SimConfig {
    SimConfig {
        seed,
        free_movement_start: None,
        ..Default::default()
    }
}

fn free_engine(config: SimConfig) -> PatrolEngine {
    let start = config.free_movement_start.unwrap_or_default();
    PatrolEngine::new(config, &FixedStart(start)).unwrap()
}

fn c(x: f64, y: f64) -> Coords {
    Coords::new(x, y)
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = PatrolEngine::new(path_config(12345), &HandcraftedPaths).unwrap();
    let mut engine_b = PatrolEngine::new(path_config(12345), &HandcraftedPaths).unwrap();

    for _ in 0..300 {
        let json_a = serde_json::to_string(&engine_a.tick()).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick()).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_different_seeds_place_different_obstacles() {
    let engine_a = PatrolEngine::new(path_config(111), &HandcraftedPaths).unwrap();
    let engine_b = PatrolEngine::new(path_config(222), &HandcraftedPaths).unwrap();
    assert_eq!(engine_a.obstacles().len(), 10);
    assert_ne!(engine_a.obstacles(), engine_b.obstacles());
}

// ---- Mobility ----

#[test]
fn test_will_reach_at_zero_distance() {
    let here = c(42.0, 17.0);
    assert!(mobility::will_reach_target(here, 0.0, here, &ctx(1.0)));
    assert!(mobility::will_reach_target(here, 5.0, c(47.0, 17.0), &ctx(1.0)));
    assert!(!mobility::will_reach_target(here, 5.0, c(47.1, 17.0), &ctx(1.0)));
}

#[test]
fn test_step_follows_path_and_cycles() {
    let mut state = SpatialState::at(c(0.0, 0.0));
    let mut motion = Motion {
        angle_deg: 0.0,
        speed: 5.0,
    };
    let mut waypoints = Waypoints::new(vec![c(0.0, 0.0), c(10.0, 0.0)]).unwrap();
    let ctx = ctx(1.0);

    // Sitting on waypoint 0: move on to waypoint 1 and head East.
    mobility::step(EntityId::unit(0), &mut state, &mut motion, &mut waypoints, &ctx, true);
    assert_eq!(waypoints.current_index(), 1);
    assert!((motion.angle_deg - 0.0).abs() < 1e-9);
    assert!((state.coords.x - 5.0).abs() < 1e-9);
    assert_eq!(state.previous_coords, c(0.0, 0.0));

    // Waypoint 1 is exactly one step away: wrap around to waypoint 0.
    mobility::step(EntityId::unit(0), &mut state, &mut motion, &mut waypoints, &ctx, true);
    assert_eq!(waypoints.current_index(), 0);
    assert!((motion.angle_deg - 180.0).abs() < 1e-9);
    assert!(state.coords.distance_to(&c(0.0, 0.0)) < 1e-9);
}

#[test]
fn test_single_waypoint_loiters() {
    let home = c(100.0, 100.0);
    let mut state = SpatialState::at(home);
    let mut motion = Motion {
        angle_deg: 0.0,
        speed: 5.0,
    };
    let mut waypoints = Waypoints::new(vec![home]).unwrap();
    let ctx = ctx(1.0);

    for _ in 0..50 {
        mobility::step(EntityId::unit(0), &mut state, &mut motion, &mut waypoints, &ctx, true);
        assert_eq!(waypoints.current_index(), 0);
        assert!(state.coords.distance_to(&home) <= 5.0 + 1e-9);
    }
}

#[test]
fn test_free_movement_keeps_heading() {
    let mut state = SpatialState::at(c(100.0, 100.0));
    let mut motion = Motion {
        angle_deg: 90.0,
        speed: 10.0,
    };
    let mut waypoints = Waypoints::new(vec![c(0.0, 0.0)]).unwrap();

    mobility::step(EntityId::unit(0), &mut state, &mut motion, &mut waypoints, &ctx(0.5), false);
    assert_eq!(motion.angle_deg, 90.0);
    assert!((state.coords.x - 100.0).abs() < 1e-9);
    assert!((state.coords.y - 105.0).abs() < 1e-9);
}

#[test]
fn test_step_clamps_at_wall() {
    let mut state = SpatialState::at(c(1495.0, 3.0));
    let mut motion = Motion {
        angle_deg: 315.0,
        speed: 100.0,
    };
    let mut waypoints = Waypoints::new(vec![c(0.0, 0.0)]).unwrap();

    mobility::step(EntityId::unit(0), &mut state, &mut motion, &mut waypoints, &ctx(1.0), false);
    assert_eq!(state.coords, c(1500.0, 0.0));
    assert_eq!(motion.speed, 100.0, "clamping leaves speed untouched");
}

#[test]
fn test_units_never_leave_area() {
    let config = SimConfig {
        unit_count: 3,
        duration_ticks: 400,
        ..Default::default()
    };
    let mut engine = free_engine(config);
    engine.queue_commands([
        UnitCommand::SetHeading {
            unit: 0,
            angle_deg: 45.0,
            speed: 400.0,
        },
        UnitCommand::SetHeading {
            unit: 1,
            angle_deg: 200.0,
            speed: 250.0,
        },
        UnitCommand::SetHeading {
            unit: 2,
            angle_deg: 91.0,
            speed: 1000.0,
        },
    ]);

    for _ in 0..400 {
        let snapshot = engine.tick();
        for unit in &snapshot.units {
            assert!(
                (0.0..=snapshot.width).contains(&unit.coords.x)
                    && (0.0..=snapshot.height).contains(&unit.coords.y),
                "{} left the area at {:?}",
                unit.id,
                unit.coords
            );
        }
    }
}

// ---- Collision ----

fn straddling_unit() -> (SpatialState, Waypoints) {
    let state = SpatialState {
        coords: c(50.0, 5.0),
        previous_coords: c(50.0, -5.0),
    };
    let waypoints = Waypoints::new(vec![c(10.0, 20.0), c(30.0, 30.0)]).unwrap();
    (state, waypoints)
}

#[test]
fn test_collision_respawns_at_first_waypoint() {
    let obstacles = [Obstacle::new(0.0, 0.0, 100.0, 0.0)];
    let (mut state, waypoints) = straddling_unit();
    let motion = Motion {
        angle_deg: 90.0,
        speed: 10.0,
    };

    assert!(collision::check(&mut state, &motion, &waypoints, &ctx(1.0), &obstacles));
    assert_eq!(state.coords, c(10.0, 20.0));
}

#[test]
fn test_collision_skips_obstacles_out_of_reach() {
    // The move crosses the obstacle, but the unit is farther from it than
    // one tick of travel, so the obstacle is never tested.
    let obstacles = [Obstacle::new(0.0, 0.0, 100.0, 0.0)];
    let (mut state, waypoints) = straddling_unit();
    let motion = Motion {
        angle_deg: 90.0,
        speed: 1.0,
    };

    assert!(!collision::check(&mut state, &motion, &waypoints, &ctx(1.0), &obstacles));
    assert_eq!(state.coords, c(50.0, 5.0));
}

#[test]
fn test_collision_near_miss() {
    let obstacles = [Obstacle::new(0.0, 0.0, 100.0, 0.0)];
    let mut state = SpatialState {
        coords: c(50.0, 0.5),
        previous_coords: c(50.0, 5.0),
    };
    let waypoints = Waypoints::new(vec![c(1.0, 1.0)]).unwrap();
    let motion = Motion {
        angle_deg: 270.0,
        speed: 10.0,
    };

    assert!(collision::check(&mut state, &motion, &waypoints, &ctx(1.0), &obstacles));
    assert_eq!(state.coords, c(1.0, 1.0));
}

#[test]
fn test_collision_first_obstacle_wins() {
    let obstacles = [
        Obstacle::new(500.0, 500.0, 600.0, 500.0),
        Obstacle::new(0.0, 0.0, 100.0, 0.0),
        Obstacle::new(0.0, 1.0, 100.0, 1.0),
    ];
    let (state, _) = straddling_unit();
    assert_eq!(collision::find_collision(&state, 10.0, &obstacles), Some(1));
}

#[test]
fn test_no_obstacles_is_noop() {
    let (mut state, waypoints) = straddling_unit();
    let motion = Motion {
        angle_deg: 0.0,
        speed: 1000.0,
    };
    assert!(!collision::check(&mut state, &motion, &waypoints, &ctx(1.0), &[]));
    assert_eq!(state.coords, c(50.0, 5.0));
}

#[test]
fn test_distance_obstacles() {
    let obstacles = [
        Obstacle::new(0.0, 0.0, 100.0, 0.0),
        Obstacle::new(200.0, 0.0, 200.0, 100.0),
    ];
    let d = collision::distance_obstacles(c(50.0, 30.0), &obstacles);
    assert!((d[0] - 30.0).abs() < 1e-9);
    assert!((d[1] - 150.0).abs() < 1e-9);
}

#[test]
fn test_engine_without_obstacles_never_resets() {
    let config = SimConfig {
        obstacle_count: 0,
        ..path_config(1)
    };
    let paths = InMemoryPaths::new()
        .with(0, vec![c(10.0, 20.0), c(50.0, 400.0)])
        .with(1, vec![c(900.0, 900.0)]);
    let mut engine = PatrolEngine::new(config, &paths).unwrap();
    assert!(engine.obstacles().is_empty());

    // Without obstacles nothing resets the unit.
    let entity = engine.entity_of(0).unwrap();
    {
        let mut state = engine.world_mut().get::<&mut SpatialState>(entity).unwrap();
        state.previous_coords = c(50.0, -5.0);
        state.coords = c(50.0, 5.0);
    }
    engine.tick();
    assert_ne!(engine.unit_state(0).unwrap().coords, c(10.0, 20.0));
}

#[test]
fn test_engine_checks_collision_before_moving() {
    let config = SimConfig {
        obstacle_count: 0,
        ..path_config(7)
    };
    let paths = InMemoryPaths::new()
        .with(0, vec![c(10.0, 20.0), c(10.0, 1000.0)])
        .with(1, vec![c(900.0, 900.0)]);
    let mut engine = PatrolEngine::new(config, &paths).unwrap();
    engine.set_obstacles(vec![Obstacle::new(0.0, 0.0, 100.0, 0.0)]);

    // Last move crossed the obstacle, 0.5 m past it; one tick reaches 0.75 m.
    let entity = engine.entity_of(0).unwrap();
    {
        let mut state = engine.world_mut().get::<&mut SpatialState>(entity).unwrap();
        state.previous_coords = c(50.0, -0.5);
        state.coords = c(50.0, 0.5);
    }
    engine.tick();

    // Respawned at the first waypoint, then moved one step from there.
    let state = engine.unit_state(0).unwrap();
    assert_eq!(state.previous_coords, c(10.0, 20.0));
    assert!((state.coords.x - 10.0).abs() < 1e-9);
    assert!((state.coords.y - 20.75).abs() < 1e-9);
}

// ---- Freshness ----

fn target(id: u32, last_visit_tick: u64, max_idleness: f64) -> Target {
    Target {
        last_visit_tick,
        ..Target::new(EntityId::target(id), c(0.0, 0.0), max_idleness)
    }
}

#[test]
fn test_age_and_residual() {
    let t = target(0, 0, 10.0);
    assert!((freshness::age_of_information(&t, 5, 1.0) - 5.0).abs() < 1e-10);
    assert!((freshness::residual_of_information(&t, 5, 1.0) - 0.5).abs() < 1e-10);
    // Past tolerance the residual goes negative.
    assert!((freshness::residual_of_information(&t, 15, 1.0) + 0.5).abs() < 1e-10);
}

#[test]
fn test_oldest_and_lowest_residual() {
    let targets = [target(0, 8, 100.0), target(1, 2, 100.0), target(2, 5, 4.0)];

    // Ages at tick 10: 2, 8, 5. Residuals: 0.98, 0.92, -0.25.
    assert_eq!(freshness::oldest(&targets, None, 10, 1.0).id, EntityId::target(1));
    assert_eq!(
        freshness::lowest_residual(&targets, None, 10, 1.0).id,
        EntityId::target(2)
    );
}

#[test]
fn test_oldest_tie_goes_to_first() {
    let targets = [target(0, 5, 10.0), target(1, 3, 10.0), target(2, 3, 10.0)];
    assert_eq!(
        freshness::oldest(&targets, Some(EntityId::target(0)), 10, 1.0).id,
        EntityId::target(1)
    );
}

#[test]
#[should_panic]
fn test_oldest_rejects_current_target() {
    let targets = [target(0, 0, 10.0), target(1, 3, 10.0)];
    freshness::oldest(&targets, Some(EntityId::target(0)), 10, 1.0);
}

#[test]
#[should_panic]
fn test_lowest_residual_rejects_empty_set() {
    freshness::lowest_residual(&[], None, 10, 1.0);
}

#[test]
fn test_engine_visit_resets_age() {
    let config = SimConfig {
        target_coords: vec![c(100.0, 100.0), c(200.0, 200.0)],
        ..Default::default()
    };
    let mut engine = free_engine(config);
    for _ in 0..10 {
        engine.tick();
    }
    engine.visit_target(1).unwrap();
    engine.tick();

    let snapshot = engine.snapshot();
    let dt = engine.config().tick_duration_secs;
    assert!((snapshot.targets[0].age_of_information - 11.0 * dt).abs() < 1e-9);
    assert!((snapshot.targets[1].age_of_information - dt).abs() < 1e-9);

    let oldest = engine.oldest_target(Some(EntityId::target(1))).unwrap();
    assert_eq!(oldest.id, EntityId::target(0));
    assert!(engine.oldest_target(None).is_some());

    assert!(matches!(
        engine.visit_target(7),
        Err(SimError::UnknownTarget(7))
    ));
}

#[test]
fn test_single_target_has_no_alternative() {
    let engine = free_engine(SimConfig::default());
    let only = engine.targets()[0].id;
    assert!(engine.lowest_residual_target(Some(only)).is_none());
}

// ---- Construction ----

#[test]
fn test_empty_path_is_rejected() {
    let paths = InMemoryPaths::new().with(0, Vec::new()).with(1, vec![c(1.0, 1.0)]);
    let result = PatrolEngine::new(path_config(0), &paths);
    assert!(matches!(result, Err(SimError::EmptyPath { unit: 0 })));
}

#[test]
fn test_missing_path_is_rejected() {
    let paths = InMemoryPaths::new().with(0, vec![c(1.0, 1.0)]);
    let result = PatrolEngine::new(path_config(0), &paths);
    assert!(matches!(
        result,
        Err(SimError::Path(PathError::MissingUnit(1)))
    ));
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = SimConfig {
        unit_count: 0,
        ..Default::default()
    };
    assert!(matches!(
        PatrolEngine::new(config, &FixedStart(c(0.0, 0.0))),
        Err(SimError::Config(_))
    ));
}

#[test]
fn test_free_units_start_at_rest() {
    let engine = free_engine(SimConfig::default());
    for unit in 0..engine.unit_count() as u32 {
        assert_eq!(engine.unit_motion(unit).unwrap().speed, 0.0);
        assert_eq!(engine.unit_state(unit).unwrap().coords, c(750.0, 1500.0));
    }
    assert_eq!(engine.selected_unit(), Some(0));
}

// ---- Commands ----

#[test]
fn test_steering_commands() {
    let mut engine = free_engine(SimConfig::default());

    engine.queue_commands([UnitCommand::SpeedUp, UnitCommand::TurnCounterClockwise]);
    engine.tick();
    let motion = engine.unit_motion(0).unwrap();
    assert_eq!(motion.speed, 5.0);
    assert_eq!(motion.angle_deg, 45.0);

    engine.queue_commands([
        UnitCommand::TurnClockwise,
        UnitCommand::TurnClockwise,
        UnitCommand::SlowDown,
        UnitCommand::SlowDown,
    ]);
    engine.tick();
    let motion = engine.unit_motion(0).unwrap();
    assert_eq!(motion.angle_deg, 315.0);
    assert_eq!(motion.speed, 0.0, "speed never drops below zero");

    // The other unit was never selected.
    assert_eq!(engine.unit_motion(1).unwrap().speed, 0.0);
}

#[test]
fn test_select_nearest_within_tolerance() {
    let paths = InMemoryPaths::new()
        .with(0, vec![c(100.0, 100.0)])
        .with(1, vec![c(500.0, 500.0)]);
    let mut engine = PatrolEngine::new(SimConfig::default(), &paths).unwrap();

    engine.queue_command(UnitCommand::select_at(490.0, 510.0));
    let snapshot = engine.tick();
    assert_eq!(engine.selected_unit(), Some(1));
    assert!(snapshot.units[1].selected && !snapshot.units[0].selected);

    // Too far from every unit: the selection stays.
    engine.queue_command(UnitCommand::SelectNearest {
        x: 1000.0,
        y: 1000.0,
        tolerance: 40.0,
    });
    engine.tick();
    assert_eq!(engine.selected_unit(), Some(1));

    engine.queue_command(UnitCommand::SelectUnit { unit: 9 });
    engine.tick();
    assert_eq!(engine.selected_unit(), Some(1));
}

#[test]
fn test_set_heading_unknown_unit() {
    let mut engine = free_engine(SimConfig::default());
    assert!(matches!(
        engine.set_heading(5, 0.0, 1.0),
        Err(SimError::UnknownUnit(5))
    ));
    engine.set_heading(1, -90.0, 3.0).unwrap();
    assert_eq!(engine.unit_motion(1).unwrap().angle_deg, 270.0);
}

// ---- Grid queries ----

#[test]
fn test_current_cell() {
    let engine = free_engine(SimConfig::default());
    // (750, 1500) with 500 m cells on a 3-column grid.
    let (index, cell) = engine.current_cell(0).unwrap().unwrap();
    assert_eq!((cell.cx, cell.cy), (1, 3));
    assert_eq!(index, 10);
}

#[test]
fn test_grid_disabled_skips_cells() {
    let config = SimConfig {
        grid_cells: 0,
        ..Default::default()
    };
    let engine = free_engine(config);
    assert!(engine.current_cell(0).unwrap().is_none());
    assert!(engine.traversed_cells(0).unwrap().is_none());
}

#[test]
fn test_traversed_cells_follow_last_move() {
    let config = SimConfig {
        obstacle_count: 0,
        grid_cells: 15,
        ..Default::default()
    };
    let paths = InMemoryPaths::new()
        .with(0, vec![c(150.0, 150.0)])
        .with(1, vec![c(50.0, 50.0)]);
    let mut engine = PatrolEngine::new(config, &paths).unwrap();
    engine
        .set_heading(0, 0.0, 200.0 / engine.config().tick_duration_secs)
        .unwrap();
    engine.tick();

    let state = engine.unit_state(0).unwrap();
    assert!((state.coords.x - 350.0).abs() < 1e-6);
    let cells = engine.traversed_cells(0).unwrap().unwrap();
    let columns: Vec<i64> = cells.iter().map(|cell| cell.cx).collect();
    assert_eq!(columns, vec![1, 2, 3]);
    assert!(cells.iter().all(|cell| cell.cy == 1));
}

// ---- Events ----

#[test]
fn test_event_generator_schedule() {
    let generator = EventGenerator::new(0, 10, 5);
    assert!(!generator.is_due(0));
    assert!(!generator.is_due(5));
    assert!(generator.is_due(10));
    assert!(generator.is_due(30));
    assert!(!EventGenerator::new(0, 0, 5).is_due(10));
}

#[test]
fn test_events_and_packets() {
    let config = SimConfig {
        event_interval_ticks: 10,
        event_ttl_ticks: 30,
        max_buffer: 5,
        ..Default::default()
    };
    let mut engine = free_engine(config);

    // Ticks 0 through 30 run: events at 10, 20 and 30.
    let mut snapshot = engine.snapshot();
    for _ in 0..31 {
        snapshot = engine.tick();
    }
    assert_eq!(engine.valid_events(31).len(), 3);
    assert_eq!(snapshot.valid_events.len(), 3);
    let stored: usize = snapshot.units.iter().map(|u| u.buffer_len).sum();
    assert_eq!(stored, 3);

    // The first event expires at tick 40.
    assert_eq!(engine.expired_events(39).len(), 0);
    assert_eq!(engine.expired_events(40).len(), 1);
    assert_eq!(engine.valid_events(40).len(), 2);

    // Its packet is dropped when tick 40 runs.
    for _ in 31..=40 {
        snapshot = engine.tick();
    }
    let stored: usize = snapshot.units.iter().map(|u| u.buffer_len).sum();
    assert_eq!(stored, 3, "packet of event 10 dropped, packet of event 40 stored");
    assert_eq!(engine.valid_events(engine.time().tick).len(), 3);
}

#[test]
fn test_full_buffer_refuses_packets() {
    let config = SimConfig {
        event_interval_ticks: 1,
        max_buffer: 0,
        ..Default::default()
    };
    let mut engine = free_engine(config);
    let mut snapshot = engine.snapshot();
    for _ in 0..20 {
        snapshot = engine.tick();
    }
    assert_eq!(engine.valid_events(engine.time().tick).len(), 19);
    assert!(snapshot.units.iter().all(|u| u.buffer_len == 0));
}

// ---- Run lifecycle ----

#[test]
fn test_run_stops_at_duration() {
    let config = SimConfig {
        duration_ticks: 5,
        ..Default::default()
    };
    let mut engine = free_engine(config);
    for _ in 0..10 {
        engine.tick();
    }
    assert!(engine.is_finished());
    assert_eq!(engine.time().tick, 5);
    assert!((engine.time().elapsed_secs - 5.0 * 0.150).abs() < 1e-10);
}

#[test]
fn test_snapshot_contents() {
    let mut engine = PatrolEngine::new(path_config(3), &HandcraftedPaths).unwrap();
    let snapshot = engine.tick();

    assert_eq!(snapshot.time.tick, 1);
    assert_eq!(snapshot.units.len(), 2);
    assert_eq!(snapshot.base_stations.len(), 1);
    assert_eq!(snapshot.base_stations[0].coords, c(750.0, 0.0));
    assert_eq!(snapshot.obstacles.len(), 10);
    assert_eq!(snapshot.targets.len(), 1);
    assert_eq!(snapshot.grid_cell_size, 500.0);
    assert!(snapshot.units[0].selected);
    assert_eq!(snapshot.units[1].id, EntityId::unit(1));
    assert!(snapshot.units.iter().all(|u| u.speed == 5.0));
    assert!(snapshot.units.iter().all(|u| u.max_energy == 100.0));
}

#[test]
fn test_return_target_uses_base_station_channel() {
    let paths = InMemoryPaths::new()
        .with(0, vec![c(100.0, 900.0)])
        .with(1, vec![c(750.0, 900.0)]);
    let engine = PatrolEngine::new(SimConfig::default(), &paths).unwrap();
    assert_eq!(engine.return_target(0).unwrap(), c(750.0, 900.0));
    assert_eq!(engine.return_target(1).unwrap(), c(750.0, 0.0));
}

//! Simulation engine for a patrol run.
//!
//! `PatrolEngine` owns the hecs ECS world (units and base stations), the
//! obstacle field, the targets and every generated event. It applies queued
//! commands, runs all systems, and produces `EnvironmentSnapshot`s.
//! Completely headless and deterministic for a given seed.

use std::collections::VecDeque;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use patrol_core::commands::UnitCommand;
use patrol_core::components::{Event, Motion, Obstacle, SpatialState, Target, Waypoints};
use patrol_core::config::SimConfig;
use patrol_core::entity::{EntityId, EntityKind, IdAllocator};
use patrol_core::state::EnvironmentSnapshot;
use patrol_core::types::{Coords, SimContext, SimTime};
use patrol_grid::{cells_in_travel, coord_to_cell, GridCell};

use crate::depot::DepotChannel;
use crate::error::SimError;
use crate::paths::PathProvider;
use crate::systems;
use crate::systems::events::EventGenerator;
use crate::systems::snapshot::SnapshotInputs;
use crate::world_setup;

/// The simulation engine. Owns the ECS world and all run state.
pub struct PatrolEngine {
    config: SimConfig,
    world: World,
    time: SimTime,
    ids: IdAllocator,
    /// Units in spawn order, which is also the per-tick processing order.
    units: Vec<Entity>,
    base_stations: Vec<Entity>,
    obstacles: Vec<Obstacle>,
    targets: Vec<Target>,
    /// Every event generated so far, expired ones included.
    events: Vec<Event>,
    event_generator: EventGenerator,
    /// Unit receiving steering commands.
    selected: Option<Entity>,
    command_queue: VecDeque<UnitCommand>,
}

impl PatrolEngine {
    /// Build the area: obstacles, targets, the base station, then one unit
    /// per index `0..unit_count` with the path `paths` gives for it.
    pub fn new(config: SimConfig, paths: &dyn PathProvider) -> Result<Self, SimError> {
        config.validate()?;

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut world = World::new();
        let mut ids = IdAllocator::new();

        let obstacles = world_setup::spawn_obstacles(
            &mut rng,
            config.bounds(),
            config.obstacle_count,
            config.orthogonal_obstacles,
        );
        let targets = world_setup::spawn_targets(
            &mut ids,
            &config.target_coords,
            config.simulation_duration_secs(),
        );

        let station = ids.allocate(EntityKind::BaseStation);
        let base_stations = vec![world_setup::spawn_base_station(&mut world, station, &config)];
        info!(count = base_stations.len(), "added base stations");

        let mut units = Vec::with_capacity(config.unit_count);
        for index in 0..config.unit_count as u32 {
            let waypoints = Waypoints::new(paths.path(index)?)
                .ok_or(SimError::EmptyPath { unit: index })?;
            let id = ids.allocate(EntityKind::Unit);
            units.push(world_setup::spawn_unit(
                &mut world, id, waypoints, station, &config,
            ));
        }
        info!(
            count = units.len(),
            free_movement = config.is_free_movement(),
            "added units"
        );

        let event_generator = EventGenerator::new(
            config.seed,
            config.event_interval_ticks,
            config.event_ttl_ticks,
        );
        info!(seed = config.seed, name = %config.simulation_name(), "engine ready");

        Ok(Self {
            world,
            time: SimTime::default(),
            ids,
            selected: units.first().copied(),
            units,
            base_stations,
            obstacles,
            targets,
            events: Vec::new(),
            event_generator,
            command_queue: VecDeque::new(),
            config,
        })
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: UnitCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = UnitCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    ///
    /// Once the run is finished this only returns the final snapshot.
    pub fn tick(&mut self) -> EnvironmentSnapshot {
        if !self.is_finished() {
            self.process_commands();
            self.run_systems();
            self.time.advance(self.config.tick_duration_secs);
        }
        self.snapshot()
    }

    /// Snapshot of the current state, without advancing.
    pub fn snapshot(&self) -> EnvironmentSnapshot {
        systems::snapshot::build_snapshot(
            &self.world,
            &SnapshotInputs {
                time: self.time,
                tick_duration_secs: self.config.tick_duration_secs,
                bounds: self.config.bounds(),
                grid_cell_size: self.config.grid_cell_size(),
                units: &self.units,
                base_stations: &self.base_stations,
                selected: self.selected,
                obstacles: &self.obstacles,
                targets: &self.targets,
                events: &self.events,
            },
        )
    }

    /// Whether the configured number of ticks has run.
    pub fn is_finished(&self) -> bool {
        self.time.tick >= self.config.duration_ticks
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    /// Index of the unit receiving steering commands.
    pub fn selected_unit(&self) -> Option<u32> {
        let selected = self.selected?;
        self.units
            .iter()
            .position(|&e| e == selected)
            .map(|i| i as u32)
    }

    /// Position of a unit, with the one it held before its last move.
    pub fn unit_state(&self, unit: u32) -> Result<SpatialState, SimError> {
        let entity = self.unit_entity(unit)?;
        self.world
            .get::<&SpatialState>(entity)
            .map(|s| *s)
            .map_err(|_| SimError::UnknownUnit(unit))
    }

    /// Heading and speed of a unit.
    pub fn unit_motion(&self, unit: u32) -> Result<Motion, SimError> {
        let entity = self.unit_entity(unit)?;
        self.world
            .get::<&Motion>(entity)
            .map(|m| *m)
            .map_err(|_| SimError::UnknownUnit(unit))
    }

    /// Overwrite a unit's heading (normalized into `[0, 360)`) and speed.
    ///
    /// Path-following units recompute their heading on their next move, so
    /// only the speed sticks for them.
    pub fn set_heading(&mut self, unit: u32, angle_deg: f64, speed: f64) -> Result<(), SimError> {
        let entity = self.unit_entity(unit)?;
        let mut motion = self
            .world
            .get::<&mut Motion>(entity)
            .map_err(|_| SimError::UnknownUnit(unit))?;
        motion.angle_deg = angle_deg.rem_euclid(360.0);
        motion.speed = speed.max(0.0);
        Ok(())
    }

    /// Grid cell holding a unit, or `None` when the grid is disabled.
    ///
    /// A unit clamped onto the right wall reports column `columns`, whose
    /// linear index repeats the first cell of the next row.
    pub fn current_cell(&self, unit: u32) -> Result<Option<(i64, GridCell)>, SimError> {
        let state = self.unit_state(unit)?;
        let cell_size = self.config.grid_cell_size();
        if cell_size <= 0.0 {
            return Ok(None);
        }
        Ok(Some(coord_to_cell(
            cell_size,
            self.config.width,
            state.coords.x,
            state.coords.y,
        )))
    }

    /// Grid cells crossed by a unit's last move, or `None` when the grid is disabled.
    pub fn traversed_cells(&self, unit: u32) -> Result<Option<Vec<GridCell>>, SimError> {
        let state = self.unit_state(unit)?;
        let cell_size = self.config.grid_cell_size();
        if cell_size <= 0.0 {
            return Ok(None);
        }
        Ok(Some(cells_in_travel(
            cell_size,
            self.config.width,
            state.previous_coords,
            state.coords,
        )))
    }

    /// Distance from a unit to every obstacle, in obstacle order.
    pub fn distance_obstacles(&self, unit: u32) -> Result<Vec<f64>, SimError> {
        let state = self.unit_state(unit)?;
        Ok(systems::collision::distance_obstacles(
            state.coords,
            &self.obstacles,
        ))
    }

    /// Events still alive at `tick`.
    pub fn valid_events(&self, tick: u64) -> Vec<Event> {
        self.events
            .iter()
            .filter(|e| !e.is_expired(tick))
            .copied()
            .collect()
    }

    /// Events expired at `tick`.
    pub fn expired_events(&self, tick: u64) -> Vec<Event> {
        self.events
            .iter()
            .filter(|e| e.is_expired(tick))
            .copied()
            .collect()
    }

    /// Record a visit to a target at the current tick.
    pub fn visit_target(&mut self, target: u32) -> Result<(), SimError> {
        let now = self.time.tick;
        let target = self
            .targets
            .iter_mut()
            .find(|t| t.id == EntityId::target(target))
            .ok_or(SimError::UnknownTarget(target))?;
        target.last_visit_tick = now;
        debug!(target = %target.id, tick = now, "target visited");
        Ok(())
    }

    /// Target with the largest age of information other than `current`.
    /// `None` when no other target exists.
    pub fn oldest_target(&self, current: Option<EntityId>) -> Option<&Target> {
        let candidates = self.candidate_targets(current);
        if candidates.is_empty() {
            return None;
        }
        let id = systems::freshness::oldest(
            &candidates,
            current,
            self.time.tick,
            self.config.tick_duration_secs,
        )
        .id;
        self.targets.iter().find(|t| t.id == id)
    }

    /// Target with the lowest residual of information other than `current`.
    /// `None` when no other target exists.
    pub fn lowest_residual_target(&self, current: Option<EntityId>) -> Option<&Target> {
        let candidates = self.candidate_targets(current);
        if candidates.is_empty() {
            return None;
        }
        let id = systems::freshness::lowest_residual(
            &candidates,
            current,
            self.time.tick,
            self.config.tick_duration_secs,
        )
        .id;
        self.targets.iter().find(|t| t.id == id)
    }

    /// Return channel through the base station.
    pub fn depot_channel(&self) -> DepotChannel {
        DepotChannel::through(self.config.base_station_coords)
    }

    /// Next waypoint for a unit returning to the base station.
    pub fn return_target(&self, unit: u32) -> Result<Coords, SimError> {
        let state = self.unit_state(unit)?;
        Ok(self.depot_channel().next_target(state.coords))
    }

    /// Get a mutable reference to the ECS world (for tests that place units by hand).
    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Replace the seeded obstacle field (for tests that need a known layout).
    #[cfg(test)]
    pub fn set_obstacles(&mut self, obstacles: Vec<Obstacle>) {
        self.obstacles = obstacles;
    }

    /// Entity behind a unit index (for tests).
    #[cfg(test)]
    pub fn entity_of(&self, unit: u32) -> Option<Entity> {
        self.units.get(unit as usize).copied()
    }

    fn unit_entity(&self, unit: u32) -> Result<Entity, SimError> {
        self.units
            .get(unit as usize)
            .copied()
            .ok_or(SimError::UnknownUnit(unit))
    }

    fn candidate_targets(&self, current: Option<EntityId>) -> Vec<Target> {
        self.targets
            .iter()
            .filter(|t| Some(t.id) != current)
            .copied()
            .collect()
    }

    fn context(&self) -> SimContext {
        SimContext {
            time: self.time,
            tick_duration_secs: self.config.tick_duration_secs,
            bounds: self.config.bounds(),
        }
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single command.
    fn handle_command(&mut self, command: UnitCommand) {
        match command {
            UnitCommand::SelectUnit { unit } => match self.unit_entity(unit) {
                Ok(entity) => self.selected = Some(entity),
                Err(err) => debug!(%err, "selection ignored"),
            },
            UnitCommand::SelectNearest { x, y, tolerance } => {
                let point = Coords::new(x, y);
                let nearest = self
                    .units
                    .iter()
                    .filter_map(|&e| {
                        let state = self.world.get::<&SpatialState>(e).ok()?;
                        Some((e, state.coords.distance_to(&point)))
                    })
                    .min_by(|a, b| a.1.total_cmp(&b.1));
                if let Some((entity, distance)) = nearest {
                    if distance < tolerance {
                        self.selected = Some(entity);
                    }
                }
            }
            UnitCommand::TurnClockwise => {
                let step = self.config.angle_increment_deg;
                self.steer_selected(|m| m.angle_deg = (m.angle_deg - step).rem_euclid(360.0));
            }
            UnitCommand::TurnCounterClockwise => {
                let step = self.config.angle_increment_deg;
                self.steer_selected(|m| m.angle_deg = (m.angle_deg + step).rem_euclid(360.0));
            }
            UnitCommand::SpeedUp => {
                let step = self.config.speed_increment;
                self.steer_selected(|m| m.speed += step);
            }
            UnitCommand::SlowDown => {
                let step = self.config.speed_increment;
                self.steer_selected(|m| m.speed = (m.speed - step).max(0.0));
            }
            UnitCommand::SetHeading {
                unit,
                angle_deg,
                speed,
            } => {
                if let Err(err) = self.set_heading(unit, angle_deg, speed) {
                    debug!(%err, "heading change ignored");
                }
            }
        }
    }

    /// Apply `f` to the selected unit's motion, if any unit is selected.
    fn steer_selected(&mut self, f: impl FnOnce(&mut Motion)) {
        let Some(entity) = self.selected else {
            return;
        };
        if let Ok(mut motion) = self.world.get::<&mut Motion>(entity) {
            f(&mut *motion);
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let ctx = self.context();
        let path_following = !self.config.is_free_movement();

        // 1. Per unit, in spawn order: collision check, then move
        for &entity in &self.units {
            systems::collision::run_unit(&mut self.world, entity, &ctx, &self.obstacles);
            systems::mobility::run_unit(&mut self.world, entity, &ctx, path_following);
        }
        // 2. Packet expiry
        systems::events::drop_expired_packets(&mut self.world, self.time.tick);
        // 3. Event generation
        self.event_generator.run(
            &mut self.world,
            &self.units,
            &mut self.ids,
            &mut self.events,
            self.time.tick,
        );
    }
}

//! SimulationModel - owns the world and drives it one tick at a time.

use crate::config::ModelConfig;
use crate::entity::{Activation, Entity, WorldView};
use crate::grid::Grid;
use crate::metrics::DataCollector;
use crate::scheduler::Scheduler;

use cleaner_env::{Coord, EntityId, EntityKind, SimContext, SimError, SimResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Render-ready view of one live entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityView {
    pub id: EntityId,
    pub kind: EntityKind,
    pub coord: Coord,
}

/// Tally of what the activations of the most recent tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Dirty markers removed
    pub cleaned: u64,

    /// Cleaners that moved
    pub moved: u64,

    /// Cleaners with nowhere to go
    pub stuck: u64,
}

/// The cleaner world.
///
/// Holds the grid, the scheduler, the entity registry, the counters and the
/// single seeded random source every draw in the run comes from.
#[derive(Debug)]
pub struct SimulationModel {
    config: ModelConfig,
    ctx: SimContext,
    grid: Grid,
    scheduler: Scheduler,
    entities: BTreeMap<EntityId, Entity>,
    collector: DataCollector,

    running: bool,
    dirty_cells: u64,
    total_agent_movements: u64,
    clean_fraction: f64,

    /// Completed calls to `step()`
    tick: u64,
    last_outcome: TickOutcome,
    next_id: u64,
}

impl SimulationModel {
    /// Builds a world with randomly placed dirty markers.
    ///
    /// `floor(W * H * dirty_fraction)` markers go on distinct empty cells,
    /// chosen by rejection sampling. A request that would fill every cell is
    /// refused with `DegenerateInit` instead of sampling forever.
    pub fn new(config: ModelConfig, seed: u64) -> SimResult<Self> {
        Self::with_context(config, SimContext::new(seed))
    }

    /// Same as [`SimulationModel::new`] with an explicit random source.
    pub fn with_context(config: ModelConfig, ctx: SimContext) -> SimResult<Self> {
        config.validate()?;

        let requested = config.dirty_count();
        let cells = config.cell_count();
        if requested > 0 && requested >= cells {
            return Err(SimError::DegenerateInit { requested, cells });
        }

        let mut model = Self::empty(config, ctx);
        for _ in 0..requested {
            let coord = model.sample_empty_cell();
            model.spawn(Entity::dirty_marker, coord)?;
        }
        model.dirty_cells = requested;
        model.spawn_cleaners()?;
        model.refresh();

        debug!(
            "initialized {}x{} world: {} dirty, {} cleaners (seed={})",
            model.config.width,
            model.config.height,
            model.dirty_cells,
            model.config.agent_count,
            model.ctx.seed()
        );
        Ok(model)
    }

    /// Builds a world with dirty markers on exactly the given cells.
    ///
    /// `dirty_fraction` is ignored. Cells may repeat, which stacks several
    /// markers on one cell, but there can be no more markers than cells.
    pub fn from_layout(config: ModelConfig, seed: u64, dirty: &[Coord]) -> SimResult<Self> {
        config.validate()?;

        let requested = dirty.len() as u64;
        let cells = config.cell_count();
        if requested > cells {
            return Err(SimError::DegenerateInit { requested, cells });
        }

        let mut model = Self::empty(config, SimContext::new(seed));
        for &coord in dirty {
            model.spawn(Entity::dirty_marker, coord)?;
        }
        model.dirty_cells = requested;
        model.spawn_cleaners()?;
        model.refresh();
        Ok(model)
    }

    fn empty(config: ModelConfig, ctx: SimContext) -> Self {
        let grid = Grid::new(config.width, config.height);
        Self {
            config,
            ctx,
            grid,
            scheduler: Scheduler::new(),
            entities: BTreeMap::new(),
            collector: DataCollector::new(),
            running: false,
            dirty_cells: 0,
            total_agent_movements: 0,
            clean_fraction: 1.0,
            tick: 0,
            last_outcome: TickOutcome::default(),
            next_id: 0,
        }
    }

    fn sample_empty_cell(&mut self) -> Coord {
        let width = u64::from(self.config.width);
        let height = u64::from(self.config.height);
        loop {
            let x = self.ctx.below(width) as i64;
            let y = self.ctx.below(height) as i64;
            let coord = Coord::new(x, y);
            if self.grid.is_empty(coord) {
                return coord;
            }
        }
    }

    fn spawn(&mut self, make: fn(EntityId) -> Entity, coord: Coord) -> SimResult<EntityId> {
        let id = EntityId(self.next_id);
        self.grid.place(id, coord)?;
        self.next_id += 1;
        self.scheduler.add(id);
        self.entities.insert(id, make(id));
        Ok(id)
    }

    fn spawn_cleaners(&mut self) -> SimResult<()> {
        if self.config.agent_count == 0 {
            return Ok(());
        }
        let start = self
            .config
            .start_cell
            .resolve(self.config.width, self.config.height);
        for _ in 0..self.config.agent_count {
            self.spawn(Entity::cleaner, start)?;
        }
        Ok(())
    }

    /// Recomputes the derived clean fraction and the running flag.
    fn refresh(&mut self) {
        let cells = self.config.cell_count() as f64;
        self.clean_fraction = (cells - self.dirty_cells as f64) / cells;
        self.running = self.dirty_cells > 0;
    }

    /// Advances the simulation by one tick.
    ///
    /// Refreshes the derived counters, records the tick's reporting snapshot,
    /// then activates every scheduled entity once in a fresh random order.
    /// Entities removed earlier in the pass are skipped.
    ///
    /// Calling this after the world is clean is fine: nothing is cleaned but
    /// the cleaners keep wandering.
    pub fn step(&mut self) -> SimResult<()> {
        self.refresh();
        self.collector
            .collect(self.total_agent_movements, self.clean_fraction);

        let mut outcome = TickOutcome::default();
        let order = self.scheduler.activation_order(&mut self.ctx);

        for id in order {
            if !self.scheduler.contains(id) {
                continue;
            }
            let entity = *self
                .entities
                .get(&id)
                .ok_or(SimError::UnknownEntity(id))?;

            let activation = {
                let mut world = WorldView {
                    grid: &mut self.grid,
                    scheduler: &mut self.scheduler,
                    entities: &self.entities,
                    ctx: &mut self.ctx,
                };
                entity.behavior().activate(&mut world)?
            };

            match activation {
                Activation::Idle => {}
                Activation::Cleaned { marker, at } => {
                    self.entities.remove(&marker);
                    self.dirty_cells = self
                        .dirty_cells
                        .checked_sub(1)
                        .ok_or(SimError::UnknownEntity(marker))?;
                    outcome.cleaned += 1;
                    debug!(
                        "tick {}: {} cleaned {} at {} ({} left)",
                        self.tick, id, marker, at, self.dirty_cells
                    );
                }
                Activation::Moved { .. } => {
                    self.total_agent_movements += 1;
                    outcome.moved += 1;
                }
                Activation::Stuck { .. } => {
                    outcome.stuck += 1;
                }
            }
        }

        self.last_outcome = outcome;
        self.tick += 1;
        Ok(())
    }

    /// True while dirty markers remained at the last refresh.
    pub fn running(&self) -> bool {
        self.running
    }

    /// Live dirty marker count.
    pub fn dirty_cells(&self) -> u64 {
        self.dirty_cells
    }

    /// Clean fraction as of the last refresh.
    pub fn clean_fraction(&self) -> f64 {
        self.clean_fraction
    }

    pub fn total_agent_movements(&self) -> u64 {
        self.total_agent_movements
    }

    /// Number of completed ticks.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// True once the driver should stop: clean, or out of tick budget.
    pub fn is_finished(&self) -> bool {
        !self.running || self.tick >= self.config.tick_budget
    }

    pub fn last_outcome(&self) -> TickOutcome {
        self.last_outcome
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.ctx.seed()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn collector(&self) -> &DataCollector {
        &self.collector
    }

    /// Every live entity with its kind and cell, in id order.
    pub fn entities(&self) -> impl Iterator<Item = EntityView> + '_ {
        self.entities.values().filter_map(|entity| {
            self.grid.position_of(entity.id()).map(|coord| EntityView {
                id: entity.id(),
                kind: entity.kind(),
                coord,
            })
        })
    }

    /// Cells currently holding at least one dirty marker.
    pub fn dirty_positions(&self) -> Vec<Coord> {
        self.positions_of(EntityKind::DirtyMarker)
    }

    /// Cells of every cleaner, one entry per cleaner.
    pub fn cleaner_positions(&self) -> Vec<Coord> {
        self.positions_of(EntityKind::Cleaner)
    }

    fn positions_of(&self, kind: EntityKind) -> Vec<Coord> {
        self.entities()
            .filter(|view| view.kind == kind)
            .map(|view| view.coord)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StartCell;
    use std::collections::HashSet;

    #[test]
    fn test_model_creation() {
        let model = SimulationModel::new(ModelConfig::default(), 42).unwrap();

        assert_eq!(model.dirty_cells(), 125);
        assert!(model.running());
        assert_eq!(model.tick(), 0);
        assert_eq!(model.total_agent_movements(), 0);
        assert_eq!(model.cleaner_positions(), vec![Coord::new(24, 24); 10]);
        assert_eq!(model.scheduler().len(), 135);
    }

    #[test]
    fn test_markers_on_distinct_cells() {
        let config = ModelConfig::new(10, 10, 3, 0.5, 10);
        let model = SimulationModel::new(config, 7).unwrap();

        let cells: HashSet<Coord> = model.dirty_positions().into_iter().collect();
        assert_eq!(cells.len(), 50);
        assert_eq!(model.dirty_cells(), 50);
    }

    #[test]
    fn test_degenerate_init() {
        let config = ModelConfig::new(2, 2, 1, 1.0, 10);
        assert_eq!(
            SimulationModel::new(config, 1).unwrap_err(),
            SimError::DegenerateInit {
                requested: 4,
                cells: 4
            }
        );
    }

    #[test]
    fn test_mirrored_start_out_of_bounds() {
        let config = ModelConfig::new(6, 3, 2, 0.1, 10);
        let err = SimulationModel::new(config.clone(), 1).unwrap_err();
        assert!(matches!(err, SimError::OutOfBounds { .. }));

        let model = SimulationModel::new(config.with_start_cell(StartCell::FarCorner), 1).unwrap();
        assert_eq!(model.cleaner_positions(), vec![Coord::new(5, 2); 2]);
    }

    #[test]
    fn test_step_records_before_acting() {
        let config = ModelConfig::new(5, 5, 1, 0.0, 10);
        let mut model = SimulationModel::new(config, 3).unwrap();

        model.step().unwrap();
        model.step().unwrap();

        let records = model.collector().records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].agent_movements, 0);
        assert_eq!(records[1].agent_movements, 1);
        assert_eq!(model.total_agent_movements(), 2);
    }

    #[test]
    fn test_clean_event_updates_counters() {
        let config = ModelConfig::new(3, 3, 1, 0.0, 10).with_start_cell(StartCell::FarCorner);
        let mut model = SimulationModel::from_layout(config, 5, &[Coord::new(2, 2)]).unwrap();

        assert_eq!(model.dirty_cells(), 1);
        assert!(model.running());

        model.step().unwrap();
        assert_eq!(model.dirty_cells(), 0);
        assert_eq!(model.total_agent_movements(), 0);
        assert_eq!(model.last_outcome().cleaned, 1);
        // Flag is recomputed at the start of the next step
        assert!(model.running());

        model.step().unwrap();
        assert!(!model.running());
        assert_eq!(model.clean_fraction(), 1.0);
        assert_eq!(model.total_agent_movements(), 1);
        assert_eq!(model.entities().count(), 1);
    }

    #[test]
    fn test_layout_out_of_bounds() {
        let config = ModelConfig::new(3, 3, 1, 0.0, 10);
        let err = SimulationModel::from_layout(config, 5, &[Coord::new(3, 3)]).unwrap_err();
        assert!(matches!(err, SimError::OutOfBounds { .. }));
    }

    #[test]
    fn test_is_finished_on_budget() {
        let config = ModelConfig::new(4, 4, 1, 0.5, 3);
        let mut model = SimulationModel::new(config, 11).unwrap();

        while !model.is_finished() {
            model.step().unwrap();
        }
        assert!(model.tick() <= 3);
    }

    #[test]
    fn test_same_seed_same_run() {
        let config = ModelConfig::new(8, 8, 4, 0.25, 50);
        let mut a = SimulationModel::new(config.clone(), 2024).unwrap();
        let mut b = SimulationModel::new(config, 2024).unwrap();

        for _ in 0..50 {
            a.step().unwrap();
            b.step().unwrap();
        }
        assert_eq!(a.entities().collect::<Vec<_>>(), b.entities().collect::<Vec<_>>());
        assert_eq!(a.collector().records(), b.collector().records());
    }
}

//! Entities and their per-tick behaviour.
//!
//! An entity is a tagged variant. Each variant exposes the `Behavior`
//! capability; the model invokes the capability and never inspects the
//! concrete type to decide what an entity does.

use crate::grid::Grid;
use crate::scheduler::Scheduler;

use cleaner_env::{Coord, EntityId, EntityKind, SimContext, SimError, SimResult};
use std::collections::BTreeMap;
use tracing::trace;

/// What a single activation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// No effect (inert entities).
    Idle,

    /// A dirty marker was removed from the grid and the scheduler.
    Cleaned { marker: EntityId, at: Coord },

    /// The agent relocated to a neighbouring cell.
    Moved { from: Coord, to: Coord },

    /// No neighbour to move to (1x1 grid); nothing changed.
    Stuck { at: Coord },
}

/// Mutable view of the world handed to an entity during its own turn.
pub struct WorldView<'a> {
    pub grid: &'a mut Grid,
    pub scheduler: &'a mut Scheduler,
    pub entities: &'a BTreeMap<EntityId, Entity>,
    pub ctx: &'a mut SimContext,
}

impl WorldView<'_> {
    /// Kind of a registered entity.
    pub fn kind_of(&self, id: EntityId) -> Option<EntityKind> {
        self.entities.get(&id).map(Entity::kind)
    }
}

/// Per-tick behaviour capability.
pub trait Behavior {
    /// Runs one activation to completion.
    fn activate(&self, world: &mut WorldView<'_>) -> SimResult<Activation>;
}

/// Passive marker: its presence makes a cell dirty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyMarker {
    pub id: EntityId,
}

impl Behavior for DirtyMarker {
    fn activate(&self, _world: &mut WorldView<'_>) -> SimResult<Activation> {
        Ok(Activation::Idle)
    }
}

/// Wandering cleaner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanerAgent {
    pub id: EntityId,
}

impl CleanerAgent {
    /// Lowest-id dirty marker sharing `at`, if any.
    fn find_dirt(&self, world: &WorldView<'_>, at: Coord) -> Option<EntityId> {
        world
            .grid
            .occupants(at)
            .iter()
            .copied()
            .filter(|&id| world.kind_of(id) == Some(EntityKind::DirtyMarker))
            .min()
    }
}

impl Behavior for CleanerAgent {
    fn activate(&self, world: &mut WorldView<'_>) -> SimResult<Activation> {
        let at = world
            .grid
            .position_of(self.id)
            .ok_or(SimError::UnknownEntity(self.id))?;

        if let Some(marker) = self.find_dirt(world, at) {
            world.grid.remove(marker)?;
            world.scheduler.remove(marker)?;
            return Ok(Activation::Cleaned { marker, at });
        }

        let candidates = world.grid.neighborhood(at, false);
        let Some(&to) = world.ctx.choose(&candidates) else {
            return Ok(Activation::Stuck { at });
        };
        world.grid.move_entity(self.id, to)?;
        trace!("cleaner {} moved {} -> {}", self.id, at, to);

        Ok(Activation::Moved { from: at, to })
    }
}

/// Any entity that can live on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    DirtyMarker(DirtyMarker),
    Cleaner(CleanerAgent),
}

impl Entity {
    pub fn dirty_marker(id: EntityId) -> Self {
        Entity::DirtyMarker(DirtyMarker { id })
    }

    pub fn cleaner(id: EntityId) -> Self {
        Entity::Cleaner(CleanerAgent { id })
    }

    pub fn id(&self) -> EntityId {
        match self {
            Entity::DirtyMarker(m) => m.id,
            Entity::Cleaner(c) => c.id,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::DirtyMarker(_) => EntityKind::DirtyMarker,
            Entity::Cleaner(_) => EntityKind::Cleaner,
        }
    }

    /// The behaviour capability of this entity.
    pub fn behavior(&self) -> &dyn Behavior {
        match self {
            Entity::DirtyMarker(m) => m as &dyn Behavior,
            Entity::Cleaner(c) => c as &dyn Behavior,
        }
    }
}

//! The multi-occupancy grid.
//!
//! A bounded (non-wrapping) `W x H` lattice. Each cell holds an ordered list
//! of occupant ids and a reverse index maps every placed entity to its cell,
//! so both "who is here" and "where is this" are O(1).

use cleaner_env::{Coord, EntityId, SimError, SimResult};
use std::collections::HashMap;

/// Von Neumann offsets, dx-major then dy. `(0, 0)` is the centre slot.
const ROOK_OFFSETS: [(i64, i64); 5] = [(-1, 0), (0, -1), (0, 0), (0, 1), (1, 0)];

/// A bounded grid where any number of entities may share a cell.
#[derive(Debug, Clone)]
pub struct Grid {
    width: u32,
    height: u32,

    /// Occupants per cell, row-major (`y * width + x`), in insertion order
    cells: Vec<Vec<EntityId>>,

    /// Reverse index: entity -> cell
    positions: HashMap<EntityId, Coord>,
}

impl Grid {
    /// Creates an empty grid.
    pub fn new(width: u32, height: u32) -> Self {
        let cell_count = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Vec::new(); cell_count],
            positions: HashMap::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of placed entities.
    pub fn entity_count(&self) -> usize {
        self.positions.len()
    }

    /// True if `coord` lies within `[0, W) x [0, H)`.
    pub fn contains(&self, coord: Coord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && coord.x < i64::from(self.width)
            && coord.y < i64::from(self.height)
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        if self.contains(coord) {
            Some(coord.y as usize * self.width as usize + coord.x as usize)
        } else {
            None
        }
    }

    fn checked_index(&self, coord: Coord) -> SimResult<usize> {
        self.index(coord)
            .ok_or_else(|| SimError::out_of_bounds(coord, self.width, self.height))
    }

    /// Adds `entity` to the occupants of `coord`.
    ///
    /// Placing an entity that is already on the grid relocates it, so every
    /// entity stays in exactly one cell.
    pub fn place(&mut self, entity: EntityId, coord: Coord) -> SimResult<()> {
        let idx = self.checked_index(coord)?;
        if self.positions.contains_key(&entity) {
            self.remove(entity)?;
        }
        self.cells[idx].push(entity);
        self.positions.insert(entity, coord);
        Ok(())
    }

    /// Removes `entity` from its cell and returns where it was.
    pub fn remove(&mut self, entity: EntityId) -> SimResult<Coord> {
        let coord = self
            .positions
            .remove(&entity)
            .ok_or(SimError::UnknownEntity(entity))?;
        let idx = self.checked_index(coord)?;
        self.cells[idx].retain(|&id| id != entity);
        Ok(coord)
    }

    /// Moves `entity` to `coord`.
    ///
    /// Both preconditions are checked before anything is mutated, so a failed
    /// move leaves the grid untouched.
    pub fn move_entity(&mut self, entity: EntityId, coord: Coord) -> SimResult<()> {
        let target = self.checked_index(coord)?;
        if !self.positions.contains_key(&entity) {
            return Err(SimError::UnknownEntity(entity));
        }
        self.remove(entity)?;
        self.cells[target].push(entity);
        self.positions.insert(entity, coord);
        Ok(())
    }

    /// Returns the 4-connected neighbours of `coord` that lie on the grid.
    ///
    /// Order is fixed (dx-major, then dy) so a seeded choice over the result
    /// is reproducible. Edges are clipped, never wrapped.
    pub fn neighborhood(&self, coord: Coord, include_center: bool) -> Vec<Coord> {
        ROOK_OFFSETS
            .iter()
            .filter(|&&(dx, dy)| include_center || (dx, dy) != (0, 0))
            .map(|&(dx, dy)| coord.offset(dx, dy))
            .filter(|&c| self.contains(c))
            .collect()
    }

    /// Entities at `coord`, in placement order. Empty off-grid.
    pub fn occupants(&self, coord: Coord) -> &[EntityId] {
        match self.index(coord) {
            Some(idx) => &self.cells[idx],
            None => &[],
        }
    }

    /// True if nothing occupies `coord`.
    pub fn is_empty(&self, coord: Coord) -> bool {
        self.occupants(coord).is_empty()
    }

    /// Current cell of `entity`, if placed.
    pub fn position_of(&self, entity: EntityId) -> Option<Coord> {
        self.positions.get(&entity).copied()
    }

    /// All unoccupied cells in row-major order.
    pub fn empty_cells(&self) -> Vec<Coord> {
        let width = self.width as usize;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, occupants)| occupants.is_empty())
            .map(|(idx, _)| Coord::new((idx % width) as i64, (idx / width) as i64))
            .collect()
    }
}

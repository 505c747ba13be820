//! Free-list cell pool

use bitvec::prelude::*;
use tracing::{debug, trace};

use super::ArenaStats;
use crate::cell::{Cell, CellBody, CellId};
use crate::SlipError;

/// Fixed-size record pool with LIFO slot recycling
///
/// Slots are never returned to the allocator; a released slot goes on the
/// free list, its liveness bit is cleared and its generation is bumped.
/// A stale handle keeps failing lookups even after the slot is reused.
#[derive(Debug)]
pub struct CellArena {
    /// Slot storage, indexed by `CellId`
    cells: Vec<Cell>,

    /// One bit per slot: occupied or free
    live: BitVec,

    /// Per-slot generation, bumped on every release
    generations: Vec<u32>,

    /// Released slot indices, most recent last
    free: Vec<u32>,

    /// Optional ceiling on simultaneously live cells
    max_cells: Option<usize>,

    allocated_total: u64,
    released_total: u64,
    high_water: usize,
}

impl CellArena {
    /// Create pool with reserved room for `initial_capacity` cells
    pub fn new(initial_capacity: usize, max_cells: Option<usize>) -> Self {
        Self {
            cells: Vec::with_capacity(initial_capacity),
            live: BitVec::with_capacity(initial_capacity),
            generations: Vec::with_capacity(initial_capacity),
            free: Vec::new(),
            max_cells,
            allocated_total: 0,
            released_total: 0,
            high_water: 0,
        }
    }

    /// Hand out a detached cell holding `body`
    pub(crate) fn allocate(&mut self, body: CellBody) -> Result<CellId, SlipError> {
        if let Some(limit) = self.max_cells {
            if self.live_count() >= limit {
                return Err(SlipError::ArenaExhausted { limit });
            }
        }

        let id = match self.free.pop() {
            Some(idx) => {
                let id = CellId(idx, self.generations[idx as usize]);
                self.cells[idx as usize] = Cell::detached(id, body);
                self.live.set(idx as usize, true);
                id
            }
            None => {
                let idx = self.cells.len();
                if idx >= u32::MAX as usize {
                    return Err(SlipError::ArenaExhausted {
                        limit: u32::MAX as usize,
                    });
                }
                if idx == self.cells.capacity() {
                    debug!(
                        capacity = self.cells.capacity(),
                        live = self.live_count(),
                        "growing cell arena"
                    );
                }
                let id = CellId(idx as u32, 0);
                self.cells.push(Cell::detached(id, body));
                self.live.push(true);
                self.generations.push(0);
                id
            }
        };

        self.allocated_total += 1;
        self.high_water = self.high_water.max(self.live_count());
        trace!(cell = id.0, generation = id.1, "allocated cell");
        Ok(id)
    }

    /// Return a cell to the free list. Releasing a free slot is a no-op.
    pub(crate) fn release(&mut self, id: CellId) {
        if !self.is_live(id) {
            return;
        }
        self.cells[id.index()] = Cell::detached(id, CellBody::Free);
        self.live.set(id.index(), false);
        let generation = &mut self.generations[id.index()];
        *generation = generation.wrapping_add(1);
        self.free.push(id.0);
        self.released_total += 1;
        trace!(cell = id.0, "released cell");
    }

    /// Slot is occupied by the cell this handle was issued for
    #[inline]
    pub fn is_live(&self, id: CellId) -> bool {
        self.live.get(id.index()).map_or(false, |bit| *bit)
            && self.generations.get(id.index()) == Some(&id.1)
    }

    #[inline]
    pub(crate) fn get(&self, id: CellId) -> Option<&Cell> {
        if self.is_live(id) {
            self.cells.get(id.index())
        } else {
            None
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: CellId) -> Option<&mut Cell> {
        if self.is_live(id) {
            self.cells.get_mut(id.index())
        } else {
            None
        }
    }

    /// Cells currently handed out
    pub fn live_count(&self) -> usize {
        self.cells.len() - self.free.len()
    }

    /// Snapshot of pool counters
    pub fn stats(&self) -> ArenaStats {
        ArenaStats {
            live: self.live_count(),
            high_water: self.high_water,
            capacity: self.cells.capacity(),
            free_slots: self.free.len(),
            allocated_total: self.allocated_total,
            released_total: self.released_total,
        }
    }
}

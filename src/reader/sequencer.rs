//! Single-list cursor
//!
//! A `Sequencer` never leaves the list it was created over and keeps no
//! frames, so it is a plain pair of handles.

use super::chain::{step_linear, Direction, Search};
use super::resolve_target;
use crate::cell::{CellId, Value};
use crate::list::Slip;
use crate::SlipError;

/// Linear cursor over one list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sequencer {
    list: CellId,
    current: CellId,
}

impl Sequencer {
    /// Cursor at the Header of `target`, or of the list a Sublist names
    pub fn new(slip: &Slip, target: CellId) -> Result<Self, SlipError> {
        let list = resolve_target(slip, target, "sequencer")?;
        Ok(Self { list, current: list })
    }

    /// Cell the cursor denotes
    pub fn current_cell(&self) -> CellId {
        self.current
    }

    /// Header of the list
    pub fn current_list(&self) -> CellId {
        self.list
    }

    /// At the list boundary
    pub fn is_header(&self) -> bool {
        self.current == self.list
    }

    /// Step to the next cell matching `search`, or the Header
    pub fn advance(&mut self, slip: &Slip, search: Search, dir: Direction) -> Result<&mut Self, SlipError> {
        self.step(slip, search, dir == Direction::Right, "advance")
    }

    /// Previous datum
    pub fn advance_lel(&mut self, slip: &Slip) -> Result<&mut Self, SlipError> {
        self.step(slip, Search::Element, false, "advance_lel")
    }

    /// Next datum
    pub fn advance_ler(&mut self, slip: &Slip) -> Result<&mut Self, SlipError> {
        self.step(slip, Search::Element, true, "advance_ler")
    }

    /// Previous sublist
    pub fn advance_lnl(&mut self, slip: &Slip) -> Result<&mut Self, SlipError> {
        self.step(slip, Search::Name, false, "advance_lnl")
    }

    /// Next sublist
    pub fn advance_lnr(&mut self, slip: &Slip) -> Result<&mut Self, SlipError> {
        self.step(slip, Search::Name, true, "advance_lnr")
    }

    /// Previous cell
    pub fn advance_lwl(&mut self, slip: &Slip) -> Result<&mut Self, SlipError> {
        self.step(slip, Search::Word, false, "advance_lwl")
    }

    /// Next cell
    pub fn advance_lwr(&mut self, slip: &Slip) -> Result<&mut Self, SlipError> {
        self.step(slip, Search::Word, true, "advance_lwr")
    }

    fn step(
        &mut self,
        slip: &Slip,
        search: Search,
        rightward: bool,
        op: &'static str,
    ) -> Result<&mut Self, SlipError> {
        self.current = step_linear(slip, self.current, search, rightward, op)?;
        Ok(self)
    }

    /// Back to the Header
    pub fn reset(&mut self) -> &mut Self {
        self.current = self.list;
        self
    }

    /// Insert left of the current cell
    pub fn ins_left(&self, slip: &mut Slip, value: impl Into<Value>) -> Result<CellId, SlipError> {
        slip.ins_left(self.current, value)
    }

    /// Insert right of the current cell
    pub fn ins_right(&self, slip: &mut Slip, value: impl Into<Value>) -> Result<CellId, SlipError> {
        slip.ins_right(self.current, value)
    }

    /// Overwrite the current cell in place
    pub fn replace(&self, slip: &mut Slip, value: impl Into<Value>) -> Result<(), SlipError> {
        slip.replace(self.current, value)
    }

    /// Delete the current cell, stepping to its predecessor
    pub fn delete_cell(&mut self, slip: &mut Slip) -> Result<Value, SlipError> {
        let prev = step_linear(slip, self.current, Search::Word, false, "delete_cell")?;
        let value = slip.delete_cell(self.current)?;
        self.current = prev;
        Ok(value)
    }
}

//! List structure and the `Slip` context
//!
//! A [`Slip`] owns the cell arena. Every list operation goes through it:
//! handles ([`CellId`]) are generation-tagged indices and carry no borrow, so several
//! cursors can coexist over the same structure.
//!
//! Layout of a list `(a b)` with Header `H`:
//!
//! ```text
//!   H.right -> a -> b -> H      (top .. bottom)
//!   H.left  -> b -> a -> H
//! ```
//!
//! Lists are not synchronized with cursors. Editing a list behind a
//! cursor's back leaves that cursor's position undefined.

mod descriptor;
mod edit;
mod header;

pub use header::DeletePolicy;
pub(crate) use header::rename;

use crate::arena::{ArenaStats, CellArena};
use crate::cell::{Cell, CellBody, CellId, CellKind, Datum, HeaderData, Value};
use crate::{SlipConfig, SlipError};

/// Allocator context holding every cell of every list
#[derive(Debug)]
pub struct Slip {
    arena: CellArena,
    config: SlipConfig,
}

impl Slip {
    /// Context with default configuration
    pub fn new() -> Self {
        let config = SlipConfig::default();
        Self {
            arena: CellArena::new(config.initial_capacity, config.max_cells),
            config,
        }
    }

    /// Context with validated configuration
    pub fn with_config(config: SlipConfig) -> Result<Self, SlipError> {
        config.validate()?;
        Ok(Self {
            arena: CellArena::new(config.initial_capacity, config.max_cells),
            config,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &SlipConfig {
        &self.config
    }

    /// Underlying pool
    pub fn arena(&self) -> &CellArena {
        &self.arena
    }

    /// Pool counters
    pub fn stats(&self) -> ArenaStats {
        self.arena.stats()
    }

    // -------------------------------------------------------------------
    // Capability queries
    // -------------------------------------------------------------------

    /// Handle refers to an allocated cell
    pub fn is_live(&self, id: CellId) -> bool {
        self.arena.is_live(id)
    }

    /// Variant of a live cell
    pub fn kind(&self, id: CellId) -> Result<CellKind, SlipError> {
        let cell = self.cell("kind", id)?;
        cell.kind().ok_or(SlipError::StaleCell {
            op: "kind",
            cell: id,
            site: site!(),
        })
    }

    /// Cell is a live Header
    pub fn is_header(&self, id: CellId) -> bool {
        self.kind(id).map_or(false, |k| k == CellKind::Header)
    }

    /// Cell is a live Sublist
    pub fn is_sublist(&self, id: CellId) -> bool {
        self.kind(id).map_or(false, |k| k == CellKind::Sublist)
    }

    /// Cell is a live Datum
    pub fn is_data(&self, id: CellId) -> bool {
        self.kind(id).map_or(false, |k| k == CellKind::Datum)
    }

    /// Left neighbour
    pub fn left(&self, id: CellId) -> Result<CellId, SlipError> {
        Ok(self.cell("left", id)?.left)
    }

    /// Right neighbour
    pub fn right(&self, id: CellId) -> Result<CellId, SlipError> {
        Ok(self.cell("right", id)?.right)
    }

    /// Header named by a Sublist cell
    pub fn header_of(&self, sublist: CellId) -> Result<CellId, SlipError> {
        match self.cell("header_of", sublist)?.body {
            CellBody::Sublist(h) => Ok(h),
            _ => Err(SlipError::NotASublist {
                op: "header_of",
                cell: sublist,
                site: site!(),
            }),
        }
    }

    /// Scalar payload of a Datum cell
    pub fn datum(&self, id: CellId) -> Option<&Datum> {
        match &self.arena.get(id)?.body {
            CellBody::Datum(d) => Some(d),
            _ => None,
        }
    }

    /// Value a cell denotes. A Header denotes its own list.
    pub fn value(&self, id: CellId) -> Result<Value, SlipError> {
        match &self.cell("value", id)?.body {
            CellBody::Datum(d) => Ok(Value::Datum(d.clone())),
            CellBody::Sublist(h) => Ok(Value::List(*h)),
            _ => Ok(Value::List(id)),
        }
    }

    /// Cell is a member of some list. Headers always are.
    pub fn is_linked(&self, id: CellId) -> Result<bool, SlipError> {
        let cell = self.cell("is_linked", id)?;
        Ok(cell.header().is_some() || cell.left != id)
    }

    // -------------------------------------------------------------------
    // Crate-internal access and link surgery
    // -------------------------------------------------------------------

    pub(crate) fn cell(&self, op: &'static str, id: CellId) -> Result<&Cell, SlipError> {
        self.arena.get(id).ok_or(SlipError::StaleCell {
            op,
            cell: id,
            site: site!(),
        })
    }

    pub(crate) fn cell_mut(&mut self, op: &'static str, id: CellId) -> Result<&mut Cell, SlipError> {
        self.arena.get_mut(id).ok_or(SlipError::StaleCell {
            op,
            cell: id,
            site: site!(),
        })
    }

    pub(crate) fn header_data(&self, op: &'static str, id: CellId) -> Result<&HeaderData, SlipError> {
        self.cell(op, id)?.header().ok_or(SlipError::NotAHeader {
            op,
            cell: id,
            site: site!(),
        })
    }

    pub(crate) fn header_data_mut(
        &mut self,
        op: &'static str,
        id: CellId,
    ) -> Result<&mut HeaderData, SlipError> {
        self.cell_mut(op, id)?.header_mut().ok_or(SlipError::NotAHeader {
            op,
            cell: id,
            site: site!(),
        })
    }

    /// Fail unless `id` is a live Header
    pub(crate) fn expect_header(&self, op: &'static str, id: CellId) -> Result<(), SlipError> {
        self.header_data(op, id).map(|_| ())
    }

    /// Fail unless `id` is a live cell that is linked, or a Header
    pub(crate) fn expect_linked(&self, op: &'static str, id: CellId) -> Result<(), SlipError> {
        let cell = self.cell(op, id)?;
        if cell.header().is_none() && cell.left == id {
            return Err(SlipError::NotLinked {
                op,
                cell: id,
                site: site!(),
            });
        }
        Ok(())
    }

    /// Links of a cell already known to be live
    #[inline]
    pub(crate) fn links(&self, id: CellId) -> (CellId, CellId) {
        self.arena
            .get(id)
            .map_or((id, id), |cell| (cell.left, cell.right))
    }

    #[inline]
    pub(crate) fn step(&self, id: CellId, rightward: bool) -> CellId {
        let (left, right) = self.links(id);
        if rightward {
            right
        } else {
            left
        }
    }

    fn set_links(&mut self, id: CellId, left: Option<CellId>, right: Option<CellId>) {
        if let Some(cell) = self.arena.get_mut(id) {
            if let Some(l) = left {
                cell.left = l;
            }
            if let Some(r) = right {
                cell.right = r;
            }
        }
    }

    /// Insert detached `cell` immediately right of `anchor`
    pub(crate) fn link_right_of(&mut self, anchor: CellId, cell: CellId) {
        let (_, next) = self.links(anchor);
        self.set_links(cell, Some(anchor), Some(next));
        self.set_links(next, Some(cell), None);
        self.set_links(anchor, None, Some(cell));
    }

    /// Insert detached `cell` immediately left of `anchor`
    pub(crate) fn link_left_of(&mut self, anchor: CellId, cell: CellId) {
        let (prev, _) = self.links(anchor);
        self.link_right_of(prev, cell);
    }

    /// Take a non-header cell out of its list; its links then point at itself
    pub(crate) fn detach(&mut self, cell: CellId) {
        let (prev, next) = self.links(cell);
        self.set_links(prev, None, Some(next));
        self.set_links(next, Some(prev), None);
        self.set_links(cell, Some(cell), Some(cell));
    }

    /// Allocate a detached cell holding `value`
    pub(crate) fn new_cell(&mut self, op: &'static str, value: Value) -> Result<CellId, SlipError> {
        match value {
            Value::Datum(d) => self.arena.allocate(CellBody::Datum(d)),
            Value::List(h) => {
                self.expect_header(op, h)?;
                let id = self.arena.allocate(CellBody::Sublist(h))?;
                self.header_data_mut(op, h)?.ref_count += 1;
                Ok(id)
            }
        }
    }

    pub(crate) fn alloc_header(&mut self, data: HeaderData) -> Result<CellId, SlipError> {
        self.arena.allocate(CellBody::Header(data))
    }

    /// Free a detached non-header cell, dropping the reference a Sublist holds
    pub(crate) fn release_cell(&mut self, id: CellId) -> Option<Value> {
        let body = self.arena.get(id).map(|c| c.body.clone())?;
        let value = match body {
            CellBody::Datum(d) => Some(Value::Datum(d)),
            CellBody::Sublist(h) => {
                self.drop_reference(h);
                Some(Value::List(h))
            }
            _ => None,
        };
        self.arena.release(id);
        value
    }

    pub(crate) fn release_header(&mut self, id: CellId) {
        self.arena.release(id);
    }

    pub(crate) fn drop_reference(&mut self, header: CellId) {
        if let Some(data) = self.arena.get_mut(header).and_then(Cell::header_mut) {
            data.ref_count = data.ref_count.saturating_sub(1);
        }
    }

    /// Overwrite the payload of a non-header cell, keeping its links and id
    pub(crate) fn set_body(&mut self, op: &'static str, id: CellId, value: Value) -> Result<(), SlipError> {
        let old = self.cell(op, id)?.body.clone();
        if matches!(old, CellBody::Header(_)) {
            return Err(SlipError::HeaderReplacement {
                op,
                cell: id,
                site: site!(),
            });
        }
        let body = match value {
            Value::Datum(d) => CellBody::Datum(d),
            Value::List(h) => {
                self.header_data_mut(op, h)?.ref_count += 1;
                CellBody::Sublist(h)
            }
        };
        if let CellBody::Sublist(h) = old {
            self.drop_reference(h);
        }
        self.cell_mut(op, id)?.body = body;
        Ok(())
    }
}

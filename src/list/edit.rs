//! Cell-level edits
//!
//! A non-header cell is either a member of exactly one list or detached
//! (links pointing at itself). `unlink` produces detached cells; they can
//! be put back with `link_left`/`link_right` or freed with `release`.

use tracing::debug;

use super::Slip;
use crate::cell::{CellId, Value};
use crate::SlipError;

impl Slip {
    /// Insert a new cell left of `anchor`. Left of a Header is the bottom.
    pub fn ins_left(&mut self, anchor: CellId, value: impl Into<Value>) -> Result<CellId, SlipError> {
        self.expect_linked("ins_left", anchor)?;
        let cell = self.new_cell("ins_left", value.into())?;
        self.link_left_of(anchor, cell);
        Ok(cell)
    }

    /// Insert a new cell right of `anchor`. Right of a Header is the top.
    pub fn ins_right(&mut self, anchor: CellId, value: impl Into<Value>) -> Result<CellId, SlipError> {
        self.expect_linked("ins_right", anchor)?;
        let cell = self.new_cell("ins_right", value.into())?;
        self.link_right_of(anchor, cell);
        Ok(cell)
    }

    /// Overwrite the value of a Datum or Sublist cell in place
    pub fn replace(&mut self, cell: CellId, value: impl Into<Value>) -> Result<(), SlipError> {
        self.set_body("replace", cell, value.into())
    }

    /// Take a cell out of its list without freeing it
    pub fn unlink(&mut self, cell: CellId) -> Result<CellId, SlipError> {
        self.expect_member("unlink", cell)?;
        self.detach(cell);
        Ok(cell)
    }

    /// Put a detached cell back, left of `anchor`
    pub fn link_left(&mut self, anchor: CellId, cell: CellId) -> Result<(), SlipError> {
        self.expect_linked("link_left", anchor)?;
        self.expect_detached("link_left", cell)?;
        self.link_left_of(anchor, cell);
        Ok(())
    }

    /// Put a detached cell back, right of `anchor`
    pub fn link_right(&mut self, anchor: CellId, cell: CellId) -> Result<(), SlipError> {
        self.expect_linked("link_right", anchor)?;
        self.expect_detached("link_right", cell)?;
        self.link_right_of(anchor, cell);
        Ok(())
    }

    /// Free a detached cell and return its value
    pub fn release(&mut self, cell: CellId) -> Result<Value, SlipError> {
        self.expect_detached("release", cell)?;
        self.take("release", cell)
    }

    /// Remove a cell from its list and free it
    pub fn delete_cell(&mut self, cell: CellId) -> Result<Value, SlipError> {
        self.expect_member("delete_cell", cell)?;
        let value = self.take("delete_cell", cell)?;
        debug!(cell = cell.0, "deleted cell");
        Ok(value)
    }

    /// Relocate linked `cell` to the left of `anchor`
    pub fn move_left(&mut self, anchor: CellId, cell: CellId) -> Result<(), SlipError> {
        self.relocate("move_left", anchor, cell, false)
    }

    /// Relocate linked `cell` to the right of `anchor`
    pub fn move_right(&mut self, anchor: CellId, cell: CellId) -> Result<(), SlipError> {
        self.relocate("move_right", anchor, cell, true)
    }

    fn relocate(
        &mut self,
        op: &'static str,
        anchor: CellId,
        cell: CellId,
        rightward: bool,
    ) -> Result<(), SlipError> {
        self.expect_linked(op, anchor)?;
        self.expect_member(op, cell)?;
        if anchor == cell {
            return Ok(());
        }
        self.detach(cell);
        if rightward {
            self.link_right_of(anchor, cell);
        } else {
            self.link_left_of(anchor, cell);
        }
        Ok(())
    }

    /// Fail unless `cell` is a linked non-header cell
    fn expect_member(&self, op: &'static str, cell: CellId) -> Result<(), SlipError> {
        if self.cell(op, cell)?.header().is_some() {
            return Err(SlipError::HeaderReplacement {
                op,
                cell,
                site: site!(),
            });
        }
        self.expect_linked(op, cell)
    }

    /// Fail unless `cell` is a detached non-header cell
    fn expect_detached(&self, op: &'static str, cell: CellId) -> Result<(), SlipError> {
        if self.is_linked(cell).map_err(|e| super::rename(e, op))? {
            return Err(SlipError::AlreadyLinked {
                op,
                cell,
                site: site!(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Datum;

    #[test]
    fn test_insert_relative_to_header_and_cell() {
        let mut slip = Slip::new();
        let list = slip.new_list().unwrap();
        let mid = slip.ins_right(list, "mid").unwrap();
        let top = slip.ins_right(list, "top").unwrap();
        let bot = slip.ins_left(list, "bot").unwrap();
        let before_mid = slip.ins_left(mid, "before").unwrap();
        assert_eq!(slip.cells(list).unwrap(), vec![top, before_mid, mid, bot]);
    }

    #[test]
    fn test_unlink_then_relink() {
        let mut slip = Slip::new();
        let list = slip.new_list().unwrap();
        let a = slip.enqueue(list, 'a').unwrap();
        let b = slip.enqueue(list, 'b').unwrap();

        slip.unlink(a).unwrap();
        assert_eq!(slip.cells(list).unwrap(), vec![b]);
        assert!(matches!(slip.move_left(b, a), Err(SlipError::NotLinked { op: "move_left", .. })));
        assert!(matches!(slip.link_left(list, b), Err(SlipError::AlreadyLinked { .. })));

        slip.link_right(list, a).unwrap();
        assert_eq!(slip.cells(list).unwrap(), vec![a, b]);
    }

    #[test]
    fn test_release_and_delete_free_cells() {
        let mut slip = Slip::new();
        let list = slip.new_list().unwrap();
        let cell = slip.push(list, 12u64).unwrap();
        assert!(matches!(slip.release(cell), Err(SlipError::AlreadyLinked { .. })));

        slip.unlink(cell).unwrap();
        assert_eq!(slip.release(cell).unwrap(), Value::Datum(Datum::ULong(12)));
        assert!(!slip.is_live(cell));
        assert!(matches!(slip.unlink(cell), Err(SlipError::StaleCell { op: "unlink", .. })));

        let other = slip.push(list, 'z').unwrap();
        assert_eq!(slip.delete_cell(other).unwrap(), Value::from('z'));
        assert!(matches!(
            slip.delete_cell(list),
            Err(SlipError::HeaderReplacement { .. })
        ));
    }

    #[test]
    fn test_move_between_lists() {
        let mut slip = Slip::new();
        let a = slip.new_list().unwrap();
        let b = slip.new_list().unwrap();
        let x = slip.push(a, 1i64).unwrap();
        let y = slip.push(b, 2i64).unwrap();

        slip.move_right(y, x).unwrap();
        assert!(slip.is_empty(a).unwrap());
        assert_eq!(slip.cells(b).unwrap(), vec![y, x]);

        slip.move_left(a, y).unwrap();
        assert_eq!(slip.cells(a).unwrap(), vec![y]);
        assert_eq!(slip.list_of(x).unwrap(), b);
    }
}

//! List-level operations addressed through a Header

use tracing::{debug, warn};

use super::Slip;
use crate::cell::{CellBody, CellId, HeaderData, Value};
use crate::SlipError;

/// What `delete_list` does about nested lists and outstanding references
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePolicy {
    /// Refuse when the list is still named by a Sublist. Nested lists lose
    /// one reference each but are left alive.
    Strict,
    /// As `Strict`, then also delete every nested list whose reference
    /// count drops to zero.
    Cascade,
}

impl Slip {
    /// Create an empty list
    pub fn new_list(&mut self) -> Result<CellId, SlipError> {
        let id = self.alloc_header(HeaderData::default())?;
        debug!(list = id.0, "created list");
        Ok(id)
    }

    /// Insert at the top of the list
    pub fn push(&mut self, list: CellId, value: impl Into<Value>) -> Result<CellId, SlipError> {
        self.expect_header("push", list)?;
        let cell = self.new_cell("push", value.into())?;
        self.link_right_of(list, cell);
        Ok(cell)
    }

    /// Remove the top cell and return its value
    pub fn pop(&mut self, list: CellId) -> Result<Value, SlipError> {
        let top = self.top(list).map_err(|e| rename(e, "pop"))?;
        self.take("pop", top)
    }

    /// Insert at the top of the list; `dequeue` takes from the bottom, so
    /// the pair behaves as a FIFO queue
    pub fn enqueue(&mut self, list: CellId, value: impl Into<Value>) -> Result<CellId, SlipError> {
        self.expect_header("enqueue", list)?;
        let cell = self.new_cell("enqueue", value.into())?;
        self.link_right_of(list, cell);
        Ok(cell)
    }

    /// Remove the bottom cell and return its value
    pub fn dequeue(&mut self, list: CellId) -> Result<Value, SlipError> {
        let bot = self.bot(list).map_err(|e| rename(e, "dequeue"))?;
        self.take("dequeue", bot)
    }

    /// First cell after the Header
    pub fn top(&self, list: CellId) -> Result<CellId, SlipError> {
        self.expect_header("top", list)?;
        let (_, first) = self.links(list);
        if first == list {
            return Err(SlipError::EmptyList {
                op: "top",
                list,
                site: site!(),
            });
        }
        Ok(first)
    }

    /// Last cell before the Header
    pub fn bot(&self, list: CellId) -> Result<CellId, SlipError> {
        self.expect_header("bot", list)?;
        let (last, _) = self.links(list);
        if last == list {
            return Err(SlipError::EmptyList {
                op: "bot",
                list,
                site: site!(),
            });
        }
        Ok(last)
    }

    /// Overwrite the value of the top cell
    pub fn replace_top(&mut self, list: CellId, value: impl Into<Value>) -> Result<CellId, SlipError> {
        let top = self.top(list).map_err(|e| rename(e, "replace_top"))?;
        self.set_body("replace_top", top, value.into())?;
        Ok(top)
    }

    /// Overwrite the value of the bottom cell
    pub fn replace_bot(&mut self, list: CellId, value: impl Into<Value>) -> Result<CellId, SlipError> {
        let bot = self.bot(list).map_err(|e| rename(e, "replace_bot"))?;
        self.set_body("replace_bot", bot, value.into())?;
        Ok(bot)
    }

    /// Number of Sublist cells naming this list
    pub fn ref_count(&self, list: CellId) -> Result<usize, SlipError> {
        Ok(self.header_data("ref_count", list)?.ref_count)
    }

    /// User mark
    pub fn mark(&self, list: CellId) -> Result<u64, SlipError> {
        Ok(self.header_data("mark", list)?.mark)
    }

    /// Set the user mark, returning the previous one
    pub fn put_mark(&mut self, list: CellId, mark: u64) -> Result<u64, SlipError> {
        let data = self.header_data_mut("put_mark", list)?;
        Ok(std::mem::replace(&mut data.mark, mark))
    }

    /// List holds no cells
    pub fn is_empty(&self, list: CellId) -> Result<bool, SlipError> {
        self.expect_header("is_empty", list)?;
        Ok(self.links(list).1 == list)
    }

    /// Number of cells in the list, not counting nested content
    pub fn size(&self, list: CellId) -> Result<usize, SlipError> {
        self.expect_header("size", list)?;
        let mut count = 0;
        let mut cursor = self.links(list).1;
        while cursor != list {
            count += 1;
            cursor = self.links(cursor).1;
        }
        Ok(count)
    }

    /// Cells of the list from top to bottom
    pub fn cells(&self, list: CellId) -> Result<Vec<CellId>, SlipError> {
        self.expect_header("cells", list)?;
        let mut out = Vec::new();
        let mut cursor = self.links(list).1;
        while cursor != list {
            out.push(cursor);
            cursor = self.links(cursor).1;
        }
        Ok(out)
    }

    /// Release every cell of the list. The Header survives.
    pub fn flush(&mut self, list: CellId) -> Result<(), SlipError> {
        let released = self.flush_collect("flush", list)?.len();
        debug!(list = list.0, released, "flushed list");
        Ok(())
    }

    /// Flush, returning the lists that lost a reference
    fn flush_collect(&mut self, op: &'static str, list: CellId) -> Result<Vec<CellId>, SlipError> {
        self.expect_header(op, list)?;
        let mut dropped = Vec::new();
        loop {
            let (_, first) = self.links(list);
            if first == list {
                break;
            }
            self.detach(first);
            if let Some(Value::List(h)) = self.release_cell(first) {
                dropped.push(h);
            }
        }
        Ok(dropped)
    }

    /// Destroy a list together with its attribute list
    pub fn delete_list(&mut self, list: CellId, policy: DeletePolicy) -> Result<(), SlipError> {
        let refs = self.ref_count(list).map_err(|e| rename(e, "delete_list"))?;
        if refs > 0 {
            warn!(list = list.0, refs, "refusing to delete referenced list");
            return Err(SlipError::ListReferenced {
                op: "delete_list",
                list,
                refs,
                site: site!(),
            });
        }

        let mut pending = vec![list];
        while let Some(current) = pending.pop() {
            let descriptor = self.header_data("delete_list", current)?.descriptor;
            let mut dropped = self.flush_collect("delete_list", current)?;
            if let Some(d) = descriptor {
                dropped.extend(self.flush_collect("delete_list", d)?);
                self.release_header(d);
            }
            self.release_header(current);
            debug!(list = current.0, "deleted list");

            if policy == DeletePolicy::Cascade {
                for h in dropped {
                    if self.is_header(h) && self.ref_count(h)? == 0 && !pending.contains(&h) {
                        pending.push(h);
                    }
                }
            }
        }
        Ok(())
    }

    /// Header of the list a cell belongs to
    pub fn list_of(&self, cell: CellId) -> Result<CellId, SlipError> {
        self.expect_linked("list_of", cell)?;
        let mut cursor = cell;
        loop {
            if matches!(self.cell("list_of", cursor)?.body, CellBody::Header(_)) {
                return Ok(cursor);
            }
            cursor = self.links(cursor).1;
            if cursor == cell {
                return Err(SlipError::NotLinked {
                    op: "list_of",
                    cell,
                    site: site!(),
                });
            }
        }
    }

    /// Move the cells strictly left of `cell` (top .. cell) into a new list.
    /// At a Header the whole content moves.
    pub fn split_left(&mut self, cell: CellId) -> Result<CellId, SlipError> {
        let list = self.list_of(cell).map_err(|e| rename(e, "split_left"))?;
        let new_list = self.new_list()?;
        let (first, last) = if cell == list {
            (self.links(list).1, self.links(list).0)
        } else {
            (self.links(list).1, self.links(cell).0)
        };
        if first != list && last != list {
            self.splice_run(first, last, new_list, false);
        }
        debug!(list = list.0, new_list = new_list.0, "split left");
        Ok(new_list)
    }

    /// Move the cells strictly right of `cell` (cell .. bottom) into a new
    /// list. At a Header the whole content moves.
    pub fn split_right(&mut self, cell: CellId) -> Result<CellId, SlipError> {
        let list = self.list_of(cell).map_err(|e| rename(e, "split_right"))?;
        let new_list = self.new_list()?;
        let (first, last) = if cell == list {
            (self.links(list).1, self.links(list).0)
        } else {
            (self.links(cell).1, self.links(list).0)
        };
        if first != list && last != list {
            self.splice_run(first, last, new_list, false);
        }
        debug!(list = list.0, new_list = new_list.0, "split right");
        Ok(new_list)
    }

    /// Move every cell of `source` to the left of `anchor`, emptying `source`
    pub fn move_list_left(&mut self, anchor: CellId, source: CellId) -> Result<(), SlipError> {
        self.move_list("move_list_left", anchor, source, false)
    }

    /// Move every cell of `source` to the right of `anchor`, emptying `source`
    pub fn move_list_right(&mut self, anchor: CellId, source: CellId) -> Result<(), SlipError> {
        self.move_list("move_list_right", anchor, source, true)
    }

    fn move_list(
        &mut self,
        op: &'static str,
        anchor: CellId,
        source: CellId,
        rightward: bool,
    ) -> Result<(), SlipError> {
        self.expect_header(op, source)?;
        let destination = self.list_of(anchor).map_err(|e| rename(e, op))?;
        if destination == source {
            return Err(SlipError::SelfSplice {
                op,
                list: source,
                anchor,
                site: site!(),
            });
        }
        let (last, first) = self.links(source);
        if first == source {
            return Ok(());
        }
        self.splice_run(first, last, anchor, rightward);
        debug!(source = source.0, destination = destination.0, "spliced list");
        Ok(())
    }

    /// Cut the run `first..=last` out of its list and relink it next to
    /// `anchor` (right of it when `rightward`, else left). `anchor` must not
    /// lie inside the run.
    fn splice_run(&mut self, first: CellId, last: CellId, anchor: CellId, rightward: bool) {
        let (before, _) = self.links(first);
        let (_, after) = self.links(last);
        self.set_links(before, None, Some(after));
        self.set_links(after, Some(before), None);

        let (prev, next) = if rightward {
            (anchor, self.links(anchor).1)
        } else {
            (self.links(anchor).0, anchor)
        };
        self.set_links(prev, None, Some(first));
        self.set_links(first, Some(prev), None);
        self.set_links(last, None, Some(next));
        self.set_links(next, Some(last), None);
    }

    /// Detach and free a member cell, returning its value
    pub(crate) fn take(&mut self, op: &'static str, cell: CellId) -> Result<Value, SlipError> {
        self.detach(cell);
        self.release_cell(cell).ok_or(SlipError::StaleCell {
            op,
            cell,
            site: site!(),
        })
    }
}

/// Report a delegated failure under the caller's operation name
pub(crate) fn rename(err: SlipError, name: &'static str) -> SlipError {
    match err {
        SlipError::NotAHeader { cell, site, .. } => SlipError::NotAHeader { op: name, cell, site },
        SlipError::NotASublist { cell, site, .. } => SlipError::NotASublist { op: name, cell, site },
        SlipError::EmptyList { list, site, .. } => SlipError::EmptyList { op: name, list, site },
        SlipError::StaleCell { cell, site, .. } => SlipError::StaleCell { op: name, cell, site },
        SlipError::NotLinked { cell, site, .. } => SlipError::NotLinked { op: name, cell, site },
        SlipError::ListReferenced { list, refs, site, .. } => SlipError::ListReferenced {
            op: name,
            list,
            refs,
            site,
        },
        other => other,
    }
}

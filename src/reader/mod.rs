//! Cursors over lists
//!
//! [`Reader`] walks a nested structure and remembers how it got where it
//! is, so a structured walk can stop after any cell and resume later.
//! [`Sequencer`] is the lighter sibling confined to one list.
//!
//! Cursors borrow nothing: every call takes the owning [`Slip`]. Edits
//! made through a cursor keep that cursor pointing at a live cell; edits
//! made elsewhere are not seen by it.

mod chain;
mod sequencer;

pub use chain::{Direction, Mode, ReaderCell, Search, Traversal};
pub use sequencer::Sequencer;

pub(crate) use chain::step_linear;

use std::io;

use chain::ReaderChain;

use crate::cell::{CellId, CellKind, Datum, Value};
use crate::list::{rename, DeletePolicy, Slip};
use crate::SlipError;

/// Resolve a cursor target to a Header
pub(crate) fn resolve_target(slip: &Slip, target: CellId, op: &'static str) -> Result<CellId, SlipError> {
    match slip.kind(target).map_err(|e| rename(e, op))? {
        CellKind::Header => Ok(target),
        CellKind::Sublist => slip.header_of(target).map_err(|e| rename(e, op)),
        CellKind::Datum => Err(SlipError::NotAHeader {
            op,
            cell: target,
            site: site!(),
        }),
    }
}

/// Structured cursor
///
/// # Example
///
/// ```
/// use slip::{Reader, Slip, Value};
///
/// let mut slip = Slip::new();
/// let top = slip.parse("(a (b) c)")?;
/// let mut reader = Reader::new(&slip, top)?;
///
/// reader.advance_snr(&slip)?;
/// assert!(reader.is_sublist(&slip));
/// reader.advance_ser(&slip)?;
/// assert!(reader.is(&slip, &Value::from("b")));
/// assert_eq!(reader.list_depth(), 1);
///
/// reader.reset_top();
/// assert_eq!(reader.current_cell(), top);
/// # Ok::<(), slip::SlipError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Reader {
    chain: ReaderChain,
}

macro_rules! traversal_forwarders {
    ($($name:ident => $variant:ident;)*) => {
        $(
            #[doc = concat!("Run one `", stringify!($variant), "` step")]
            pub fn $name(&mut self, slip: &Slip) -> Result<&mut Self, SlipError> {
                self.chain.advance(slip, Traversal::$variant, stringify!($name))?;
                Ok(self)
            }
        )*
    };
}

impl Reader {
    /// Cursor at the Header of `target`, or of the list a Sublist names
    pub fn new(slip: &Slip, target: CellId) -> Result<Self, SlipError> {
        let list = resolve_target(slip, target, "reader")?;
        Ok(Self {
            chain: ReaderChain::new(list),
        })
    }

    // -------------------------------------------------------------------
    // Traversal
    // -------------------------------------------------------------------

    /// Run one step of any traversal variant
    pub fn advance(&mut self, slip: &Slip, traversal: Traversal) -> Result<&mut Self, SlipError> {
        self.chain.advance(slip, traversal, "advance")?;
        Ok(self)
    }

    traversal_forwarders! {
        advance_lel => LEL;
        advance_ler => LER;
        advance_lnl => LNL;
        advance_lnr => LNR;
        advance_lwl => LWL;
        advance_lwr => LWR;
        advance_sel => SEL;
        advance_ser => SER;
        advance_snl => SNL;
        advance_snr => SNR;
        advance_swl => SWL;
        advance_swr => SWR;
    }

    /// Enter the sublist the cursor denotes
    pub fn down_level(&mut self, slip: &Slip) -> Result<&mut Self, SlipError> {
        let current = self.current_cell();
        self.chain.down_level(slip, current, "down_level")?;
        Ok(self)
    }

    /// Return to the containing list, denoting the sublist just left.
    /// No-op at depth 0.
    pub fn up_level(&mut self) -> &mut Self {
        self.chain.up_level();
        self
    }

    /// Denote the Header of the current list
    pub fn reset(&mut self) -> &mut Self {
        self.chain.reset();
        self
    }

    /// Drop every nested frame and denote the top Header
    pub fn reset_top(&mut self) -> &mut Self {
        self.chain.reset_top();
        self
    }

    /// Frames from the innermost outwards
    pub fn frames(&self) -> impl Iterator<Item = &ReaderCell> {
        self.chain.frames()
    }

    // -------------------------------------------------------------------
    // Introspection
    // -------------------------------------------------------------------

    /// Cell the cursor denotes
    pub fn current_cell(&self) -> CellId {
        self.chain.head().current_cell()
    }

    /// Header of the list being walked
    pub fn current_list(&self) -> CellId {
        self.chain.head().current_list()
    }

    /// Header the cursor was created over
    pub fn top_list(&self) -> CellId {
        self.chain.top_list()
    }

    /// Sublist descents from the top list
    pub fn list_depth(&self) -> usize {
        self.chain.head().depth()
    }

    /// At the list boundary
    pub fn is_header(&self, slip: &Slip) -> bool {
        slip.is_header(self.current_cell())
    }

    /// At a sublist
    pub fn is_sublist(&self, slip: &Slip) -> bool {
        slip.is_sublist(self.current_cell())
    }

    /// At a datum
    pub fn is_data(&self, slip: &Slip) -> bool {
        slip.is_data(self.current_cell())
    }

    /// At a numeric datum
    pub fn is_number(&self, slip: &Slip) -> bool {
        self.datum(slip).map_or(false, Datum::is_number)
    }

    /// At a user pointer datum
    pub fn is_ptr(&self, slip: &Slip) -> bool {
        self.datum(slip).map_or(false, Datum::is_ptr)
    }

    /// At a string datum
    pub fn is_string(&self, slip: &Slip) -> bool {
        self.datum(slip).map_or(false, Datum::is_string)
    }

    /// Current list holds no cells
    pub fn is_empty(&self, slip: &Slip) -> Result<bool, SlipError> {
        slip.is_empty(self.current_list())
    }

    /// Cells in the current list
    pub fn size(&self, slip: &Slip) -> Result<usize, SlipError> {
        slip.size(self.current_list())
    }

    /// Mark of the current list
    pub fn mark(&self, slip: &Slip) -> Result<u64, SlipError> {
        slip.mark(self.current_list())
    }

    /// Set the mark of the current list, returning the previous one
    pub fn put_mark(&self, slip: &mut Slip, mark: u64) -> Result<u64, SlipError> {
        slip.put_mark(self.current_list(), mark)
    }

    /// References to the current list
    pub fn ref_count(&self, slip: &Slip) -> Result<usize, SlipError> {
        slip.ref_count(self.current_list())
    }

    /// Value the cursor denotes; at the boundary, the list itself
    pub fn value(&self, slip: &Slip) -> Result<Value, SlipError> {
        slip.value(self.current_cell())
    }

    /// Scalar the cursor denotes
    pub fn datum<'s>(&self, slip: &'s Slip) -> Option<&'s Datum> {
        slip.datum(self.current_cell())
    }

    /// Current cell holds exactly `value`
    pub fn is(&self, slip: &Slip, value: &Value) -> bool {
        self.value(slip).map_or(false, |v| v == *value)
    }

    // -------------------------------------------------------------------
    // List-level edits on the current list
    // -------------------------------------------------------------------

    /// Insert at the top of the current list
    pub fn push(&self, slip: &mut Slip, value: impl Into<Value>) -> Result<CellId, SlipError> {
        slip.push(self.current_list(), value)
    }

    /// Remove the top cell. A cursor on it falls back to the Header.
    pub fn pop(&mut self, slip: &mut Slip) -> Result<Value, SlipError> {
        let list = self.current_list();
        let top = slip.top(list).map_err(|e| rename(e, "pop"))?;
        if top == self.current_cell() {
            let prev = step_linear(slip, top, Search::Word, false, "pop")?;
            self.chain.set_current(prev);
        }
        slip.pop(list)
    }

    /// Insert at the top of the current list. Paired with `dequeue`, which
    /// takes from the bottom, this gives FIFO order.
    pub fn enqueue(&self, slip: &mut Slip, value: impl Into<Value>) -> Result<CellId, SlipError> {
        slip.enqueue(self.current_list(), value)
    }

    /// Remove the bottom cell. A cursor on it steps left first.
    pub fn dequeue(&mut self, slip: &mut Slip) -> Result<Value, SlipError> {
        let list = self.current_list();
        let bot = slip.bot(list).map_err(|e| rename(e, "dequeue"))?;
        if bot == self.current_cell() {
            let prev = step_linear(slip, bot, Search::Word, false, "dequeue")?;
            self.chain.set_current(prev);
        }
        slip.dequeue(list)
    }

    /// Insert left of the current cell
    pub fn ins_left(&self, slip: &mut Slip, value: impl Into<Value>) -> Result<CellId, SlipError> {
        slip.ins_left(self.current_cell(), value)
    }

    /// Insert right of the current cell
    pub fn ins_right(&self, slip: &mut Slip, value: impl Into<Value>) -> Result<CellId, SlipError> {
        slip.ins_right(self.current_cell(), value)
    }

    /// Overwrite the current cell in place
    pub fn replace(&self, slip: &mut Slip, value: impl Into<Value>) -> Result<(), SlipError> {
        slip.replace(self.current_cell(), value)
    }

    /// Overwrite the top cell of the current list
    pub fn replace_top(&self, slip: &mut Slip, value: impl Into<Value>) -> Result<CellId, SlipError> {
        slip.replace_top(self.current_list(), value)
    }

    /// Overwrite the bottom cell of the current list
    pub fn replace_bot(&self, slip: &mut Slip, value: impl Into<Value>) -> Result<CellId, SlipError> {
        slip.replace_bot(self.current_list(), value)
    }

    /// Relocate `cell` to the left of the current cell
    pub fn move_left(&self, slip: &mut Slip, cell: CellId) -> Result<(), SlipError> {
        slip.move_left(self.current_cell(), cell)
    }

    /// Relocate `cell` to the right of the current cell
    pub fn move_right(&self, slip: &mut Slip, cell: CellId) -> Result<(), SlipError> {
        slip.move_right(self.current_cell(), cell)
    }

    /// Splice the content of `source` left of the current cell
    pub fn move_list_left(&self, slip: &mut Slip, source: CellId) -> Result<(), SlipError> {
        slip.move_list_left(self.current_cell(), source)
    }

    /// Splice the content of `source` right of the current cell
    pub fn move_list_right(&self, slip: &mut Slip, source: CellId) -> Result<(), SlipError> {
        slip.move_list_right(self.current_cell(), source)
    }

    /// Move the cells before the current cell into a new list
    pub fn split_left(&self, slip: &mut Slip) -> Result<CellId, SlipError> {
        slip.split_left(self.current_cell())
    }

    /// Move the cells after the current cell into a new list
    pub fn split_right(&self, slip: &mut Slip) -> Result<CellId, SlipError> {
        slip.split_right(self.current_cell())
    }

    /// Detach the current cell without freeing it. The cursor steps to the
    /// preceding cell (or the Header).
    pub fn unlink(&mut self, slip: &mut Slip) -> Result<CellId, SlipError> {
        let cell = self.current_cell();
        let prev = step_linear(slip, cell, Search::Word, false, "unlink")?;
        slip.unlink(cell)?;
        self.chain.set_current(prev);
        Ok(cell)
    }

    /// Delete the current cell. The cursor steps to the preceding cell
    /// (or the Header).
    pub fn delete_cell(&mut self, slip: &mut Slip) -> Result<Value, SlipError> {
        let cell = self.current_cell();
        let prev = step_linear(slip, cell, Search::Word, false, "delete_cell")?;
        let value = slip.delete_cell(cell)?;
        self.chain.set_current(prev);
        Ok(value)
    }

    /// Delete the current list, consuming the cursor
    pub fn delete_list(self, slip: &mut Slip, policy: DeletePolicy) -> Result<(), SlipError> {
        slip.delete_list(self.current_list(), policy)
    }

    /// Empty the current list and denote its Header
    pub fn flush(&mut self, slip: &mut Slip) -> Result<(), SlipError> {
        slip.flush(self.current_list())?;
        self.chain.reset();
        Ok(())
    }

    // -------------------------------------------------------------------
    // Assignment
    // -------------------------------------------------------------------

    /// Rebind to a fresh cursor over `target`
    pub fn assign_list(&mut self, slip: &Slip, target: CellId) -> Result<&mut Self, SlipError> {
        *self = Reader::new(slip, target)?;
        Ok(self)
    }

    /// Overwrite the current cell with `value`
    pub fn set(&mut self, slip: &mut Slip, value: impl Into<Value>) -> Result<&mut Self, SlipError> {
        slip.replace(self.current_cell(), value)?;
        Ok(self)
    }

    /// Overwrite the current cell with the value `other` denotes
    pub fn assign_from(&mut self, slip: &mut Slip, other: &Reader) -> Result<&mut Self, SlipError> {
        let value = other.value(slip)?;
        self.set(slip, value)
    }

    // -------------------------------------------------------------------
    // Text output
    // -------------------------------------------------------------------

    /// Write the current list, indented
    pub fn write<W: io::Write>(&self, slip: &Slip, out: &mut W) -> Result<(), SlipError> {
        slip.write(self.current_list(), out)
    }

    /// Write the current list on one line
    pub fn write_quick<W: io::Write>(&self, slip: &Slip, out: &mut W) -> Result<(), SlipError> {
        slip.write_quick(self.current_list(), out)
    }

    /// Current list as indented text
    pub fn write_to_string(&self, slip: &Slip) -> Result<String, SlipError> {
        slip.write_to_string(self.current_list())
    }

    /// Text of the current cell
    pub fn to_text(&self, slip: &Slip) -> Result<String, SlipError> {
        slip.to_text(self.current_cell())
    }

    /// Cell table of the current list
    pub fn dump(&self, slip: &Slip) -> Result<String, SlipError> {
        slip.dump(self.current_list())
    }
}

/// Cursors are equal when they denote the same cell of the same list
impl PartialEq for Reader {
    fn eq(&self, other: &Self) -> bool {
        self.current_list() == other.current_list() && self.current_cell() == other.current_cell()
    }
}

impl Eq for Reader {}

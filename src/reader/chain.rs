//! Structured cursor engine
//!
//! A cursor is a stack of frames, one per list level it has descended
//! into. The head frame is the most deeply nested one; the rest form its
//! back-chain up to the depth-0 frame over the top list.
//!
//! Structured traversal is an iterative depth-first walk: entering a
//! sublist pushes a frame, reaching a nested Header pops one and resumes
//! after the sublist cell in the parent. Because the stack is kept in the
//! cursor rather than on the call stack, the walk pauses after every stop
//! and resumes on the next call.

use std::fmt;
use std::str::FromStr;

use tracing::trace;

use crate::cell::{CellId, CellKind};
use crate::list::{rename, Slip};
use crate::SlipError;

/// Whether a traversal may cross list boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Stay within the current list
    Linear,
    /// Descend into sublists and return from them
    Structured,
}

/// Which cells end a traversal step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Search {
    /// Datum cells only
    Element,
    /// Sublist cells only
    Name,
    /// Any Datum or Sublist cell
    Word,
}

impl Search {
    /// Cell of `kind` ends the step. Headers always end a linear step.
    #[inline]
    pub fn matches(self, kind: CellKind) -> bool {
        matches!(
            (self, kind),
            (Search::Element, CellKind::Datum)
                | (Search::Name, CellKind::Sublist)
                | (Search::Word, CellKind::Datum)
                | (Search::Word, CellKind::Sublist)
        )
    }
}

/// Traversal direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward the predecessor (bottom to top)
    Left,
    /// Toward the successor (top to bottom)
    Right,
}

/// One of the twelve traversal variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Traversal {
    /// Linear or structured
    pub mode: Mode,
    /// Stopping criterion
    pub search: Search,
    /// Step direction
    pub dir: Direction,
}

impl Traversal {
    /// Build a traversal variant
    pub const fn new(mode: Mode, search: Search, dir: Direction) -> Self {
        Self { mode, search, dir }
    }

    /// Linear, Element, Left
    pub const LEL: Traversal = Traversal::new(Mode::Linear, Search::Element, Direction::Left);
    /// Linear, Element, Right
    pub const LER: Traversal = Traversal::new(Mode::Linear, Search::Element, Direction::Right);
    /// Linear, Name, Left
    pub const LNL: Traversal = Traversal::new(Mode::Linear, Search::Name, Direction::Left);
    /// Linear, Name, Right
    pub const LNR: Traversal = Traversal::new(Mode::Linear, Search::Name, Direction::Right);
    /// Linear, Word, Left
    pub const LWL: Traversal = Traversal::new(Mode::Linear, Search::Word, Direction::Left);
    /// Linear, Word, Right
    pub const LWR: Traversal = Traversal::new(Mode::Linear, Search::Word, Direction::Right);
    /// Structured, Element, Left
    pub const SEL: Traversal = Traversal::new(Mode::Structured, Search::Element, Direction::Left);
    /// Structured, Element, Right
    pub const SER: Traversal = Traversal::new(Mode::Structured, Search::Element, Direction::Right);
    /// Structured, Name, Left
    pub const SNL: Traversal = Traversal::new(Mode::Structured, Search::Name, Direction::Left);
    /// Structured, Name, Right
    pub const SNR: Traversal = Traversal::new(Mode::Structured, Search::Name, Direction::Right);
    /// Structured, Word, Left
    pub const SWL: Traversal = Traversal::new(Mode::Structured, Search::Word, Direction::Left);
    /// Structured, Word, Right
    pub const SWR: Traversal = Traversal::new(Mode::Structured, Search::Word, Direction::Right);

    /// Every variant, in `LEL .. SWR` order
    pub fn all() -> impl Iterator<Item = Traversal> {
        [Mode::Linear, Mode::Structured].into_iter().flat_map(|mode| {
            [Search::Element, Search::Name, Search::Word]
                .into_iter()
                .flat_map(move |search| {
                    [Direction::Left, Direction::Right]
                        .into_iter()
                        .map(move |dir| Traversal::new(mode, search, dir))
                })
        })
    }
}

/// Three-letter code such as `ser` or `lwl`
impl fmt::Display for Traversal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = match self.mode {
            Mode::Linear => 'l',
            Mode::Structured => 's',
        };
        let s = match self.search {
            Search::Element => 'e',
            Search::Name => 'n',
            Search::Word => 'w',
        };
        let d = match self.dir {
            Direction::Left => 'l',
            Direction::Right => 'r',
        };
        write!(f, "{}{}{}", m, s, d)
    }
}

impl FromStr for Traversal {
    type Err = String;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        let lower = code.to_ascii_lowercase();
        let bytes = lower.as_bytes();
        if bytes.len() != 3 {
            return Err(format!("traversal code '{}' must have three letters", code));
        }
        let mode = match bytes[0] {
            b'l' => Mode::Linear,
            b's' => Mode::Structured,
            _ => return Err(format!("unknown traversal mode in '{}'", code)),
        };
        let search = match bytes[1] {
            b'e' => Search::Element,
            b'n' => Search::Name,
            b'w' => Search::Word,
            _ => return Err(format!("unknown search criterion in '{}'", code)),
        };
        let dir = match bytes[2] {
            b'l' => Direction::Left,
            b'r' => Direction::Right,
            _ => return Err(format!("unknown direction in '{}'", code)),
        };
        Ok(Traversal::new(mode, search, dir))
    }
}

/// One frame of a cursor's back-chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderCell {
    /// Cell the frame denotes; equals `list` at the list boundary
    current: CellId,
    /// Header of the list this frame walks
    list: CellId,
    /// Descents from the top list
    depth: usize,
}

impl ReaderCell {
    fn at_header(list: CellId, depth: usize) -> Self {
        Self {
            current: list,
            list,
            depth,
        }
    }

    /// Cell this frame denotes
    pub fn current_cell(&self) -> CellId {
        self.current
    }

    /// Header of this frame's list
    pub fn current_list(&self) -> CellId {
        self.list
    }

    /// Nesting depth; 0 for the top list
    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// Head frame plus back-chain
///
/// `back[i]` is the frame at depth `i`; `back.len() == head.depth` always.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReaderChain {
    head: ReaderCell,
    back: Vec<ReaderCell>,
    /// Set by an explicit `up_level`: the head denotes a sublist whose
    /// contents count as already visited
    resume_after: bool,
}

impl ReaderChain {
    /// Single depth-0 frame at the Header of `list`
    pub(crate) fn new(list: CellId) -> Self {
        Self {
            head: ReaderCell::at_header(list, 0),
            back: Vec::new(),
            resume_after: false,
        }
    }

    pub(crate) fn head(&self) -> &ReaderCell {
        &self.head
    }

    /// Frames from the head back to depth 0
    pub(crate) fn frames(&self) -> impl Iterator<Item = &ReaderCell> {
        std::iter::once(&self.head).chain(self.back.iter().rev())
    }

    /// Header of the depth-0 list
    pub(crate) fn top_list(&self) -> CellId {
        self.back.first().unwrap_or(&self.head).list
    }

    /// Point the head frame at another cell of its list
    pub(crate) fn set_current(&mut self, cell: CellId) {
        self.head.current = cell;
        self.resume_after = false;
    }

    /// Push a frame over the list named by `sublist`
    pub(crate) fn down_level(&mut self, slip: &Slip, sublist: CellId, op: &'static str) -> Result<(), SlipError> {
        let header = slip.header_of(sublist).map_err(|e| rename(e, op))?;
        let depth = self.head.depth + 1;
        if let Some(limit) = slip.config().max_depth {
            if depth > limit {
                return Err(SlipError::DepthLimit {
                    op,
                    cell: sublist,
                    limit,
                    site: site!(),
                });
            }
        }
        let parent = std::mem::replace(&mut self.head, ReaderCell::at_header(header, depth));
        self.back.push(parent);
        self.resume_after = false;
        trace!(depth, list = header.0, "entered sublist");
        Ok(())
    }

    /// Pop the head frame. The parent denotes the sublist cell that was
    /// entered. Returns false at depth 0.
    fn pop_frame(&mut self) -> bool {
        match self.back.pop() {
            Some(parent) => {
                trace!(depth = parent.depth, list = parent.list.0, "left sublist");
                self.head = parent;
                true
            }
            None => false,
        }
    }

    /// Return to the containing list; no-op at depth 0
    pub(crate) fn up_level(&mut self) {
        if self.pop_frame() {
            self.resume_after = true;
        }
    }

    /// Pop to depth 0 and move to the top Header
    pub(crate) fn reset_top(&mut self) {
        if let Some(top) = self.back.first().copied() {
            self.head = top;
            self.back.clear();
        }
        self.reset();
    }

    /// Move the head frame to its list boundary
    pub(crate) fn reset(&mut self) {
        self.head.current = self.head.list;
        self.resume_after = false;
    }

    /// Run one traversal step
    pub(crate) fn advance(&mut self, slip: &Slip, traversal: Traversal, op: &'static str) -> Result<(), SlipError> {
        let rightward = traversal.dir == Direction::Right;
        match traversal.mode {
            Mode::Linear => {
                let next = step_linear(slip, self.head.current, traversal.search, rightward, op)?;
                self.set_current(next);
                Ok(())
            }
            Mode::Structured => self.advance_structured(slip, traversal.search, rightward, op),
        }
    }

    fn advance_structured(
        &mut self,
        slip: &Slip,
        search: Search,
        rightward: bool,
        op: &'static str,
    ) -> Result<(), SlipError> {
        // Stopping on a sublist leaves its contents as the next thing to visit
        let mut enter = !std::mem::take(&mut self.resume_after)
            && kind_of(slip, self.head.current, op)? == CellKind::Sublist;

        loop {
            if enter {
                self.down_level(slip, self.head.current, op)?;
                enter = false;
            }

            let from = self.head.current;
            let next = slip.step(from, rightward);
            let kind = kind_of(slip, next, op)?;
            if next == from && kind != CellKind::Header {
                return Err(SlipError::NotLinked {
                    op,
                    cell: from,
                    site: site!(),
                });
            }
            self.head.current = next;

            match kind {
                CellKind::Header => {
                    if !self.pop_frame() {
                        return Ok(());
                    }
                }
                CellKind::Sublist => {
                    if search.matches(kind) {
                        return Ok(());
                    }
                    enter = true;
                }
                CellKind::Datum => {
                    if search.matches(kind) {
                        return Ok(());
                    }
                }
            }
        }
    }
}

/// Step along one list until a cell matching `search` or the Header
pub(crate) fn step_linear(
    slip: &Slip,
    from: CellId,
    search: Search,
    rightward: bool,
    op: &'static str,
) -> Result<CellId, SlipError> {
    let mut cursor = from;
    loop {
        cursor = slip.step(cursor, rightward);
        let kind = kind_of(slip, cursor, op)?;
        // Only a detached cell steps onto itself
        if cursor == from && kind != CellKind::Header {
            return Err(SlipError::NotLinked {
                op,
                cell: from,
                site: site!(),
            });
        }
        if kind == CellKind::Header || search.matches(kind) {
            return Ok(cursor);
        }
    }
}

fn kind_of(slip: &Slip, cell: CellId, op: &'static str) -> Result<CellKind, SlipError> {
    slip.kind(cell).map_err(|e| rename(e, op))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Value;

    #[test]
    fn test_traversal_codes() {
        let codes: Vec<String> = Traversal::all().map(|t| t.to_string()).collect();
        assert_eq!(
            codes,
            vec!["lel", "ler", "lnl", "lnr", "lwl", "lwr", "sel", "ser", "snl", "snr", "swl", "swr"]
        );
        for t in Traversal::all() {
            assert_eq!(t.to_string().parse::<Traversal>().unwrap(), t);
        }
        assert!("sx".parse::<Traversal>().is_err());
        assert!("qer".parse::<Traversal>().is_err());
    }

    #[test]
    fn test_search_matches() {
        assert!(Search::Element.matches(CellKind::Datum));
        assert!(!Search::Element.matches(CellKind::Sublist));
        assert!(Search::Name.matches(CellKind::Sublist));
        assert!(Search::Word.matches(CellKind::Datum));
        assert!(!Search::Word.matches(CellKind::Header));
    }

    #[test]
    fn test_frame_push_pop_depths() {
        let mut slip = Slip::new();
        let top = slip.new_list().unwrap();
        let inner = slip.new_list().unwrap();
        let sub = slip.push(top, Value::List(inner)).unwrap();

        let mut chain = ReaderChain::new(top);
        chain.set_current(sub);
        chain.down_level(&slip, sub, "test").unwrap();
        assert_eq!(chain.head().depth(), 1);
        assert_eq!(chain.head().current_cell(), inner);
        assert_eq!(chain.top_list(), top);
        assert_eq!(chain.frames().count(), 2);

        chain.up_level();
        assert_eq!(chain.head().depth(), 0);
        assert_eq!(chain.head().current_cell(), sub);

        // No-op at the top
        chain.up_level();
        assert_eq!(chain.head().depth(), 0);
    }

    #[test]
    fn test_depth_limit() {
        let mut slip = Slip::with_config(crate::SlipConfig::default().with_max_depth(0)).unwrap();
        let top = slip.new_list().unwrap();
        let inner = slip.new_list().unwrap();
        slip.push(inner, 1i64).unwrap();
        slip.push(top, Value::List(inner)).unwrap();

        let mut chain = ReaderChain::new(top);
        let search = Traversal::new(Mode::Structured, Search::Element, Direction::Right);
        assert!(matches!(
            chain.advance(&slip, search, "advance_ser"),
            Err(SlipError::DepthLimit { limit: 0, .. })
        ));
    }

    #[test]
    fn test_linear_step_on_detached_cell_fails() {
        let mut slip = Slip::new();
        let list = slip.new_list().unwrap();
        let cell = slip.push(list, 1i64).unwrap();
        slip.unlink(cell).unwrap();
        assert!(matches!(
            step_linear(&slip, cell, Search::Name, true, "advance_lnr"),
            Err(SlipError::NotLinked { .. })
        ));
    }
}

//! Cell representation
//!
//! Every addressable unit of a list structure is a cell living in the
//! [`CellArena`](crate::arena::CellArena):
//! - Header: sentinel of a circular doubly-linked list
//! - Sublist: names a Header, nesting that list inside another one
//! - Datum: scalar value
//!
//! Links are arena indices. A Header's links close the circle back onto
//! itself; an unlinked non-header cell points at itself in both
//! directions.

mod datum;

pub use datum::Datum;

use std::fmt;

/// Handle to a cell in the arena
///
/// Slot index plus the slot's generation at allocation time. Releasing a
/// cell bumps its slot's generation, so an old handle never aliases the
/// cell that later reuses the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub(crate) u32, pub(crate) u32);

impl CellId {
    /// Arena slot index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Slot generation this handle was issued under
    #[inline]
    pub fn generation(self) -> u32 {
        self.1
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.1 == 0 {
            write!(f, "#{}", self.0)
        } else {
            write!(f, "#{}.{}", self.0, self.1)
        }
    }
}

/// Variant of a live cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// List sentinel
    Header,
    /// Reference to a nested list
    Sublist,
    /// Scalar value
    Datum,
}

/// Anything that can occupy a list position
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Scalar value
    Datum(Datum),
    /// Nested list, given by its Header
    List(CellId),
}

impl Value {
    /// Scalar payload, if any
    pub fn as_datum(&self) -> Option<&Datum> {
        match self {
            Value::Datum(d) => Some(d),
            Value::List(_) => None,
        }
    }

    /// Header of a nested list, if any
    pub fn as_list(&self) -> Option<CellId> {
        match self {
            Value::List(h) => Some(*h),
            Value::Datum(_) => None,
        }
    }
}

impl From<Datum> for Value {
    fn from(d: Datum) -> Self {
        Value::Datum(d)
    }
}

macro_rules! value_from_scalar {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::Datum(Datum::from(v))
                }
            }
        )*
    };
}

value_from_scalar!(bool, char, u8, i32, i64, u64, f64, &str, String);

/// List-level bookkeeping stored in a Header cell
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct HeaderData {
    /// Number of Sublist cells naming this Header
    pub(crate) ref_count: usize,

    /// Opaque user tag
    pub(crate) mark: u64,

    /// Attribute list (exclusively owned Header)
    pub(crate) descriptor: Option<CellId>,
}

/// Payload of an arena slot
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CellBody {
    Header(HeaderData),
    Sublist(CellId),
    Datum(Datum),
    /// Slot sits on the free list
    Free,
}

/// One arena record: two links and a payload
#[derive(Debug, Clone)]
pub(crate) struct Cell {
    pub(crate) left: CellId,
    pub(crate) right: CellId,
    pub(crate) body: CellBody,
}

impl Cell {
    /// Fresh record whose links point at its own slot
    pub(crate) fn detached(id: CellId, body: CellBody) -> Self {
        Self {
            left: id,
            right: id,
            body,
        }
    }

    pub(crate) fn kind(&self) -> Option<CellKind> {
        match self.body {
            CellBody::Header(_) => Some(CellKind::Header),
            CellBody::Sublist(_) => Some(CellKind::Sublist),
            CellBody::Datum(_) => Some(CellKind::Datum),
            CellBody::Free => None,
        }
    }

    pub(crate) fn header(&self) -> Option<&HeaderData> {
        match &self.body {
            CellBody::Header(h) => Some(h),
            _ => None,
        }
    }

    pub(crate) fn header_mut(&mut self) -> Option<&mut HeaderData> {
        match &mut self.body {
            CellBody::Header(h) => Some(h),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_conversions() {
        assert_eq!(Value::from(5i64), Value::Datum(Datum::Long(5)));
        assert_eq!(Value::from("x").as_datum(), Some(&Datum::Str("x".into())));
        assert_eq!(Value::List(CellId(3, 0)).as_list(), Some(CellId(3, 0)));
        assert_eq!(Value::from(true).as_list(), None);
    }

    #[test]
    fn test_detached_cell_kind() {
        let cell = Cell::detached(CellId(1, 0), CellBody::Sublist(CellId(0, 0)));
        assert_eq!(cell.left, CellId(1, 0));
        assert_eq!(cell.right, CellId(1, 0));
        assert_eq!(cell.kind(), Some(CellKind::Sublist));
        assert!(cell.header().is_none());
        assert_eq!(Cell::detached(CellId(2, 0), CellBody::Free).kind(), None);
    }
}

//! # SLIP: Symmetric List Processor
//!
//! Doubly-linked, reference-counted lists with typed scalar cells,
//! sublist nesting, and resumable cursors.
//!
//! ## Core pieces
//!
//! 1. **Arena**: every cell lives in one free-list pool owned by a [`Slip`]
//!    context; handles are [`CellId`]s.
//! 2. **Lists**: a Header sentinel closes a circular doubly-linked list.
//!    Nesting is done with Sublist cells that name another Header and bump
//!    its reference count.
//! 3. **Reader**: a cursor that walks one list linearly, or the whole nested
//!    structure depth-first, keeping an explicit stack of frames so the walk
//!    can be paused and resumed between calls.
//!
//! ## Usage Example
//!
//! ```
//! use slip::{Reader, Slip};
//!
//! let mut slip = Slip::new();
//! let top = slip.parse("(a b (c (d) e) f)")?;
//!
//! let mut reader = Reader::new(&slip, top)?;
//! reader.advance_ser(&slip)?.advance_ser(&slip)?.advance_ser(&slip)?;
//! assert_eq!(reader.to_text(&slip)?, "\"c\"");
//! assert_eq!(reader.list_depth(), 1);
//! # Ok::<(), slip::SlipError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]
#![allow(clippy::new_without_default)]

/// Location of error detection, captured at the call site of the check
macro_rules! site {
    () => {
        $crate::Site {
            file: file!(),
            line: line!(),
        }
    };
}

pub mod arena; // Free-list cell pool
pub mod cell; // Cell records, datums, values
pub mod list; // Slip context and list operations
pub mod reader; // Cursors
pub mod text; // Text list format

pub use arena::{ArenaStats, CellArena};
pub use cell::{CellId, CellKind, Datum, Value};
pub use list::{DeletePolicy, Slip};
pub use reader::{Direction, Mode, Reader, ReaderCell, Search, Sequencer, Traversal};

use std::fmt;
use thiserror::Error;

/// Configuration parameters for a [`Slip`] context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlipConfig {
    /// Cells reserved up front
    pub initial_capacity: usize,

    /// Ceiling on simultaneously live cells (unbounded when `None`)
    pub max_cells: Option<usize>,

    /// Deepest nesting a structured traversal may enter (unbounded when `None`)
    pub max_depth: Option<usize>,
}

impl Default for SlipConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 1024,
            max_cells: None,
            max_depth: None,
        }
    }
}

impl SlipConfig {
    /// Default configuration with explicit initial capacity
    pub fn with_capacity(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            ..Self::default()
        }
    }

    /// Cap the number of live cells
    pub fn with_max_cells(mut self, max_cells: usize) -> Result<Self, SlipError> {
        self.max_cells = Some(max_cells);
        self.validate()?;
        Ok(self)
    }

    /// Bound structured descent
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Check parameters are mutually consistent
    pub fn validate(&self) -> Result<(), SlipError> {
        if let Some(max) = self.max_cells {
            if max == 0 {
                return Err(SlipError::InvalidConfiguration(
                    "max cells must be > 0".to_string(),
                ));
            }
            if self.initial_capacity > max {
                return Err(SlipError::InvalidConfiguration(format!(
                    "initial capacity {} exceeds max cells {}",
                    self.initial_capacity, max
                )));
            }
        }
        Ok(())
    }
}

/// Source position where a violation was detected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Site {
    /// Source file
    pub file: &'static str,
    /// Line within `file`
    pub line: u32,
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Errors reported by list and cursor operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SlipError {
    /// Operand had to be a list header
    #[error("{op}: {cell} is not a list header ({site})")]
    NotAHeader {
        /// Failing operation
        op: &'static str,
        /// Offending cell
        cell: CellId,
        /// Detection site
        site: Site,
    },

    /// Operand had to be a sublist cell
    #[error("{op}: {cell} is not a sublist ({site})")]
    NotASublist {
        /// Failing operation
        op: &'static str,
        /// Offending cell
        cell: CellId,
        /// Detection site
        site: Site,
    },

    /// Headers are never replaced in place by values
    #[error("{op}: header {cell} cannot be replaced in place ({site})")]
    HeaderReplacement {
        /// Failing operation
        op: &'static str,
        /// Header that was targeted
        cell: CellId,
        /// Detection site
        site: Site,
    },

    /// Operation needs at least one cell in the list
    #[error("{op}: list {list} is empty ({site})")]
    EmptyList {
        /// Failing operation
        op: &'static str,
        /// Empty list
        list: CellId,
        /// Detection site
        site: Site,
    },

    /// Handle refers to a cell already released to the arena
    #[error("{op}: {cell} has been released ({site})")]
    StaleCell {
        /// Failing operation
        op: &'static str,
        /// Released cell
        cell: CellId,
        /// Detection site
        site: Site,
    },

    /// Cell must be a member of some list
    #[error("{op}: {cell} is not linked into a list ({site})")]
    NotLinked {
        /// Failing operation
        op: &'static str,
        /// Unlinked cell
        cell: CellId,
        /// Detection site
        site: Site,
    },

    /// Cell must be detached before it can be linked or released
    #[error("{op}: {cell} is already linked into a list ({site})")]
    AlreadyLinked {
        /// Failing operation
        op: &'static str,
        /// Linked cell
        cell: CellId,
        /// Detection site
        site: Site,
    },

    /// Strict delete of a list that sublists still name
    #[error("{op}: list {list} is still referenced by {refs} sublist(s) ({site})")]
    ListReferenced {
        /// Failing operation
        op: &'static str,
        /// Referenced list
        list: CellId,
        /// Outstanding references
        refs: usize,
        /// Detection site
        site: Site,
    },

    /// Splice source and destination are the same list
    #[error("{op}: cannot splice list {list} next to its own cell {anchor} ({site})")]
    SelfSplice {
        /// Failing operation
        op: &'static str,
        /// List being spliced
        list: CellId,
        /// Destination cell
        anchor: CellId,
        /// Detection site
        site: Site,
    },

    /// Structured traversal tried to nest deeper than configured
    #[error("{op}: entering {cell} would exceed depth limit {limit} ({site})")]
    DepthLimit {
        /// Failing operation
        op: &'static str,
        /// Sublist that would have been entered
        cell: CellId,
        /// Configured limit
        limit: usize,
        /// Detection site
        site: Site,
    },

    /// Cell pool is full
    #[error("arena exhausted: {limit} cells in use")]
    ArenaExhausted {
        /// Live-cell ceiling that was hit
        limit: usize,
    },

    /// Invalid configuration parameters
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Writing list text to an output stream failed
    #[error("i/o error: {0}")]
    Io(String),

    /// Malformed list text
    #[error("parse error at {line}:{column}: {message}")]
    Parse {
        /// 1-based line
        line: usize,
        /// 1-based column
        column: usize,
        /// What was wrong
        message: String,
    },
}

impl SlipError {
    /// Name of the operation that failed, when one applies
    pub fn op(&self) -> Option<&'static str> {
        match self {
            SlipError::NotAHeader { op, .. }
            | SlipError::NotASublist { op, .. }
            | SlipError::HeaderReplacement { op, .. }
            | SlipError::EmptyList { op, .. }
            | SlipError::StaleCell { op, .. }
            | SlipError::NotLinked { op, .. }
            | SlipError::AlreadyLinked { op, .. }
            | SlipError::ListReferenced { op, .. }
            | SlipError::SelfSplice { op, .. }
            | SlipError::DepthLimit { op, .. } => Some(op),
            _ => None,
        }
    }

    /// Where the violation was detected
    pub fn site(&self) -> Option<Site> {
        match self {
            SlipError::NotAHeader { site, .. }
            | SlipError::NotASublist { site, .. }
            | SlipError::HeaderReplacement { site, .. }
            | SlipError::EmptyList { site, .. }
            | SlipError::StaleCell { site, .. }
            | SlipError::NotLinked { site, .. }
            | SlipError::AlreadyLinked { site, .. }
            | SlipError::ListReferenced { site, .. }
            | SlipError::SelfSplice { site, .. }
            | SlipError::DepthLimit { site, .. } => Some(*site),
            _ => None,
        }
    }

    /// Cells involved in the violation
    pub fn cells(&self) -> Vec<CellId> {
        match self {
            SlipError::NotAHeader { cell, .. }
            | SlipError::NotASublist { cell, .. }
            | SlipError::HeaderReplacement { cell, .. }
            | SlipError::StaleCell { cell, .. }
            | SlipError::NotLinked { cell, .. }
            | SlipError::AlreadyLinked { cell, .. }
            | SlipError::DepthLimit { cell, .. } => vec![*cell],
            SlipError::EmptyList { list, .. } | SlipError::ListReferenced { list, .. } => {
                vec![*list]
            }
            SlipError::SelfSplice { list, anchor, .. } => vec![*list, *anchor],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        assert!(SlipConfig::default().validate().is_ok());
        assert!(SlipConfig::with_capacity(16).with_max_cells(0).is_err());
        assert!(SlipConfig::with_capacity(16).with_max_cells(8).is_err());

        let config = SlipConfig::with_capacity(8)
            .with_max_cells(64)
            .unwrap()
            .with_max_depth(4);
        assert_eq!(config.max_cells, Some(64));
        assert_eq!(config.max_depth, Some(4));
    }

    #[test]
    fn test_error_carries_site_and_cells() {
        let err = SlipError::SelfSplice {
            op: "move_list_left",
            list: CellId(1, 0),
            anchor: CellId(4, 0),
            site: site!(),
        };
        assert_eq!(err.op(), Some("move_list_left"));
        assert_eq!(err.cells(), vec![CellId(1, 0), CellId(4, 0)]);
        let site = err.site().unwrap();
        assert!(site.file.ends_with("lib.rs"));
        assert!(err.to_string().contains("#1"));
    }
}

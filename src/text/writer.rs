//! List writer and cell dumps

use std::collections::HashSet;
use std::fmt::Write as _;
use std::io;

use crate::cell::{CellBody, CellId, Value};
use crate::list::{rename, Slip};
use crate::SlipError;

const INDENT: usize = 2;

/// One open list while rendering
struct Open {
    list: CellId,
    cursor: CellId,
    /// Nothing written after the opening paren yet
    first: bool,
    /// Last item written was a nested list
    after_sublist: bool,
}

impl Slip {
    /// Write `list` as indented text, one nested list per line
    pub fn write<W: io::Write>(&self, list: CellId, out: &mut W) -> Result<(), SlipError> {
        let text = self.render("write", list, true)?;
        out.write_all(text.as_bytes())
            .and_then(|_| out.flush())
            .map_err(|e| SlipError::Io(e.to_string()))
    }

    /// Write `list` on a single line
    pub fn write_quick<W: io::Write>(&self, list: CellId, out: &mut W) -> Result<(), SlipError> {
        let text = self.render("write_quick", list, false)?;
        out.write_all(text.as_bytes())
            .and_then(|_| out.flush())
            .map_err(|e| SlipError::Io(e.to_string()))
    }

    /// Indented text of `list`
    pub fn write_to_string(&self, list: CellId) -> Result<String, SlipError> {
        self.render("write_to_string", list, true)
    }

    /// Single-line text of `list`
    pub fn write_quick_to_string(&self, list: CellId) -> Result<String, SlipError> {
        self.render("write_quick_to_string", list, false)
    }

    /// Text of one cell. A Sublist or Header prints the whole list.
    pub fn to_text(&self, cell: CellId) -> Result<String, SlipError> {
        match &self.cell("to_text", cell)?.body {
            CellBody::Datum(d) => Ok(d.to_string()),
            CellBody::Sublist(h) => self.render("to_text", *h, false),
            _ => self.render("to_text", cell, false),
        }
    }

    /// Cell table of `list`, its descriptor and every list reachable from
    /// it, each list listed once
    pub fn dump(&self, list: CellId) -> Result<String, SlipError> {
        self.expect_header("dump", list)?;
        let mut out = String::new();
        let mut seen = HashSet::new();
        let mut pending = vec![list];

        while let Some(header) = pending.pop() {
            if !seen.insert(header) {
                continue;
            }
            let data = self.header_data("dump", header)?;
            let (left, right) = self.links(header);
            let _ = writeln!(
                out,
                "{:>6}  header   L={:<6} R={:<6} refs={} mark={}{}",
                header.to_string(),
                left.to_string(),
                right.to_string(),
                data.ref_count,
                data.mark,
                data.descriptor
                    .map(|d| format!(" descr={}", d))
                    .unwrap_or_default()
            );
            if let Some(d) = data.descriptor {
                pending.push(d);
            }

            for cell in self.cells(header)? {
                let (left, right) = self.links(cell);
                let (kind, payload) = match &self.cell("dump", cell)?.body {
                    CellBody::Datum(d) => ("datum", format!("{} {}", d.type_name(), d)),
                    CellBody::Sublist(h) => {
                        pending.push(*h);
                        ("sublist", format!("-> {}", h))
                    }
                    _ => ("free", String::new()),
                };
                let _ = writeln!(
                    out,
                    "{:>6}  {:<8} L={:<6} R={:<6} {}",
                    cell.to_string(),
                    kind,
                    left.to_string(),
                    right.to_string(),
                    payload
                );
            }
        }
        Ok(out)
    }

    fn render(&self, op: &'static str, list: CellId, pretty: bool) -> Result<String, SlipError> {
        self.expect_header(op, list)?;
        let mut out = String::new();
        let first = self.open_list(op, &mut out, list)?;
        let mut stack = vec![Open {
            list,
            cursor: list,
            first,
            after_sublist: false,
        }];

        while let Some(top) = stack.last_mut() {
            let next = self.links(top.cursor).1;
            if next == top.list {
                out.push(')');
                stack.pop();
                if let Some(parent) = stack.last_mut() {
                    parent.after_sublist = true;
                }
                continue;
            }
            top.cursor = next;
            let first = std::mem::replace(&mut top.first, false);
            let after_sublist = std::mem::replace(&mut top.after_sublist, false);
            let depth = stack.len();

            match &self.cell(op, next)?.body {
                CellBody::Sublist(h) => {
                    separate(&mut out, first, pretty, depth);
                    let inner_first = self.open_list(op, &mut out, *h)?;
                    stack.push(Open {
                        list: *h,
                        cursor: *h,
                        first: inner_first,
                        after_sublist: false,
                    });
                }
                CellBody::Datum(d) => {
                    separate(&mut out, first, pretty && after_sublist, depth);
                    let _ = write!(out, "{}", d);
                }
                _ => {
                    return Err(SlipError::NotLinked {
                        op,
                        cell: next,
                        site: site!(),
                    })
                }
            }
        }
        Ok(out)
    }

    /// Write mark, paren and descriptor. Returns true when nothing
    /// followed the paren.
    fn open_list(&self, op: &'static str, out: &mut String, list: CellId) -> Result<bool, SlipError> {
        let data = self.header_data(op, list)?;
        if data.mark != 0 {
            let _ = write!(out, "#{}", data.mark);
        }
        out.push('(');

        let attributes = self.attributes(list).map_err(|e| rename(e, op))?;
        if attributes.is_empty() {
            return Ok(true);
        }
        out.push('<');
        for (i, (key, value)) in attributes.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            let _ = write!(out, "{} ", key);
            match value {
                Value::Datum(d) => {
                    let _ = write!(out, "{}", d);
                }
                Value::List(h) => out.push_str(&self.render(op, *h, false)?),
            }
        }
        out.push('>');
        Ok(false)
    }
}

/// Space between items, or a fresh indented line when `newline`. The
/// first item after a paren gets neither.
fn separate(out: &mut String, first: bool, newline: bool, depth: usize) {
    if first {
        return;
    }
    if newline {
        out.push('\n');
        out.extend(std::iter::repeat(' ').take(depth * INDENT));
    } else {
        out.push(' ');
    }
}

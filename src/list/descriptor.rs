//! Descriptor lists: key/value attributes hung off a Header
//!
//! The descriptor is an ordinary list owned by exactly one Header, laid
//! out as alternating key and value cells: `(k1 v1 k2 v2 ...)`. Keys are
//! datums; values may be datums or nested lists.

use super::Slip;
use crate::cell::{CellId, Datum, Value};
use crate::SlipError;

impl Slip {
    /// Descriptor list of `list`, if one exists
    pub fn descriptor(&self, list: CellId) -> Result<Option<CellId>, SlipError> {
        Ok(self.header_data("descriptor", list)?.descriptor)
    }

    /// Attach an empty descriptor list, or return the existing one
    pub fn create_dlist(&mut self, list: CellId) -> Result<CellId, SlipError> {
        if let Some(existing) = self.header_data("create_dlist", list)?.descriptor {
            return Ok(existing);
        }
        let dlist = self.new_list()?;
        self.header_data_mut("create_dlist", list)?.descriptor = Some(dlist);
        Ok(dlist)
    }

    /// Remove the descriptor list. Returns whether one existed.
    pub fn delete_dlist(&mut self, list: CellId) -> Result<bool, SlipError> {
        let Some(dlist) = self.header_data_mut("delete_dlist", list)?.descriptor.take() else {
            return Ok(false);
        };
        self.flush(dlist)?;
        self.release_header(dlist);
        Ok(true)
    }

    /// Set attribute `key`, overwriting an existing value
    pub fn put(
        &mut self,
        list: CellId,
        key: impl Into<Datum>,
        value: impl Into<Value>,
    ) -> Result<(), SlipError> {
        let key = key.into();
        let dlist = self.create_dlist(list)?;
        match self.find_key(dlist, &key) {
            Some((_, value_cell)) => self.set_body("put", value_cell, value.into()),
            None => {
                let value = value.into();
                if let Value::List(h) = value {
                    self.expect_header("put", h)?;
                }
                // Both cells exist before either is linked
                let key_cell = self.new_cell("put", Value::Datum(key))?;
                let value_cell = match self.new_cell("put", value) {
                    Ok(cell) => cell,
                    Err(e) => {
                        self.release_cell(key_cell);
                        return Err(e);
                    }
                };
                self.link_left_of(dlist, key_cell);
                self.link_left_of(dlist, value_cell);
                Ok(())
            }
        }
    }

    /// Value of attribute `key`
    pub fn get(&self, list: CellId, key: impl Into<Datum>) -> Result<Option<Value>, SlipError> {
        let Some(dlist) = self.descriptor(list)? else {
            return Ok(None);
        };
        match self.find_key(dlist, &key.into()) {
            Some((_, value_cell)) => self.value(value_cell).map(Some),
            None => Ok(None),
        }
    }

    /// Some attribute has value `value`
    pub fn contains(&self, list: CellId, value: &Value) -> Result<bool, SlipError> {
        Ok(self
            .attributes(list)?
            .iter()
            .any(|(_, candidate)| candidate == value))
    }

    /// Attribute `key` is present
    pub fn contains_key(&self, list: CellId, key: impl Into<Datum>) -> Result<bool, SlipError> {
        let Some(dlist) = self.descriptor(list)? else {
            return Ok(false);
        };
        Ok(self.find_key(dlist, &key.into()).is_some())
    }

    /// Remove attribute `key`. Returns whether it was present.
    pub fn delete_attribute(&mut self, list: CellId, key: impl Into<Datum>) -> Result<bool, SlipError> {
        let Some(dlist) = self.descriptor(list)? else {
            return Ok(false);
        };
        match self.find_key(dlist, &key.into()) {
            Some((key_cell, value_cell)) => {
                self.delete_cell(value_cell)?;
                self.delete_cell(key_cell)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Number of attributes
    pub fn size_dlist(&self, list: CellId) -> Result<usize, SlipError> {
        match self.descriptor(list)? {
            Some(dlist) => Ok(self.size(dlist)? / 2),
            None => Ok(0),
        }
    }

    /// All attributes in insertion order
    pub fn attributes(&self, list: CellId) -> Result<Vec<(Datum, Value)>, SlipError> {
        let Some(dlist) = self.descriptor(list)? else {
            return Ok(Vec::new());
        };
        let cells = self.cells(dlist)?;
        let mut out = Vec::with_capacity(cells.len() / 2);
        for pair in cells.chunks_exact(2) {
            if let Some(key) = self.datum(pair[0]) {
                out.push((key.clone(), self.value(pair[1])?));
            }
        }
        Ok(out)
    }

    /// (key cell, value cell) of `key` in a descriptor list
    fn find_key(&self, dlist: CellId, key: &Datum) -> Option<(CellId, CellId)> {
        let mut cursor = self.links(dlist).1;
        while cursor != dlist {
            let value_cell = self.links(cursor).1;
            if value_cell == dlist {
                break;
            }
            if self.datum(cursor) == Some(key) {
                return Some((cursor, value_cell));
            }
            cursor = self.links(value_cell).1;
        }
        None
    }
}

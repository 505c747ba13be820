#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use slip::{CellId, Reader, Slip, Value};

fn snapshot_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("snapshots")
}

pub fn assert_snapshot(name: &str, actual: &str) {
    let path = snapshot_root().join(name);
    if std::env::var("SLIP_UPDATE_SNAPSHOTS").is_ok() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create snapshot directory");
        }
        fs::write(&path, actual).expect("write snapshot");
        return;
    }

    let expected =
        fs::read_to_string(&path).unwrap_or_else(|_| panic!("snapshot {:?} not found", path));
    if normalize(&expected) != normalize(actual) {
        panic!(
            "Snapshot mismatch for {:?}. Set SLIP_UPDATE_SNAPSHOTS=1 to regenerate.\nExpected:\n{}\nActual:\n{}",
            path,
            expected,
            actual
        );
    }
}

fn normalize(input: &str) -> String {
    input.replace("\r\n", "\n").trim_end().to_string()
}

/// `L1 = (a b (c (d) e) f)` with `L2 = (c (d) e)` and `L3 = (d)`
pub struct Scenario {
    pub slip: Slip,
    pub l1: CellId,
    pub l2: CellId,
    pub l3: CellId,
}

/// Append at the bottom of `list`
pub fn append(slip: &mut Slip, list: CellId, value: impl Into<Value>) -> CellId {
    slip.ins_left(list, value).expect("append succeeds")
}

pub fn scenario() -> Scenario {
    let mut slip = Slip::new();
    let l1 = slip.new_list().unwrap();
    let l2 = slip.new_list().unwrap();
    let l3 = slip.new_list().unwrap();

    append(&mut slip, l3, "d");

    append(&mut slip, l2, "c");
    append(&mut slip, l2, Value::List(l3));
    append(&mut slip, l2, "e");

    append(&mut slip, l1, "a");
    append(&mut slip, l1, "b");
    append(&mut slip, l1, Value::List(l2));
    append(&mut slip, l1, "f");

    Scenario { slip, l1, l2, l3 }
}

impl Scenario {
    /// `a`, `N(L2)` or `L1`, suffixed with `@depth`
    pub fn label(&self, reader: &Reader) -> String {
        let cell = reader.current_cell();
        let name = if let Some(datum) = reader.datum(&self.slip) {
            datum.as_str().map(str::to_string).unwrap_or_else(|| datum.to_string())
        } else if reader.is_sublist(&self.slip) {
            format!("N({})", self.list_name(self.slip.header_of(cell).unwrap()))
        } else {
            self.list_name(cell)
        };
        format!("{}@{}", name, reader.list_depth())
    }

    fn list_name(&self, header: CellId) -> String {
        if header == self.l1 {
            "L1".to_string()
        } else if header == self.l2 {
            "L2".to_string()
        } else if header == self.l3 {
            "L3".to_string()
        } else {
            header.to_string()
        }
    }

    /// Labels of `steps` successive calls of `step`
    pub fn walk<F>(&self, reader: &mut Reader, steps: usize, mut step: F) -> Vec<String>
    where
        F: FnMut(&mut Reader, &Slip),
    {
        (0..steps)
            .map(|_| {
                step(reader, &self.slip);
                self.label(reader)
            })
            .collect()
    }
}

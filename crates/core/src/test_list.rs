//! Ordered list of tests keyed by stable row ids
//!
//! The list owns the `TestFile` payloads; widgets only keep the `RowId`
//! of the entry they render.

use log::debug;
use mcy_create_types::{RowId, TestFile};
use std::collections::HashSet;

/// One entry of a list
#[derive(Debug, Clone, PartialEq)]
pub struct TestRow {
    pub id: RowId,
    pub file: TestFile,
}

/// Ordered map from `RowId` to `TestFile`, plus the current selection
#[derive(Debug, Clone, Default)]
pub struct TestList {
    rows: Vec<TestRow>,
    selected: HashSet<RowId>,
}

impl TestList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a record and return the id of its new row
    pub fn push(&mut self, file: TestFile) -> RowId {
        let id = RowId::new();
        self.rows.push(TestRow { id, file });
        id
    }

    pub fn get(&self, id: RowId) -> Option<&TestFile> {
        self.rows.iter().find(|r| r.id == id).map(|r| &r.file)
    }

    pub fn get_mut(&mut self, id: RowId) -> Option<&mut TestFile> {
        self.rows.iter_mut().find(|r| r.id == id).map(|r| &mut r.file)
    }

    pub fn position(&self, id: RowId) -> Option<usize> {
        self.rows.iter().position(|r| r.id == id)
    }

    pub fn contains(&self, id: RowId) -> bool {
        self.position(id).is_some()
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.rows.iter().any(|r| r.file.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TestRow> {
        self.rows.iter()
    }

    pub fn ids(&self) -> Vec<RowId> {
        self.rows.iter().map(|r| r.id).collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.file.name.as_str())
    }

    pub fn files(&self) -> Vec<TestFile> {
        self.rows.iter().map(|r| r.file.clone()).collect()
    }

    /// Mark or unmark a row as selected. Unknown ids are ignored.
    pub fn select(&mut self, id: RowId, selected: bool) {
        if !self.contains(id) {
            return;
        }
        if selected {
            self.selected.insert(id);
        } else {
            self.selected.remove(&id);
        }
    }

    /// Replace the selection with the given rows
    pub fn set_selection(&mut self, ids: impl IntoIterator<Item = RowId>) {
        self.selected.clear();
        for id in ids {
            self.select(id, true);
        }
    }

    pub fn is_selected(&self, id: RowId) -> bool {
        self.selected.contains(&id)
    }

    /// Selected rows in list order
    pub fn selected(&self) -> Vec<RowId> {
        self.rows
            .iter()
            .filter(|r| self.selected.contains(&r.id))
            .map(|r| r.id)
            .collect()
    }

    /// Remove every selected row and return the removed entries in list order
    pub fn remove_selected(&mut self) -> Vec<TestRow> {
        let selected = std::mem::take(&mut self.selected);
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.rows)
            .into_iter()
            .partition(|r| selected.contains(&r.id));
        self.rows = kept;
        removed
    }

    /// Move a row to `to_index` (clamped to the end of the list).
    /// Returns false if the row does not exist.
    pub fn move_to(&mut self, id: RowId, to_index: usize) -> bool {
        let Some(from) = self.position(id) else {
            return false;
        };
        let row = self.rows.remove(from);
        let to = to_index.min(self.rows.len());
        self.rows.insert(to, row);
        debug!("Moved row {} from {} to {}", id, from, to);
        true
    }
}

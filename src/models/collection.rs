//! Ordered, id-unique collection of records.

use std::collections::HashSet;

use serde::Serialize;

use super::{Record, RecordId};

/// Records in upstream order. No two records share an id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Collection {
    records: Vec<Record>,
}

impl Collection {
    /// Empty collection, the state before the first load.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection, rejecting input that repeats an id.
    ///
    /// Returns the first duplicated id on failure.
    pub fn from_records(records: Vec<Record>) -> Result<Self, RecordId> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id) {
                return Err(record.id);
            }
        }
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn position(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.iter().find(|record| record.id == id)
    }

    /// New collection with the record at `index` swapped for `record`.
    ///
    /// `record` must carry the id already stored at `index`.
    pub(crate) fn replaced_at(&self, index: usize, record: Record) -> Self {
        debug_assert_eq!(self.records[index].id, record.id);
        let mut records = self.records.clone();
        records[index] = record;
        Self { records }
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

//! In-memory file index
//!
//! Stores one [`FileRecord`] per file name: the node holding the file and
//! its size at upload time. The index lives for the lifetime of the
//! coordinator and is never persisted.

use crate::common::Node;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard};

/// Placement metadata for one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub name: String,
    pub size: u64,
    pub node: Node,
    pub stored_at: u64,
}

#[derive(Debug, Default)]
struct Index {
    records: HashMap<String, FileRecord>,
    /// Slots held by uploads that have not finished yet
    in_flight: BTreeSet<usize>,
}

/// Metadata store
#[derive(Debug, Default)]
pub struct MetadataStore {
    index: Mutex<Index>,
}

impl MetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Index> {
        // Every update is a single insert or slot change, so a poisoned
        // index is still consistent.
        self.index.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Reserve the placement slot for a new upload.
    ///
    /// The slot counts stored records plus uploads still in flight, moved
    /// past any slot already held. It is computed and claimed under one
    /// lock, so concurrent uploads never share a slot. With no concurrent
    /// uploads this is exactly the record count.
    pub fn reserve_slot(&self) -> SlotReservation<'_> {
        let mut index = self.lock();
        let mut slot = index.records.len() + index.in_flight.len();
        while index.in_flight.contains(&slot) {
            slot += 1;
        }
        index.in_flight.insert(slot);

        SlotReservation {
            store: self,
            slot,
            active: true,
        }
    }

    /// Get file metadata
    pub fn get(&self, name: &str) -> Option<FileRecord> {
        self.lock().records.get(name).cloned()
    }

    /// List all records, sorted by name
    pub fn list(&self) -> Vec<FileRecord> {
        let mut records: Vec<FileRecord> = self.lock().records.values().cloned().collect();
        records.sort_by(|a, b| a.name.cmp(&b.name));
        records
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A claimed placement slot.
///
/// Committing stores the record; dropping without committing (failed or
/// cancelled upload) gives the slot back and leaves the records untouched.
#[derive(Debug)]
pub struct SlotReservation<'a> {
    store: &'a MetadataStore,
    slot: usize,
    active: bool,
}

impl SlotReservation<'_> {
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Insert or overwrite the record and release the slot.
    pub fn commit(mut self, record: FileRecord) {
        let mut index = self.store.lock();
        index.in_flight.remove(&self.slot);
        index.records.insert(record.name.clone(), record);
        self.active = false;
    }
}

impl Drop for SlotReservation<'_> {
    fn drop(&mut self) {
        if self.active {
            self.store.lock().in_flight.remove(&self.slot);
        }
    }
}

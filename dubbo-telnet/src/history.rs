//! Invocation history.
//!
//! Operators save the invocations they issue (port, service, method,
//! parameters) under a name so they can be replayed later. Storage is
//! behind [`HistoryStore`]; [`MemoryHistory`] keeps records in process.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Fields supplied when saving an invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExecuteRecord {
    pub port: u16,
    pub service: String,
    pub method: String,
    /// Label chosen by the operator.
    pub name: String,
    pub json_params: String,
}

/// A stored invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteRecord {
    pub id: u64,
    pub port: u16,
    pub service: String,
    pub method: String,
    pub name: String,
    pub json_params: String,
    pub created_at: SystemTime,
    pub modified_at: SystemTime,
    pub valid: bool,
}

/// Persistence boundary for invocation history.
pub trait HistoryStore: Send + Sync {
    /// Store a new record and return its id.
    fn save(&self, record: NewExecuteRecord) -> u64;

    /// Remove a record. Returns whether it existed.
    fn delete(&self, id: u64) -> bool;

    /// Replace the editable fields of an existing record. Returns whether a
    /// record with that id existed.
    fn update(&self, record: ExecuteRecord) -> bool;

    /// Records for `port`, oldest first.
    fn list_by_port(&self, port: u16) -> Vec<ExecuteRecord>;
}

/// In-process [`HistoryStore`].
#[derive(Debug)]
pub struct MemoryHistory {
    records: Mutex<IndexMap<u64, ExecuteRecord>>,
    next_id: AtomicU64,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(IndexMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }

    fn records(&self) -> MutexGuard<'_, IndexMap<u64, ExecuteRecord>> {
        // Records stay consistent even if a holder panicked.
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore for MemoryHistory {
    fn save(&self, record: NewExecuteRecord) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let now = SystemTime::now();
        let stored = ExecuteRecord {
            id,
            port: record.port,
            service: record.service,
            method: record.method,
            name: record.name,
            json_params: record.json_params,
            created_at: now,
            modified_at: now,
            valid: true,
        };
        debug!("saving invocation {} ({}.{})", id, stored.service, stored.method);
        self.records().insert(id, stored);
        id
    }

    fn delete(&self, id: u64) -> bool {
        self.records().shift_remove(&id).is_some()
    }

    fn update(&self, record: ExecuteRecord) -> bool {
        let mut records = self.records();
        let Some(existing) = records.get_mut(&record.id) else {
            warn!("no invocation with id {} to update", record.id);
            return false;
        };

        debug!(
            "updating invocation {}: name={}, port={}, service={}, method={}",
            record.id, record.name, record.port, record.service, record.method
        );
        existing.port = record.port;
        existing.service = record.service;
        existing.method = record.method;
        existing.name = record.name;
        existing.json_params = record.json_params;
        existing.valid = record.valid;
        existing.modified_at = SystemTime::now();
        true
    }

    fn list_by_port(&self, port: u16) -> Vec<ExecuteRecord> {
        self.records()
            .values()
            .filter(|record| record.port == port)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_record(port: u16, name: &str) -> NewExecuteRecord {
        NewExecuteRecord {
            port,
            service: "com.foo.BarService".into(),
            method: "sayHello".into(),
            name: name.into(),
            json_params: r#""world""#.into(),
        }
    }

    #[test]
    fn test_save_assigns_increasing_ids() {
        let history = MemoryHistory::new();
        let first = history.save(new_record(20880, "a"));
        let second = history.save(new_record(20880, "b"));
        assert!(second > first);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_list_by_port_in_insertion_order() {
        let history = MemoryHistory::new();
        history.save(new_record(20880, "first"));
        history.save(new_record(31361, "other port"));
        history.save(new_record(20880, "second"));

        let names: Vec<_> = history
            .list_by_port(20880)
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["first", "second"]);
        assert!(history.list_by_port(1).is_empty());
    }

    #[test]
    fn test_update_keeps_creation_time() {
        let history = MemoryHistory::new();
        let id = history.save(new_record(20880, "draft"));
        let mut record = history.list_by_port(20880).remove(0);
        let created = record.created_at;

        record.name = "final".into();
        record.json_params = r#""moon""#.into();
        assert!(history.update(record));

        let updated = history.list_by_port(20880).remove(0);
        assert_eq!(updated.id, id);
        assert_eq!(updated.name, "final");
        assert_eq!(updated.json_params, r#""moon""#);
        assert_eq!(updated.created_at, created);
        assert!(updated.modified_at >= created);
    }

    #[test]
    fn test_update_missing_record() {
        let history = MemoryHistory::new();
        let id = history.save(new_record(20880, "x"));
        let mut record = history.list_by_port(20880).remove(0);
        assert!(history.delete(id));
        record.name = "gone".into();
        assert!(!history.update(record));
    }

    #[test]
    fn test_delete() {
        let history = MemoryHistory::new();
        let id = history.save(new_record(20880, "x"));
        assert!(history.delete(id));
        assert!(!history.delete(id));
        assert!(history.is_empty());
    }
}

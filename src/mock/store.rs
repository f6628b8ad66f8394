//! In-memory record store backing the mock responder.
//!
//! # Responsibilities
//! - Keep an ordered sequence of records per collection
//! - Generate identifiers unique within a collection
//! - Apply create/replace/merge/delete atomically per collection
//!
//! # Design Decisions
//! - `DashMap` shards the collection index; each collection has its own mutex
//! - Id generation and append happen under the same lock
//! - Reads never create a collection; writes create it on first use
//! - Deleted ids are never handed out again, not even after `clear`
//! - Collections without records are not reported

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dashmap::DashMap;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::config::IdStrategy;
use crate::observability::metrics;

/// Identifier of a stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordId {
    Sequential(u64),
    Uuid(Uuid),
}

impl RecordId {
    /// JSON form: a number for sequential ids, a string for UUIDs.
    pub fn to_value(&self) -> Value {
        match self {
            RecordId::Sequential(n) => Value::from(*n),
            RecordId::Uuid(id) => Value::String(id.to_string()),
        }
    }

    /// Whether a raw path segment names this id.
    ///
    /// Only the canonical text matches: decimal without sign or leading
    /// zeros, or the hyphenated UUID form (any letter case).
    pub fn matches(&self, raw: &str) -> bool {
        match self {
            RecordId::Sequential(n) => raw == n.to_string(),
            RecordId::Uuid(id) => {
                let mut buf = Uuid::encode_buffer();
                raw.eq_ignore_ascii_case(id.hyphenated().encode_lower(&mut buf))
            }
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Sequential(n) => write!(f, "{}", n),
            RecordId::Uuid(id) => write!(f, "{}", id),
        }
    }
}

#[derive(Debug, Clone)]
struct Record {
    id: RecordId,
    fields: Map<String, Value>,
}

impl Record {
    fn to_value(&self) -> Value {
        let mut object = self.fields.clone();
        object.insert("id".to_string(), self.id.to_value());
        Value::Object(object)
    }
}

#[derive(Debug, Default)]
struct Collection {
    last_seq: u64,
    records: Vec<Record>,
}

impl Collection {
    fn next_id(&mut self, strategy: IdStrategy) -> RecordId {
        match strategy {
            IdStrategy::Sequential => {
                self.last_seq += 1;
                RecordId::Sequential(self.last_seq)
            }
            IdStrategy::Uuid => loop {
                let id = RecordId::Uuid(Uuid::new_v4());
                if !self.records.iter().any(|r| r.id == id) {
                    break id;
                }
            },
        }
    }

    fn find_mut(&mut self, raw_id: &str) -> Option<&mut Record> {
        self.records.iter_mut().find(|r| r.id.matches(raw_id))
    }
}

/// Per-collection summary used by the admin endpoints.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CollectionSummary {
    pub name: String,
    pub count: usize,
}

/// Thread-safe store of synthetic records, one sequence per collection.
#[derive(Debug, Default)]
pub struct MockStore {
    collections: DashMap<String, Arc<Mutex<Collection>>>,
    id_strategy: IdStrategy,
}

impl MockStore {
    /// Create an empty store.
    pub fn new(id_strategy: IdStrategy) -> Self {
        Self {
            collections: DashMap::new(),
            id_strategy,
        }
    }

    fn existing(&self, name: &str) -> Option<Arc<Mutex<Collection>>> {
        self.collections.get(name).map(|entry| Arc::clone(entry.value()))
    }

    fn get_or_create(&self, name: &str) -> Arc<Mutex<Collection>> {
        Arc::clone(self.collections.entry(name.to_string()).or_default().value())
    }

    /// All records of a collection in insertion order. Empty if never written.
    pub fn list(&self, collection: &str) -> Vec<Value> {
        let Some(c) = self.existing(collection) else {
            return Vec::new();
        };
        let guard = lock(&c);
        let records = guard.records.iter().map(Record::to_value).collect();
        records
    }

    /// A single record by id.
    pub fn get(&self, collection: &str, id: &str) -> Option<Value> {
        let c = self.existing(collection)?;
        let mut guard = lock(&c);
        let value = guard.find_mut(id).map(|r| r.to_value());
        value
    }

    /// Append a new record and return it with its generated id.
    ///
    /// Any `id` field in `fields` is replaced by the generated one.
    pub fn create(&self, collection: &str, mut fields: Map<String, Value>) -> Value {
        fields.remove("id");

        let c = self.get_or_create(collection);
        let mut guard = lock(&c);
        let id = guard.next_id(self.id_strategy);
        let record = Record { id, fields };
        let value = record.to_value();
        guard.records.push(record);
        let count = guard.records.len();
        drop(guard);

        tracing::debug!(collection = %collection, id = %id, "Record created");
        metrics::record_store_mutation("create");
        metrics::record_collection_size(collection, count);
        value
    }

    /// Reserve a fresh id without storing anything.
    pub fn reserve_id(&self, collection: &str) -> RecordId {
        let c = self.get_or_create(collection);
        let id = lock(&c).next_id(self.id_strategy);
        id
    }

    /// Replace every field of a record, keeping its id.
    pub fn replace(&self, collection: &str, id: &str, mut fields: Map<String, Value>) -> Option<Value> {
        fields.remove("id");

        let c = self.existing(collection)?;
        let mut guard = lock(&c);
        let record = guard.find_mut(id)?;
        record.fields = fields;
        let value = record.to_value();
        drop(guard);

        metrics::record_store_mutation("replace");
        Some(value)
    }

    /// Shallow-merge fields into a record, keeping its id.
    pub fn merge(&self, collection: &str, id: &str, mut fields: Map<String, Value>) -> Option<Value> {
        fields.remove("id");

        let c = self.existing(collection)?;
        let mut guard = lock(&c);
        let record = guard.find_mut(id)?;
        record.fields.extend(fields);
        let value = record.to_value();
        drop(guard);

        metrics::record_store_mutation("merge");
        Some(value)
    }

    /// Remove a record. Returns false if it did not exist.
    pub fn delete(&self, collection: &str, id: &str) -> bool {
        let Some(c) = self.existing(collection) else {
            return false;
        };

        let mut guard = lock(&c);
        let Some(pos) = guard.records.iter().position(|r| r.id.matches(id)) else {
            return false;
        };
        guard.records.remove(pos);
        let count = guard.records.len();
        drop(guard);

        metrics::record_store_mutation("delete");
        metrics::record_collection_size(collection, count);
        true
    }

    /// Number of records in a collection.
    pub fn len(&self, collection: &str) -> usize {
        let Some(c) = self.existing(collection) else {
            return 0;
        };
        let count = lock(&c).records.len();
        count
    }

    /// True when no collection holds a record.
    pub fn is_empty(&self) -> bool {
        self.collections.iter().all(|entry| {
            let empty = lock(entry.value()).records.is_empty();
            empty
        })
    }

    /// Every collection currently holding records, sorted by name.
    pub fn collections(&self) -> Vec<CollectionSummary> {
        let mut summaries: Vec<CollectionSummary> = self
            .collections
            .iter()
            .filter_map(|entry| {
                let count = lock(entry.value()).records.len();
                (count > 0).then(|| CollectionSummary {
                    name: entry.key().clone(),
                    count,
                })
            })
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        summaries
    }

    /// Remove every record. Id counters survive, so ids stay unique for
    /// the life of the process.
    pub fn clear(&self) {
        for entry in self.collections.iter() {
            lock(entry.value()).records.clear();
            metrics::record_collection_size(entry.key(), 0);
        }
        metrics::record_store_mutation("clear");
        tracing::info!("Mock store cleared");
    }

    pub fn id_strategy(&self) -> IdStrategy {
        self.id_strategy
    }
}

// A panic while holding the lock leaves the collection structurally valid.
fn lock(collection: &Mutex<Collection>) -> MutexGuard<'_, Collection> {
    collection.lock().unwrap_or_else(PoisonError::into_inner)
}

//! In-memory document store
//!
//! Backs the test suite and mirrors the Postgres store's compare-and-swap
//! semantics exactly.

use std::collections::HashMap;
use std::sync::Mutex;

use uuid::Uuid;

use crate::aggregate::RfiAggregate;

use super::{DocumentStore, StoreError};

/// HashMap-backed store with the same CAS contract as Postgres.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<Uuid, RfiAggregate>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, rfi: &RfiAggregate) -> Result<(), StoreError> {
        let mut documents = self.documents.lock().expect("store mutex poisoned");
        if documents.contains_key(&rfi.id()) {
            return Err(StoreError::AlreadyExists(rfi.id()));
        }
        documents.insert(rfi.id(), rfi.clone());
        Ok(())
    }

    async fn update(&self, rfi: &RfiAggregate) -> Result<(), StoreError> {
        let mut documents = self.documents.lock().expect("store mutex poisoned");
        let stored = documents
            .get(&rfi.id())
            .ok_or(StoreError::NotFound(rfi.id()))?;

        if stored.seq() != rfi.seq() {
            return Err(StoreError::Conflict {
                id: rfi.id(),
                expected: rfi.seq(),
                found: stored.seq(),
            });
        }

        let mut next = rfi.clone();
        next.bump_seq();
        documents.insert(rfi.id(), next);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RfiAggregate>, StoreError> {
        let documents = self.documents.lock().expect("store mutex poisoned");
        Ok(documents.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<RfiAggregate>, StoreError> {
        let documents = self.documents.lock().expect("store mutex poisoned");
        let mut all: Vec<RfiAggregate> = documents.values().cloned().collect();
        all.sort_by_key(|rfi| rfi.created_at());
        Ok(all)
    }
}

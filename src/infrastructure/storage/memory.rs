use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::models::Storage;

/// In memory records for tests. Clones share the same records.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    records: Arc<DashMap<String, String>>,
    writes: Arc<AtomicUsize>,
}

impl MemoryStorage {
    pub fn get(&self, name: &str) -> Option<String> {
        return self.records.get(name).map(|e| return e.to_string());
    }

    pub fn insert(&self, name: &str, payload: &str) {
        self.records.insert(name.to_string(), payload.to_string());
    }

    pub fn writes(&self) -> usize {
        return self.writes.load(Ordering::SeqCst);
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    #[allow(clippy::implicit_return)]
    async fn read(&self, name: &str) -> Result<Option<String>> {
        return Ok(self.get(name));
    }

    #[allow(clippy::implicit_return)]
    async fn write(&self, name: &str, payload: &str) -> Result<()> {
        self.insert(name, payload);
        self.writes.fetch_add(1, Ordering::SeqCst);
        return Ok(());
    }
}

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use pinmap_core::{Memory, MemoryPatch, MemoryQuery, NewMemory};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::store::{stats_of, MemoryStore, StoreStats};

/// 内存存储（用于开发/测试）
#[derive(Debug, Default)]
pub struct InMemoryStore {
    memories: RwLock<HashMap<String, Memory>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MemoryStore for InMemoryStore {
    async fn create(&self, new: NewMemory) -> StoreResult<Memory> {
        let memory = Memory::create(new);
        let mut memories = self.memories.write();
        if memories.contains_key(&memory.id) {
            return Err(StoreError::AlreadyExists { id: memory.id });
        }
        memories.insert(memory.id.clone(), memory.clone());
        debug!("Created memory: {}", memory.id);
        Ok(memory)
    }

    async fn find(&self, query: &MemoryQuery) -> StoreResult<Vec<Memory>> {
        let memories = self.memories.read();
        Ok(query.apply(memories.values().cloned()))
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Memory>> {
        Ok(self.memories.read().get(id).cloned())
    }

    async fn update(&self, id: &str, patch: &MemoryPatch) -> StoreResult<Memory> {
        let mut memories = self.memories.write();
        let memory = memories.get_mut(id).ok_or_else(|| StoreError::not_found(id))?;
        memory.apply(patch);
        Ok(memory.clone())
    }

    async fn delete(&self, id: &str) -> StoreResult<Memory> {
        self.memories
            .write()
            .remove(id)
            .ok_or_else(|| StoreError::not_found(id))
    }

    async fn stats(&self) -> StoreResult<StoreStats> {
        Ok(stats_of(self.memories.read().values()))
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

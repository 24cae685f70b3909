use crate::error::StoreResult;
use crate::kv::KvStore;
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of KvStore; holds session-scoped data and backs tests
#[derive(Debug, Clone)]
pub struct MemoryKvStore {
    data: Arc<RwLock<HashMap<String, JsonValue>>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self { data: Arc::new(RwLock::new(HashMap::new())) }
    }
}

impl Default for MemoryKvStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> StoreResult<Option<JsonValue>> {
        let data = self.data.read().await;
        Ok(data.get(key).cloned())
    }

    async fn put(&self, key: &str, value: JsonValue) -> StoreResult<()> {
        let mut data = self.data.write().await;
        data.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        let mut data = self.data.write().await;
        Ok(data.remove(key).is_some())
    }

    async fn keys(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let data = self.data.read().await;
        let mut keys: Vec<String> = data.keys().filter(|k| k.starts_with(prefix)).cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

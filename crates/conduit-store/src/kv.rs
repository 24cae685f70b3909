use crate::error::StoreResult;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;

/// String-keyed JSON document store
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> StoreResult<Option<JsonValue>>;

    async fn put(&self, key: &str, value: JsonValue) -> StoreResult<()>;

    /// Returns whether the key existed
    async fn delete(&self, key: &str) -> StoreResult<bool>;

    /// Keys starting with `prefix`, sorted
    async fn keys(&self, prefix: &str) -> StoreResult<Vec<String>>;
}

/// Typed read; a missing key reads as `None`
pub async fn load<T: DeserializeOwned>(store: &dyn KvStore, key: &str) -> StoreResult<Option<T>> {
    match store.get(key).await? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

pub async fn save<T: Serialize + Sync>(store: &dyn KvStore, key: &str, value: &T) -> StoreResult<()> {
    store.put(key, serde_json::to_value(value)?).await
}

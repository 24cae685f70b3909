use crate::error::StoreResult;
use crate::kv::{self, KvStore};
use conduit_core::ActivityRecord;
use std::sync::Arc;
use tracing::debug;

pub const ACTIVITY_KEY: &str = "recent_activity";
pub const MAX_ACTIVITY_ENTRIES: usize = 10;

/// Bounded recent-activity log, newest first
#[derive(Clone)]
pub struct ActivityLog {
    store: Arc<dyn KvStore>,
    capacity: usize,
}

impl ActivityLog {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store, capacity: MAX_ACTIVITY_ENTRIES }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    pub async fn record(&self, record: ActivityRecord) -> StoreResult<()> {
        let mut records = self.list().await?;
        debug!(activity = %record.id, action = %record.action_id, success = record.success, "recording activity");
        records.insert(0, record);
        records.truncate(self.capacity);
        kv::save(self.store.as_ref(), ACTIVITY_KEY, &records).await
    }

    pub async fn list(&self) -> StoreResult<Vec<ActivityRecord>> {
        Ok(kv::load(self.store.as_ref(), ACTIVITY_KEY).await?.unwrap_or_default())
    }

    pub async fn find(&self, id: &str) -> StoreResult<Option<ActivityRecord>> {
        Ok(self.list().await?.into_iter().find(|r| r.id == id))
    }

    pub async fn clear(&self) -> StoreResult<()> {
        self.store.delete(ACTIVITY_KEY).await?;
        Ok(())
    }
}

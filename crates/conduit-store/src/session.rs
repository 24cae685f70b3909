use crate::error::StoreResult;
use crate::kv::{self, KvStore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub const SESSION_API_KEY: &str = "session.api_key";
pub const SESSION_USER_ID: &str = "session.user_id";

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub api_key: Option<String>,
    pub user_id: Option<String>,
}

impl SessionConfig {
    pub fn is_complete(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.api_key) && present(&self.user_id)
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("api_key", &self.api_key.as_ref().map(|k| conduit_core::mask_secret(k)))
            .field("user_id", &self.user_id)
            .finish()
    }
}

/// API key and user id kept under the `session.` namespace
#[derive(Clone)]
pub struct SessionConfigStore {
    store: Arc<dyn KvStore>,
}

impl SessionConfigStore {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    pub async fn load(&self) -> StoreResult<SessionConfig> {
        Ok(SessionConfig {
            api_key: kv::load(self.store.as_ref(), SESSION_API_KEY).await?,
            user_id: kv::load(self.store.as_ref(), SESSION_USER_ID).await?,
        })
    }

    /// Only the values present in `config` are written
    pub async fn save(&self, config: &SessionConfig) -> StoreResult<()> {
        if let Some(api_key) = &config.api_key {
            kv::save(self.store.as_ref(), SESSION_API_KEY, api_key).await?;
        }
        if let Some(user_id) = &config.user_id {
            kv::save(self.store.as_ref(), SESSION_USER_ID, user_id).await?;
        }
        Ok(())
    }

    pub async fn clear(&self) -> StoreResult<()> {
        for key in self.store.keys("session.").await? {
            self.store.delete(&key).await?;
        }
        Ok(())
    }
}

use crate::error::{StoreError, StoreResult};
use crate::kv::{self, KvStore};
use chrono::Utc;
use conduit_core::{FormValues, SavedTemplate};
use std::sync::Arc;
use uuid::Uuid;

pub const TEMPLATES_KEY: &str = "templates";

/// Named form-value presets for a connector action
#[derive(Clone)]
pub struct TemplateStore {
    store: Arc<dyn KvStore>,
}

impl TemplateStore {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Save under `name`; an existing template with the same name for the same action is replaced
    pub async fn save(
        &self,
        name: &str,
        connector_id: &str,
        action_id: &str,
        form_values: FormValues,
    ) -> StoreResult<SavedTemplate> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::Validation("template name must not be empty".to_string()));
        }

        let mut templates = self.all().await?;
        templates.retain(|t| !(t.name == name && t.connector_id == connector_id && t.action_id == action_id));

        let template = SavedTemplate {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            connector_id: connector_id.to_string(),
            action_id: action_id.to_string(),
            form_values,
            created_at: Utc::now(),
        };
        templates.push(template.clone());
        kv::save(self.store.as_ref(), TEMPLATES_KEY, &templates).await?;
        Ok(template)
    }

    /// Templates for one action, or all of them when no action is given
    pub async fn list(&self, connector_id: Option<&str>, action_id: Option<&str>) -> StoreResult<Vec<SavedTemplate>> {
        let templates = self.all().await?;
        Ok(templates
            .into_iter()
            .filter(|t| connector_id.map_or(true, |c| t.connector_id == c))
            .filter(|t| action_id.map_or(true, |a| t.action_id == a))
            .collect())
    }

    /// Look up by id or, failing that, by name
    pub async fn find(&self, id_or_name: &str) -> StoreResult<Option<SavedTemplate>> {
        let templates = self.all().await?;
        let by_id = templates.iter().position(|t| t.id == id_or_name);
        let index = by_id.or_else(|| templates.iter().position(|t| t.name == id_or_name));
        Ok(index.map(|i| templates[i].clone()))
    }

    pub async fn delete(&self, id: &str) -> StoreResult<bool> {
        let mut templates = self.all().await?;
        let before = templates.len();
        templates.retain(|t| t.id != id);
        if templates.len() == before {
            return Ok(false);
        }
        kv::save(self.store.as_ref(), TEMPLATES_KEY, &templates).await?;
        Ok(true)
    }

    async fn all(&self) -> StoreResult<Vec<SavedTemplate>> {
        Ok(kv::load(self.store.as_ref(), TEMPLATES_KEY).await?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryKvStore;
    use serde_json::json;

    fn values(text: &str) -> FormValues {
        let mut values = FormValues::new();
        values.insert("text".into(), json!(text));
        values
    }

    #[tokio::test]
    async fn test_save_replaces_same_name_for_same_action() {
        let templates = TemplateStore::new(Arc::new(MemoryKvStore::new()));
        templates.save("greeting", "slack", "postMessage", values("hi")).await.unwrap();
        templates.save("greeting", "slack", "postMessage", values("hello")).await.unwrap();
        templates.save("greeting", "slack", "updateMessage", values("hey")).await.unwrap();

        let post = templates.list(Some("slack"), Some("postMessage")).await.unwrap();
        assert_eq!(post.len(), 1);
        assert_eq!(post[0].form_values["text"], "hello");
        assert_eq!(templates.list(None, None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_find_and_delete() {
        let templates = TemplateStore::new(Arc::new(MemoryKvStore::new()));
        let saved = templates.save(" weekly ", "hubspot", "createDeal", values("x")).await.unwrap();
        assert_eq!(saved.name, "weekly");

        assert_eq!(templates.find("weekly").await.unwrap().map(|t| t.id), Some(saved.id.clone()));
        assert!(templates.find(&saved.id).await.unwrap().is_some());
        assert!(templates.delete(&saved.id).await.unwrap());
        assert!(!templates.delete(&saved.id).await.unwrap());
        assert!(templates.find("weekly").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let templates = TemplateStore::new(Arc::new(MemoryKvStore::new()));
        let err = templates.save("  ", "slack", "postMessage", FormValues::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }
}

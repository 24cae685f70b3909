//! In-process log of remote calls, shown by the API inspector

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const MAX_HISTORY_ENTRIES: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    pub method: String,
    pub url: String,
    pub status: u16,
    pub timestamp: DateTime<Utc>,
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<JsonValue>,
    /// Parsed body on success, `"<status> <reason>"` otherwise
    pub response_body: JsonValue,
}

impl CallRecord {
    fn is_credential_check(&self) -> bool {
        self.method == "GET" && self.url.contains("/credentials")
    }
}

/// Credential GET calls collapsed into one entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialCheckGroup {
    pub call_count: usize,
    pub connectors: Vec<String>,
    pub total_duration_ms: u64,
    pub timestamp: DateTime<Utc>,
    pub last_timestamp: DateTime<Utc>,
    pub status: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HistoryEntry {
    Call(CallRecord),
    CredentialChecks(CredentialCheckGroup),
}

impl HistoryEntry {
    pub fn last_timestamp(&self) -> DateTime<Utc> {
        match self {
            HistoryEntry::Call(call) => call.timestamp,
            HistoryEntry::CredentialChecks(group) => group.last_timestamp,
        }
    }
}

/// Most-recent-first call log, capped at [`MAX_HISTORY_ENTRIES`]. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct CallHistory {
    entries: Arc<Mutex<VecDeque<HistoryEntry>>>,
}

impl CallHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, call: CallRecord) {
        let mut entries = self.entries.lock().await;

        if call.is_credential_check() {
            let connector = connector_from_url(&call.url);
            let existing = entries
                .iter()
                .position(|e| matches!(e, HistoryEntry::CredentialChecks(_)))
                .and_then(|pos| entries.remove(pos));

            let group = match existing {
                Some(HistoryEntry::CredentialChecks(mut group)) => {
                    group.call_count += 1;
                    group.connectors.push(connector);
                    group.total_duration_ms += call.duration_ms;
                    group.last_timestamp = call.timestamp;
                    group
                }
                _ => CredentialCheckGroup {
                    call_count: 1,
                    connectors: vec![connector],
                    total_duration_ms: call.duration_ms,
                    timestamp: call.timestamp,
                    last_timestamp: call.timestamp,
                    status: call.status,
                },
            };
            entries.push_front(HistoryEntry::CredentialChecks(group));
        } else {
            entries.push_front(HistoryEntry::Call(call));
        }

        entries.truncate(MAX_HISTORY_ENTRIES);
    }

    pub async fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.lock().await.iter().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }
}

/// Connector id from `.../connectors/{id}/...`, or `unknown`
fn connector_from_url(url: &str) -> String {
    url.split_once("/connectors/")
        .and_then(|(_, rest)| rest.split_once('/'))
        .map(|(id, _)| id)
        .filter(|id| !id.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

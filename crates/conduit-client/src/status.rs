//! Connector listing annotated with credential state, and its filters

use crate::api::ConnectorApi;
use conduit_core::{Connector, ConnectorStatus};
use futures::future::join_all;
use tracing::{debug, warn};

/// Check credentials and metadata for every connector concurrently. A failed
/// credential listing marks only that connector as not connected; a failed
/// metadata lookup only clears its `auth_config_required` flag.
pub async fn connector_statuses<A>(api: &A, connectors: Vec<Connector>) -> Vec<ConnectorStatus>
where
    A: ConnectorApi + ?Sized,
{
    let checks = connectors.into_iter().map(|connector| async move {
        let (credentials, metadata) = futures::join!(
            api.list_credentials(&connector.id),
            api.credential_metadata(&connector.id)
        );

        let auth_config_required = match metadata {
            Ok(metadata) => metadata.map(|m| m.auth_config_required).unwrap_or(false),
            Err(e) => {
                warn!(connector = %connector.id, error = %e, "could not fetch credential metadata");
                false
            }
        };

        match credentials {
            Ok(credentials) => {
                debug!(connector = %connector.id, count = credentials.len(), "credential status");
                ConnectorStatus::from_credentials(connector, credentials, auth_config_required)
            }
            Err(e) => {
                warn!(connector = %connector.id, error = %e, "credential check failed");
                ConnectorStatus::not_connected(connector)
            }
        }
    });

    join_all(checks).await
}

/// Connectors matching a free-text query and a category (`all` for any)
pub fn filter_connectors<'a>(
    statuses: &'a [ConnectorStatus],
    query: &str,
    category: &str,
) -> Vec<&'a ConnectorStatus> {
    statuses
        .iter()
        .filter(|s| s.connector.matches_query(query) && s.connector.in_category(category))
        .collect()
}

/// Distinct categories in first-seen order, led by `all`
pub fn categories<'a, I>(connectors: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Connector>,
{
    let mut out = vec!["all".to_string()];
    for connector in connectors {
        for category in &connector.category {
            if !out.contains(category) {
                out.push(category.clone());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryConnectorApi;
    use conduit_core::{Credential, CredentialMetadata, CredentialStatus};
    use serde_json::json;

    fn connectors() -> Vec<Connector> {
        vec![
            Connector::new("slack", "Slack").with_category("Communication"),
            Connector::new("hubspot", "HubSpot").with_category("CRM").with_category("Marketing"),
            Connector::new("salesforce", "Salesforce").with_category("CRM"),
        ]
    }

    #[tokio::test]
    async fn test_statuses_degrade_per_connector() {
        let api = MemoryConnectorApi::new();
        api.add_credential("slack", Credential::from_value(&json!({"id": "c1"})).unwrap()).await;
        api.set_metadata("slack", CredentialMetadata { auth_config_required: true, auxiliary_fields: vec![] })
            .await;
        api.fail_next_credential_listing("hubspot", 500).await;

        let statuses = connector_statuses(&api, connectors()).await;
        assert_eq!(statuses.len(), 3);
        assert_eq!(statuses[0].credential_status, CredentialStatus::Connected);
        assert_eq!(statuses[0].credential_count, 1);
        assert!(statuses[0].auth_config_required);
        assert_eq!(statuses[1].credential_status, CredentialStatus::NotConnected);
        assert_eq!(statuses[2].credential_status, CredentialStatus::NotConnected);
        assert!(!statuses[2].auth_config_required);
    }

    #[test]
    fn test_filters_and_categories() {
        let statuses: Vec<_> = connectors().into_iter().map(ConnectorStatus::not_connected).collect();

        let crm: Vec<_> = filter_connectors(&statuses, "", "CRM").into_iter().map(|s| s.connector.id.as_str()).collect();
        assert_eq!(crm, vec!["hubspot", "salesforce"]);

        let search: Vec<_> =
            filter_connectors(&statuses, "MARKET", "all").into_iter().map(|s| s.connector.id.as_str()).collect();
        assert_eq!(search, vec!["hubspot"]);

        assert!(filter_connectors(&statuses, "slack", "CRM").is_empty());

        let all = connectors();
        assert_eq!(categories(&all), vec!["all", "Communication", "CRM", "Marketing"]);
    }
}

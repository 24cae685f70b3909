use conduit_auth::{CredentialResolver, RecordingUrlOpener, ScriptedInteraction};
use conduit_client::{ApiClient, ApiConfig, ConnectorApi, HistoryEntry};
use conduit_core::FailureKind;
use conduit_runtime::Session;
use conduit_store::MemoryKvStore;
use httpmock::prelude::*;
use serde_json::json;
use std::sync::Arc;

async fn session_for(server: &MockServer) -> (ApiClient, Session) {
    let client = ApiClient::new(ApiConfig::new("key", "user-1").with_base_url(server.base_url())).unwrap();
    let api: Arc<dyn ConnectorApi> = Arc::new(client.clone());
    let resolver =
        CredentialResolver::new(api.clone(), Arc::new(ScriptedInteraction::new()), Arc::new(RecordingUrlOpener::new()));
    (client, Session::new(api, resolver, Arc::new(MemoryKvStore::new())))
}

async fn mock_catalog(server: &MockServer) {
    server
        .mock_async(|when, then| {
            when.method(GET).path("/connectors");
            then.status(200).json_body(json!({"connectors": [{"id": "zendesk", "name": "Zendesk"}]}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/connectors/zendesk/credentials");
            then.status(200).json_body(json!({"credentials": [{"credentialId": "cred-9"}]}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/connectors/zendesk/credentials/metadata");
            then.status(404);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/connectors/zendesk/resources");
            then.status(200).json_body(json!({"resources": [
                {"name": "tickets", "actions": [{"id": "updateTicket", "name": "Update Ticket"}]}
            ]}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/connectors/zendesk/actions/updateTicket");
            then.status(200).json_body(json!({"action": {
                "id": "updateTicket",
                "path": "/tickets/{ticketId}",
                "requestBody": {"properties": {
                    "ticket": {"type": "object", "required": ["status"], "properties": {
                        "status": {"type": "string", "enum": ["open", "solved"]},
                        "tags": {"type": "array", "items": {"type": "string"}}
                    }}
                }}
            }}));
        })
        .await;
}

#[tokio::test]
async fn executes_against_the_remote_api() {
    let server = MockServer::start_async().await;
    mock_catalog(&server).await;
    let execute = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/connectors/zendesk/actions/updateTicket/execute")
                .header("x-alloy-userid", "user-1")
                .json_body(json!({
                    "pathParams": {"ticketId": "42"},
                    "queryParameters": {},
                    "requestBody": {"ticket": {"status": "solved", "tags": ["vip", "billing"]}},
                    "credentialId": "cred-9",
                    "additionalHeaders": {}
                }));
            then.status(200).json_body(json!({"ticket": {"id": 42}}));
        })
        .await;

    let (client, mut session) = session_for(&server).await;
    let zendesk = session.find_connector("zendesk").await.unwrap();
    session.select_connector(zendesk).await;
    let selected = session.select_action("updateTicket").await.unwrap();
    assert_eq!(selected.schema.method.as_str(), "PUT");

    session.set_value("ticketId", json!("42"));
    session.set_value("ticket.status", json!("solved"));
    session.set_value("ticket.tags", json!(r#"["vip","billing"]"#));
    let result = session.execute().await.unwrap();

    execute.assert_async().await;
    assert!(result.success, "{:?}", result.error);
    assert_eq!(result.data, Some(json!({"ticket": {"id": 42}})));

    let history = client.history().entries().await;
    assert!(matches!(&history[0], HistoryEntry::Call(call) if call.url.ends_with("/execute")));
}

#[tokio::test]
async fn remote_error_becomes_failed_result() {
    let server = MockServer::start_async().await;
    mock_catalog(&server).await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/connectors/zendesk/actions/updateTicket/execute");
            then.status(422).json_body(json!({"error": "invalid status"}));
        })
        .await;

    let (_client, mut session) = session_for(&server).await;
    let zendesk = session.find_connector("zendesk").await.unwrap();
    session.select_connector(zendesk).await;
    session.select_action("updateTicket").await.unwrap();
    session.set_value("ticketId", json!("42"));
    session.set_value("ticket.status", json!("open"));

    let result = session.execute().await.unwrap();
    assert!(!result.success);
    assert_eq!(result.failure, Some(FailureKind::Remote));
    assert_eq!(result.error.as_deref(), Some("422 Unprocessable Entity"));
    assert_eq!(session.activity_log().list().await.unwrap().len(), 1);
}

use conduit_client::{
    connector_statuses, ApiClient, ApiConfig, ClientError, ConnectorApi, ExecuteRequest, HistoryEntry,
    NewCredential,
};
use conduit_core::{CredentialStatus, RequestPayload};
use httpmock::prelude::*;
use serde_json::json;

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(ApiConfig::new("test-key", "user-42").with_base_url(server.base_url())).unwrap()
}

#[tokio::test]
async fn sends_standard_headers_and_unwraps_connectors() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/connectors")
                .header("authorization", "Bearer test-key")
                .header("accept", "application/json")
                .header("x-api-version", "2025-06");
            then.status(200).json_body(json!({
                "connectors": [
                    {"id": "slack", "name": "Slack", "category": ["Communication"]},
                    {"name": "missing id"},
                    {"id": "hubspot", "name": "HubSpot"}
                ]
            }));
        })
        .await;

    let client = client_for(&server);
    let connectors = client.list_connectors().await.unwrap();

    mock.assert_async().await;
    let ids: Vec<_> = connectors.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["slack", "hubspot"]);
}

#[tokio::test]
async fn user_header_only_on_user_scoped_calls() {
    let server = MockServer::start_async().await;
    let scoped = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/connectors/slack/credentials")
                .header("x-alloy-userid", "user-42");
            then.status(200).json_body(json!({"data": [{"credentialId": "cred-1"}]}));
        })
        .await;
    let unscoped = server
        .mock_async(|when, then| {
            when.method(GET).path("/connectors/slack/resources").header_missing("x-alloy-userid");
            then.status(200).json_body(json!({"resources": [
                {"name": "messages", "actions": [{"id": "postMessage", "name": "Post Message"}]}
            ]}));
        })
        .await;

    let client = client_for(&server);
    let credentials = client.list_credentials("slack").await.unwrap();
    let resources = client.list_resources("slack").await.unwrap();

    scoped.assert_async().await;
    unscoped.assert_async().await;
    assert_eq!(credentials[0].id, "cred-1");
    assert_eq!(resources[0].actions[0].id, "postMessage");
}

#[tokio::test]
async fn non_success_status_becomes_status_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/connectors/slack/credentials");
            then.status(401).body("unauthorized");
        })
        .await;

    let client = client_for(&server);
    let err = client.list_credentials("slack").await.unwrap_err();

    assert!(err.is_auth_class());
    assert_eq!(err.to_string(), "401 Unauthorized");
    assert!(matches!(err, ClientError::Status { status: 401, .. }));
}

#[tokio::test]
async fn non_json_and_empty_bodies_read_as_null() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/connectors/slack/actions/ping");
            then.status(200).body("pong");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(DELETE).path("/connectors/slack/credentials/cred-1");
            then.status(204);
        })
        .await;

    let client = client_for(&server);
    assert!(client.get_action("slack", "ping").await.unwrap().is_null());
    client.delete_credential("slack", "cred-1").await.unwrap();
}

#[tokio::test]
async fn create_credential_adds_user_id_and_execute_posts_payload() {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/connectors/zendesk/credentials")
                .header_missing("x-alloy-userid")
                .json_body(json!({
                    "userId": "user-42",
                    "authenticationType": "oauth2",
                    "redirectUri": "https://embedded.runalloy.com/oauth/callback",
                    "data": {"subdomain": "acme"}
                }));
            then.status(200).json_body(json!({"oauthUrl": "https://auth.example.com/start"}));
        })
        .await;
    let execute = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/connectors/zendesk/actions/createTicket/execute")
                .header("x-alloy-userid", "user-42")
                .json_body(json!({
                    "pathParams": {},
                    "queryParameters": {},
                    "requestBody": {"subject": "Help"},
                    "credentialId": "cred-7",
                    "additionalHeaders": {}
                }));
            then.status(200).json_body(json!({"id": 99}));
        })
        .await;

    let client = client_for(&server);
    let mut data = serde_json::Map::new();
    data.insert("subdomain".into(), json!("acme"));
    let response = client
        .create_credential(
            "zendesk",
            &NewCredential {
                authentication_type: "oauth2".into(),
                redirect_uri: "https://embedded.runalloy.com/oauth/callback".into(),
                data: Some(data),
            },
        )
        .await
        .unwrap();
    assert_eq!(response["oauthUrl"], "https://auth.example.com/start");

    let mut payload = RequestPayload::default();
    payload.request_body.insert("subject".into(), json!("Help"));
    let result = client
        .execute_action("zendesk", "createTicket", &ExecuteRequest::new(payload, "cred-7"))
        .await
        .unwrap();

    create.assert_async().await;
    execute.assert_async().await;
    assert_eq!(result, json!({"id": 99}));
}

#[tokio::test]
async fn history_groups_credential_checks_from_status_fan_out() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/connectors");
            then.status(200).json_body(json!([{"id": "a"}, {"id": "b"}]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/connectors/a/credentials");
            then.status(200).json_body(json!({"credentials": [{"id": "ca"}]}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/connectors/b/credentials");
            then.status(500);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path_includes("/credentials/metadata");
            then.status(200).json_body(json!({"metadata": [{"authConfigRequired": true}]}));
        })
        .await;

    let client = client_for(&server);
    let connectors = client.list_connectors().await.unwrap();
    let statuses = connector_statuses(&client, connectors).await;

    assert_eq!(statuses[0].credential_status, CredentialStatus::Connected);
    assert!(statuses[0].auth_config_required);
    assert_eq!(statuses[1].credential_status, CredentialStatus::NotConnected);

    let history = client.history().entries().await;
    assert_eq!(history.len(), 2);
    match &history[0] {
        HistoryEntry::CredentialChecks(group) => assert_eq!(group.call_count, 4),
        other => panic!("expected grouped credential checks, got {:?}", other),
    }
    assert!(matches!(&history[1], HistoryEntry::Call(call) if call.status == 200));
}

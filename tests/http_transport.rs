//! End-to-end tests against a mock RBM API and token endpoint.

mod integration;

use integration::mock_server::MockServerFixture;
use mockito::Matcher;
use rbm_lib_rust::{ClientConfig, Error, Msisdn, TextMessage};
use serde_json::json;
use tokio_test::assert_err;

fn recipient() -> Msisdn {
    Msisdn::new("+15551234567")
}

#[tokio::test]
async fn service_account_session_sends_text() {
    let mut fixture = MockServerFixture::new().await;
    let token = fixture.mock_token("sa-token").await;
    let api = fixture
        .server
        .mock("POST", Matcher::Regex(r"^/v1/phones/\+15551234567/agentMessages".into()))
        .match_header("authorization", "Bearer sa-token")
        .match_query(Matcher::UrlEncoded("messageId".into(), "id-1".into()))
        .match_body(Matcher::Json(json!({"contentMessage": {"text": "hi"}})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"name":"phones/+15551234567/agentMessages/id-1"}"#)
        .create_async()
        .await;

    let client = fixture.client(ClientConfig::default());
    client.initialize(Some(fixture.credentials())).await.unwrap();
    let sent = client
        .send_text(&recipient(), TextMessage::new("hi"))
        .await
        .unwrap();

    assert_eq!(sent.id, "id-1");
    assert_eq!(sent.response["name"], "phones/+15551234567/agentMessages/id-1");
    token.assert_async().await;
    api.assert_async().await;
}

#[tokio::test]
async fn token_is_reused_across_calls() {
    let mut fixture = MockServerFixture::new().await;
    let token = fixture.mock_token("sa-token").await.expect(1);
    let api = fixture
        .mock_api("POST", "phones/+15551234567/agentEvents", 200, "{}")
        .await
        .expect(3);

    let client = fixture.client(ClientConfig::default());
    client.initialize(Some(fixture.credentials())).await.unwrap();
    for _ in 0..3 {
        client.send_is_typing(&recipient()).await.unwrap();
    }

    token.assert_async().await;
    api.assert_async().await;
}

#[tokio::test]
async fn revoke_of_unknown_message_maps_google_error() {
    let mut fixture = MockServerFixture::new().await;
    fixture.mock_token("sa-token").await;
    fixture
        .mock_api(
            "DELETE",
            "phones/+15551234567/agentMessages/gone",
            404,
            r#"{"error":{"code":404,"message":"Requested entity was not found.","status":"NOT_FOUND"}}"#,
        )
        .await;

    let client = fixture.client(ClientConfig::default());
    client.initialize(Some(fixture.credentials())).await.unwrap();
    let err = assert_err!(client.revoke_message(&recipient(), "gone").await);

    match err {
        Error::Remote { status, code, message } => {
            assert_eq!(status, 404);
            assert_eq!(code.as_deref(), Some("NOT_FOUND"));
            assert_eq!(message, "Requested entity was not found.");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn empty_success_body_becomes_empty_object() {
    let mut fixture = MockServerFixture::new().await;
    fixture.mock_token("sa-token").await;
    fixture
        .mock_api("DELETE", "phones/+15551234567/agentMessages/m1", 200, "")
        .await;

    let client = fixture.client(ClientConfig::default());
    client.initialize(Some(fixture.credentials())).await.unwrap();
    let response = client.revoke_message(&recipient(), "m1").await.unwrap();

    assert_eq!(response, json!({}));
}

#[tokio::test]
async fn capability_check_is_a_get_with_request_id_and_agent_id() {
    let mut fixture = MockServerFixture::new().await;
    fixture.mock_token("sa-token").await;
    let api = fixture
        .server
        .mock("GET", Matcher::Regex(r"^/v1/phones/\+15551234567/capabilities".into()))
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("requestId".into(), "id-1".into()),
            Matcher::UrlEncoded("agentId".into(), "brand-agent".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"features":["RICHCARD_STANDALONE"]}"#)
        .create_async()
        .await;

    let client = fixture.client(ClientConfig::default().with_agent_id("brand-agent"));
    client.initialize(Some(fixture.credentials())).await.unwrap();
    let caps = client.check_capability(&recipient()).await.unwrap();

    assert_eq!(caps["features"][0], "RICHCARD_STANDALONE");
    api.assert_async().await;
}

#[tokio::test]
async fn rejected_token_exchange_fails_initialize() {
    let mut fixture = MockServerFixture::new().await;
    fixture
        .server
        .mock("POST", "/token")
        .with_status(400)
        .with_body(r#"{"error":"invalid_grant"}"#)
        .create_async()
        .await;
    let api = fixture
        .mock_api("POST", "phones/+15551234567/agentEvents", 200, "{}")
        .await
        .expect(0);

    let client = fixture.client(ClientConfig::default());
    let err = assert_err!(client.initialize(Some(fixture.credentials())).await);

    match &err {
        Error::Initialization(inner) => {
            assert!(matches!(inner.as_ref(), Error::Credential { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("invalid_grant"));
    assert!(!client.is_initialized());
    assert!(matches!(
        client.send_is_typing(&recipient()).await,
        Err(Error::NotInitialized)
    ));
    api.assert_async().await;
}

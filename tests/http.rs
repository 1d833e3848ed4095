//! End-to-end tests against a mock DingTalk, covering the token round trip
//! and both sending modes.

use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dingbot::auth::app_credentials::AppCredentials;
use dingbot::auth::token_cache::{CachedTokenProvider, MemoryStore};
use dingbot::auth::TokenProvider;
use dingbot::message::AppMessage;
use dingbot::robot::app::AppClient;
use dingbot::robot::webhook::WebhookClient;

fn credentials_for(server: &MockServer) -> AppCredentials {
    let mut credentials = AppCredentials::new("my-app-key", "my-app-secret");
    credentials.endpoint = format!("{}/v1.0/oauth2/accessToken", server.uri());
    credentials
}

#[tokio::test]
async fn token_is_fetched_with_the_credential_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1.0/oauth2/accessToken"))
        .and(body_json(json!({
            "appKey": "my-app-key",
            "appSecret": "my-app-secret",
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({
                "accessToken": "T",
                "expireIn": 7200,
            })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let token = credentials_for(&server).access_token().await.unwrap();
    assert_eq!(token, "T");
}

#[tokio::test]
async fn cached_provider_fetches_once_and_stores_the_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1.0/oauth2/accessToken"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({
                "accessToken": "T",
                "expireIn": 7200,
            })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let credentials = credentials_for(&server);
    let cache_key = credentials.cache_key();
    let provider = CachedTokenProvider::new(credentials, MemoryStore::default(), cache_key);

    assert_eq!(provider.get_token().await.unwrap(), "T");
    assert_eq!(provider.get_token().await.unwrap(), "T");
}

#[tokio::test]
async fn token_fetch_surfaces_server_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1.0/oauth2/accessToken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = credentials_for(&server).access_token().await.unwrap_err();
    assert!(matches!(
        err,
        dingbot::auth::app_credentials::Error::Server(_)
    ));
}

#[tokio::test]
async fn app_send_carries_the_access_token_header() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1.0/oauth2/accessToken"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({
                "accessToken": "T",
                "expireIn": 7200,
            })),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1.0/robot/oToMessages/batchSend"))
        .and(header("x-acs-dingtalk-access-token", "T"))
        .and(body_json(json!({
            "robotCode": "normal",
            "msgKey": "sampleText",
            "msgParam": "{\"content\":\"hi\"}",
            "userIds": ["042"],
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"processQueryKey": "ok"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut client = AppClient::with_token_provider("normal", credentials_for(&server));
    client.oto_endpoint = format!("{}/v1.0/robot/oToMessages/batchSend", server.uri());

    client
        .send_to_users(&AppMessage::text("hi"), &["042"])
        .await
        .unwrap();
}

#[tokio::test]
async fn group_send_addresses_the_conversation() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1.0/oauth2/accessToken"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({
                "accessToken": "T",
                "expireIn": 7200,
            })),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1.0/robot/groupMessages/send"))
        .and(header("x-acs-dingtalk-access-token", "T"))
        .and(body_partial_json(json!({
            "msgKey": "sampleMarkdown",
            "openConversationId": "cidXXX==",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"processQueryKey": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = AppClient::with_token_provider("normal", credentials_for(&server));
    client.group_endpoint = format!("{}/v1.0/robot/groupMessages/send", server.uri());

    client
        .send_to_group(&AppMessage::markdown("deploy", "**done**"), "cidXXX==")
        .await
        .unwrap();
}

#[tokio::test]
async fn webhook_send_posts_the_message_with_the_token_query() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/robot/send"))
        .and(query_param("access_token", "abc"))
        .and(body_partial_json(json!({
            "msgtype": "text",
            "text": {"content": "hi"},
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"errcode": 0, "errmsg": "ok"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut client = WebhookClient::with_access_token("abc");
    client.endpoint = format!("{}/robot/send", server.uri());

    client.send_text("hi").await.unwrap();
}

#[tokio::test]
async fn webhook_send_surfaces_server_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/robot/send"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut client = WebhookClient::with_access_token("abc");
    client.endpoint = format!("{}/robot/send", server.uri());

    let err = client.send_text("hi").await.unwrap_err();
    assert!(matches!(err, dingbot::robot::webhook::Error::Server(_)));
}

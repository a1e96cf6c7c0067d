//! Callback → token exchange → credential file, end to end.

use async_trait::async_trait;
use bridge_desktop::JsonFileSecureStore;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use bytes::Bytes;
use core_auth::{
    complete_authorization, refresh_stored_credentials, AuthError, CallbackListener,
    CallbackOutcome, CredentialField, OAuthEndpoints, OAuthFlowManager, StateToken, TokenStore,
};
use mockall::mock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

mock! {
    HttpClient {}

    #[async_trait]
    impl HttpClient for HttpClient {
        async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
    }
}

fn endpoints() -> OAuthEndpoints {
    OAuthEndpoints {
        auth_url: "https://app.box.com/api/oauth2/authorize".to_string(),
        token_url: "https://app.box.com/api/oauth2/token".to_string(),
        redirect_uri: "http://localhost:8000".to_string(),
    }
}

fn token_response(body: &'static str) -> HttpResponse {
    HttpResponse {
        status: 200,
        headers: HashMap::new(),
        body: Bytes::from_static(body.as_bytes()),
    }
}

/// Run the listener and send it one redirect; returns (outcome, raw reply).
async fn redirect_with(query: &str, expected: StateToken) -> (CallbackOutcome, String) {
    let listener = CallbackListener::bind("127.0.0.1", 0).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(listener.accept_one(expected));

    let mut client = tokio::net::TcpStream::connect(addr).await.unwrap();
    let request = format!("GET /?{} HTTP/1.1\r\nHost: localhost\r\n\r\n", query);
    client.write_all(request.as_bytes()).await.unwrap();
    let mut reply = String::new();
    client.read_to_string(&mut reply).await.unwrap();

    (server.await.unwrap().unwrap(), reply)
}

#[tokio::test]
async fn test_matching_state_saves_refresh_token() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".firebreak-box.json");

    let state = StateToken::generate();
    let query = format!("state={}&code=auth-code", state.as_str());
    let (outcome, reply) = redirect_with(&query, state).await;
    assert!(reply.starts_with("HTTP/1.1 200"));

    let mut http = MockHttpClient::new();
    http.expect_execute()
        .times(1)
        .returning(|_| Ok(token_response(r#"{"refresh_token":"r1","access_token":"a1"}"#)));
    let manager = OAuthFlowManager::new(endpoints(), Arc::new(http));

    let secure_store = Arc::new(JsonFileSecureStore::open_at(&path).await.unwrap());
    let mut store = TokenStore::load(secure_store, Some("work")).await.unwrap();

    complete_authorization(outcome, &manager, "cid", "sec", &mut store)
        .await
        .unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
        written,
        serde_json::json!({
            "work": {"client_id": "cid", "client_secret": "sec", "refresh_token": "r1"}
        })
    );
}

#[tokio::test]
async fn test_mismatched_state_never_exchanges() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".firebreak-box.json");

    let (outcome, reply) =
        redirect_with("state=forged&code=auth-code", StateToken::generate()).await;
    assert!(reply.starts_with("HTTP/1.1 401"));
    assert!(reply.ends_with("Anti-forgery token invalid."));

    let mut http = MockHttpClient::new();
    http.expect_execute().times(0);
    let manager = OAuthFlowManager::new(endpoints(), Arc::new(http));

    let secure_store = Arc::new(JsonFileSecureStore::open_at(&path).await.unwrap());
    let mut store = TokenStore::load(secure_store, None).await.unwrap();

    let err = complete_authorization(outcome, &manager, "cid", "sec", &mut store)
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::StateMismatch));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
}

#[tokio::test]
async fn test_refresh_rotates_stored_token() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".firebreak-box.json");
    std::fs::write(
        &path,
        r#"{"default": {"client_id": "cid", "client_secret": "sec", "refresh_token": "r1"}}"#,
    )
    .unwrap();

    let mut http = MockHttpClient::new();
    http.expect_execute()
        .times(1)
        .returning(|_| Ok(token_response(r#"{"refresh_token":"r2","access_token":"a2"}"#)));
    let manager = OAuthFlowManager::new(endpoints(), Arc::new(http));

    let secure_store = Arc::new(JsonFileSecureStore::open_at(&path).await.unwrap());
    let mut store = TokenStore::load(secure_store.clone(), None).await.unwrap();

    let access_token = refresh_stored_credentials(&manager, &mut store).await.unwrap();
    assert_eq!(access_token, "a2");

    let reloaded = TokenStore::load(
        Arc::new(JsonFileSecureStore::open_at(&path).await.unwrap()),
        None,
    )
    .await
    .unwrap();
    assert_eq!(reloaded.get(CredentialField::RefreshToken), Some("r2"));
}

#[tokio::test]
async fn test_refresh_without_token_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let secure_store = Arc::new(
        JsonFileSecureStore::open_at(dir.path().join("s.json"))
            .await
            .unwrap(),
    );
    let mut store = TokenStore::load(secure_store, None).await.unwrap();

    let mut http = MockHttpClient::new();
    http.expect_execute().times(0);
    let manager = OAuthFlowManager::new(endpoints(), Arc::new(http));

    let err = refresh_stored_credentials(&manager, &mut store)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Missing credential: No refresh_token");
}

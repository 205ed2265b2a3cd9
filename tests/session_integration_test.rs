use anyhow::Result;
use httpmock::prelude::*;
use resilient_gql::core::session::{AUTH_TOKEN_KEY, USER_DATA_KEY};
use resilient_gql::domain::ports::SessionStore;
use resilient_gql::{
    ClientConfig, ClientError, Environment, FileSessionStore, QueryRequest, Session,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// 從 TOML 配置建立 client，session 存在檔案中
#[tokio::test]
async fn test_config_driven_client_uses_persisted_session() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let session_path = temp_dir.path().join("session.json");
    let normalized_path = session_path.to_str().unwrap().replace('\\', "/");

    let server = MockServer::start_async().await;
    let quizzes_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/graphql")
                .header("authorization", "Bearer persisted-token");
            then.status(200)
                .json_body(json!({"data": {"quizzes": [{"id": "q-1", "title": "Ownership"}]}}));
        })
        .await;

    let config = ClientConfig::from_toml_str(&format!(
        r#"
[client]
name = "quiz-app"
environment = "development"

[endpoints]
development = ["{}"]

[http]
timeout_seconds = 5

[session]
store = "file"
path = "{}"
"#,
        server.url("/graphql"),
        normalized_path
    ))?;
    config.validate_config()?;

    let client = config
        .client_builder(config.environment()?)?
        .build()?;
    client.sessions().save(&Session {
        token: "persisted-token".to_string(),
        user: json!({"id": 7, "username": "grace"}),
    })?;

    let response = client.execute(&QueryRequest::new("{ quizzes { id title } }")).await?;

    quizzes_mock.assert_async().await;
    assert_eq!(
        response.data,
        Some(json!({"quizzes": [{"id": "q-1", "title": "Ownership"}]}))
    );

    let reopened = FileSessionStore::new(&session_path);
    assert_eq!(reopened.get(AUTH_TOKEN_KEY)?.as_deref(), Some("persisted-token"));
    Ok(())
}

/// 401 會把檔案中的 token 與使用者資料一起刪除
#[tokio::test]
async fn test_unauthorized_response_wipes_session_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let session_path = temp_dir.path().join("session.json");

    let store = Arc::new(FileSessionStore::new(&session_path));
    store.set(AUTH_TOKEN_KEY, "stale-token")?;
    store.set(USER_DATA_KEY, r#"{"id":7}"#)?;

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/graphql");
            then.status(401);
        })
        .await;

    let mut config = ClientConfig::default();
    config.use_session_file(session_path.to_str().unwrap());
    config.endpoints = Some(resilient_gql::config::toml_config::EndpointsConfig {
        production: Some(server.url("/graphql")),
        development: None,
    });

    let logouts = Arc::new(AtomicUsize::new(0));
    let counter = logouts.clone();
    let client = config
        .client_builder(Environment::Production)?
        .logout_handler(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .build()?;

    assert!(client.execute(&QueryRequest::new("{ me { id } }")).await.is_err());

    let reopened = FileSessionStore::new(&session_path);
    assert_eq!(reopened.get(AUTH_TOKEN_KEY)?, None);
    assert_eq!(reopened.get(USER_DATA_KEY)?, None);
    assert_eq!(logouts.load(Ordering::SeqCst), 1);
    assert_eq!(client.sessions().current()?, None);
    Ok(())
}

/// 登出後的請求不帶 Authorization，受保護的端點不再匹配
#[tokio::test]
async fn test_no_authorization_header_after_logout() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let session_path = temp_dir.path().join("session.json");

    let server = MockServer::start_async().await;
    let authed_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/graphql")
                .header_exists("authorization");
            then.status(200).json_body(json!({"data": {"viewer": {"id": 7}}}));
        })
        .await;

    let mut config = ClientConfig::default();
    config.use_session_file(session_path.to_str().unwrap());
    config.endpoints = Some(resilient_gql::config::toml_config::EndpointsConfig {
        production: Some(server.url("/graphql")),
        development: None,
    });
    let client = config.client_builder(Environment::Production)?.build()?;

    client.sessions().save(&Session {
        token: "tok".to_string(),
        user: json!({"id": 7}),
    })?;
    let signed_in = client.execute(&QueryRequest::new("{ viewer { id } }")).await?;
    assert_eq!(signed_in.data, Some(json!({"viewer": {"id": 7}})));

    client.sessions().clear()?;
    let anonymous = client.execute(&QueryRequest::new("{ viewer { id } }")).await;

    // httpmock 對未匹配的請求回 404
    assert!(matches!(
        anonymous,
        Err(ClientError::TransportExhausted { .. })
    ));
    authed_mock.assert_hits_async(1).await;
    Ok(())
}

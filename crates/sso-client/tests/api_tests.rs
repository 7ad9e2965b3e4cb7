//! Integration tests for the identity API client.
//!
//! Uses wiremock to simulate the provider: header handling, the data
//! envelope, cursor pagination, the grant endpoint's origin resolution,
//! and the application token cache's single-refresh behavior.

use serde_json::json;
use sso_auth::IdentityGateway;
use sso_client::{
    AppTokenRepository, CachedAppTokenRepository, GrantType, RequestError, SsoClient, SsoConfig,
};
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Client pointed at the mock server, with the API living under `/api/`
/// so origin-relative paths are distinguishable from API-relative ones.
fn client_for(server: &MockServer) -> SsoClient {
    SsoClient::new(SsoConfig {
        base_url: format!("{}/api/", server.uri()),
        client_id: Some("test-client-id".to_string()),
        client_secret: Some("test-client-secret".to_string()),
        redirect_url: Some("https://app.example.com/callback".to_string()),
    })
    .unwrap()
}

#[tokio::test]
async fn test_who_am_i_sends_auth_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/user"))
        .and(header("Authorization", "Bearer user-token"))
        .and(header("Client-ID", "test-client-id"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": 42, "email": "user@example.com"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).with_token("user-token");
    let response = client.get_authed_user().await.unwrap();

    assert!(response.success());
    assert_eq!(response.data()["email"], "user@example.com");
}

#[tokio::test]
async fn test_error_status_is_unsuccessful_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/user"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Unauthenticated."})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server).with_token("expired");
    let response = client.get_authed_user().await.unwrap();

    assert!(!response.success());
    assert_eq!(response.status, 401);
    assert_eq!(response.error(), "Unauthenticated.");
}

#[tokio::test]
async fn test_rate_limit_headers_are_parsed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/user"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("X-RateLimit-Limit", "800")
                .insert_header("X-RateLimit-Remaining", "0")
                .insert_header("Retry-After", "30"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server).with_token("tok");
    let response = client.get_authed_user().await.unwrap();

    let rate_limit = response.rate_limit();
    assert_eq!(rate_limit.limit, 800);
    assert_eq!(rate_limit.remaining, 0);
    assert_eq!(rate_limit.retry_after, 30);
}

#[tokio::test]
async fn test_pagination_cursor_is_threaded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/users"))
        .and(query_param("after", "cursor-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 2}],
            "pagination": {"cursor": "cursor-2"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v3/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"id": 1}],
            "pagination": {"cursor": "cursor-1"}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).with_token("tok");

    let first = client.get("v3/users", &[]).await.unwrap();
    assert_eq!(first.first_record().unwrap()["id"], 1);

    let second = client
        .get_paginated("v3/users", &[], &first.paginator().next())
        .await
        .unwrap();
    assert_eq!(second.first_record().unwrap()["id"], 2);
    assert_eq!(second.paginator().cursor(), Some("cursor-2"));
}

#[tokio::test]
async fn test_grant_posts_to_origin_not_api_base() {
    let server = MockServer::start().await;

    // Resolved against the origin: /oauth/token, not /api/oauth/token.
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("client_id=test-client-id"))
        .and(body_string_contains("client_secret=test-client-secret"))
        .and(body_string_contains("code=abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "granted",
            "token_type": "Bearer"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client
        .retrieving_token(GrantType::AuthorizationCode, &[("code", "abc")])
        .await
        .unwrap();

    assert!(response.success());
    assert_eq!(response.data()["access_token"], "granted");
}

#[tokio::test]
async fn test_grant_attributes_override_defaults() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("client_id=other-client"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "t"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .retrieving_token(GrantType::ClientCredentials, &[("client_id", "other-client")])
        .await
        .unwrap();
}

#[tokio::test]
async fn test_app_token_is_fetched_once() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("scope=*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "app-token",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let repository = CachedAppTokenRepository::new(client_for(&server));

    assert_eq!(repository.access_token().await.unwrap(), "app-token");
    assert_eq!(repository.access_token().await.unwrap(), "app-token");
}

#[tokio::test]
async fn test_app_token_invalidate_forces_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "app-token",
            "expires_in": 3600
        })))
        .expect(2)
        .mount(&server)
        .await;

    let repository = CachedAppTokenRepository::new(client_for(&server));

    repository.access_token().await.unwrap();
    repository.invalidate().await;
    repository.access_token().await.unwrap();
}

#[tokio::test]
async fn test_app_token_refresh_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "invalid_client"})),
        )
        .mount(&server)
        .await;

    let repository = CachedAppTokenRepository::new(client_for(&server));
    let err = repository.access_token().await.unwrap_err();
    assert!(err.to_string().contains("401"));

    match err {
        RequestError::FreshAccessToken { response } => {
            assert_eq!(response.status, 401);
            assert_eq!(response.error(), "invalid_client");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_incomplete_request_never_reaches_the_wire() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v3/users"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server).with_token("tok");
    let err = client.create_user(&[("name", "User")]).await.unwrap_err();

    assert!(matches!(err, RequestError::MissingParameters { .. }));
}

#[tokio::test]
async fn test_email_exists_posts_email() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v3/users/check"))
        .and(query_param("email", "user@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"exists": true}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).with_token("tok");
    let response = client.email_exists("user@example.com").await.unwrap();

    assert_eq!(response.data()["exists"], true);
}

#[tokio::test]
async fn test_ssh_key_paths() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users/42/keys/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/ssh-keys/7"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).with_token("tok");

    assert!(client.ssh_keys_by_user_id(42).await.unwrap().success());
    assert!(client.delete_ssh_key(7).await.unwrap().success());
}

#[tokio::test]
async fn test_identity_gateway_returns_profile() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/user"))
        .and(header("Authorization", "Bearer presented-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": 42, "email": "user@example.com"}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let profile = client.authed_user("presented-token").await.unwrap();

    assert_eq!(profile["id"], 42);
    // The gateway call does not leak a token onto the original handle.
    assert!(client.token().is_err());
}

#[tokio::test]
async fn test_identity_gateway_rejection_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v3/user"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "nope"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.authed_user("bad-token").await.is_none());
}

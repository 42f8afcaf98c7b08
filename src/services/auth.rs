//! Session verification against the external identity provider
//!
//! The provider owns sign-in. This service only resolves an opaque session
//! token to the user id it was issued for, asking the provider's session
//! endpoint and remembering the answer in Redis for a short while.

use reqwest::{Client as HttpClient, StatusCode};
use serde::Deserialize;

use crate::{
    cached,
    config::Config,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::UserId,
};

/// Resolves session tokens to users
#[async_trait::async_trait]
pub trait SessionVerifier: Send + Sync {
    /// `Ok(None)` when the token does not belong to a live session
    async fn verify(&self, token: &str) -> AppResult<Option<UserId>>;
}

const CLIENT_ID_HEADER: &str = "x-client-id";
const CLIENT_SECRET_HEADER: &str = "x-client-secret";

#[derive(Debug, Deserialize)]
struct SessionPayload {
    #[serde(default)]
    user: Option<SessionUser>,
}

#[derive(Debug, Deserialize)]
struct SessionUser {
    #[serde(default)]
    id: Option<String>,
}

#[derive(Clone)]
pub struct AuthProviderVerifier {
    http_client: HttpClient,
    auth_url: String,
    credentials: Option<(String, String)>,
    cache: Cache,
    cache_ttl: u64,
}

impl AuthProviderVerifier {
    pub fn new(config: &Config, cache: Cache) -> Self {
        Self {
            http_client: HttpClient::new(),
            auth_url: config.auth_url.trim_end_matches('/').to_string(),
            credentials: config.auth_credentials(),
            cache,
            cache_ttl: config.session_cache_ttl,
        }
    }

    /// Asks the provider who owns `token`, bypassing the cache
    async fn fetch_session(&self, token: &str) -> AppResult<Option<UserId>> {
        fetch_session(
            &self.http_client,
            &self.auth_url,
            self.credentials.as_ref(),
            token,
        )
        .await
    }
}

#[async_trait::async_trait]
impl SessionVerifier for AuthProviderVerifier {
    async fn verify(&self, token: &str) -> AppResult<Option<UserId>> {
        cached!(
            self.cache,
            CacheKey::Session(token.to_string()),
            self.cache_ttl,
            self.fetch_session(token)
        )
    }
}

async fn fetch_session(
    http_client: &HttpClient,
    auth_url: &str,
    credentials: Option<&(String, String)>,
    token: &str,
) -> AppResult<Option<UserId>> {
    let (client_id, client_secret) = credentials.ok_or_else(|| {
        AppError::Internal("Auth provider credentials are not configured".to_string())
    })?;

    let response = http_client
        .get(format!("{}/session", auth_url))
        .bearer_auth(token)
        .header(CLIENT_ID_HEADER, client_id.as_str())
        .header(CLIENT_SECRET_HEADER, client_secret.as_str())
        .send()
        .await
        .map_err(|e| AppError::Internal(format!("Auth provider request failed: {}", e)))?;

    match response.status() {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Ok(None),
        status if !status.is_success() => {
            return Err(AppError::Internal(format!(
                "Auth provider returned status {}",
                status
            )));
        }
        _ => {}
    }

    let payload: SessionPayload = response
        .json()
        .await
        .map_err(|e| AppError::Internal(format!("Invalid session payload: {}", e)))?;

    let user_id = payload
        .user
        .and_then(|user| user.id)
        .filter(|id| !id.is_empty());

    tracing::debug!(authenticated = user_id.is_some(), "Session resolved by auth provider");

    Ok(user_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials() -> (String, String) {
        ("moovies".to_string(), "s3cret".to_string())
    }

    fn config(auth_url: &str, redis_url: &str) -> Config {
        envy::from_iter(
            [
                ("AUTH_URL", auth_url),
                ("REDIS_URL", redis_url),
                ("AUTH_CLIENT_ID", "moovies"),
                ("AUTH_CLIENT_SECRET", "s3cret"),
            ]
            .map(|(k, v)| (k.to_string(), v.to_string())),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_unreachable_cache_falls_back_to_provider() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/session"))
            .and(header("authorization", "Bearer token-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user": { "id": "user-1" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        // Nothing listens on port 1
        let config = config(&server.uri(), "redis://127.0.0.1:1");
        let client = crate::db::create_redis_client(&config.redis_url).unwrap();
        let (cache, _handle) = Cache::new(client).await;
        let verifier = AuthProviderVerifier::new(&config, cache);

        let user = verifier.verify("token-1").await.unwrap();
        assert_eq!(user.as_deref(), Some("user-1"));
    }

    #[tokio::test]
    async fn test_live_session_resolves_user() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/session"))
            .and(header("authorization", "Bearer token-1"))
            .and(header("x-client-id", "moovies"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user": { "id": "user-1", "name": "Alice" },
                "expires": "2030-01-01T00:00:00.000Z"
            })))
            .mount(&server)
            .await;

        let user = fetch_session(
            &HttpClient::new(),
            &server.uri(),
            Some(&credentials()),
            "token-1",
        )
        .await
        .unwrap();

        assert_eq!(user.as_deref(), Some("user-1"));
    }

    #[tokio::test]
    async fn test_empty_session_is_anonymous() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/session"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let user = fetch_session(&HttpClient::new(), &server.uri(), Some(&credentials()), "t")
            .await
            .unwrap();

        assert_eq!(user, None);
    }

    #[tokio::test]
    async fn test_rejected_token_is_anonymous() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/session"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let user = fetch_session(&HttpClient::new(), &server.uri(), Some(&credentials()), "t")
            .await
            .unwrap();

        assert_eq!(user, None);
    }

    #[tokio::test]
    async fn test_provider_outage_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/session"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let result =
            fetch_session(&HttpClient::new(), &server.uri(), Some(&credentials()), "t").await;

        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_at_request_time() {
        let result = fetch_session(&HttpClient::new(), "http://127.0.0.1:9", None, "t").await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}

//! API client for the randomuser.me REST API.
//!
//! `ApiClient` performs a single unauthenticated GET per fetch and turns the
//! first record of the response into a `User`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use tracing::debug;

use crate::models::{RandomUserResponse, User};

use super::{ApiError, Fetcher};

// ============================================================================
// Constants
// ============================================================================

/// Public random profile generator
pub const DEFAULT_API_URL: &str = "https://randomuser.me/api";

/// HTTP request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// API client for randomuser.me.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    url: String,
}

impl ApiClient {
    /// Create a new API client for the given endpoint
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("profilecard/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }
}

#[async_trait]
impl Fetcher for ApiClient {
    async fn fetch_user(&self) -> Result<User, ApiError> {
        debug!(url = %self.url, "Fetching random user");

        let response = self
            .client
            .get(&self.url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let response = Self::check_response(response).await?;

        let body = response.text().await?;
        let parsed: RandomUserResponse = serde_json::from_str(&body)
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;

        parsed.into_first_user().ok_or(ApiError::NoResults)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(server: &mockito::Server) -> ApiClient {
        ApiClient::new(format!("{}/api", server.url()), Duration::from_secs(5))
            .expect("Failed to create client")
    }

    #[tokio::test]
    async fn test_fetch_user_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"results":[{"name":{"title":"Mr","first":"Alex","last":"Doe"},"email":"a@x.com","phone":"555-0100"}],"info":{"results":1}}"#,
            )
            .create_async()
            .await;

        let user = client_for(&server).fetch_user().await.unwrap();

        mock.assert_async().await;
        assert_eq!(user, User::new("Mr", "Alex", "Doe", "a@x.com"));
    }

    #[tokio::test]
    async fn test_fetch_user_takes_first_result() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api")
            .with_status(200)
            .with_body(
                r#"{"results":[
                    {"name":{"title":"Ms","first":"First","last":"One"},"email":"1@x.com"},
                    {"name":{"title":"Mr","first":"Second","last":"Two"},"email":"2@x.com"}
                ]}"#,
            )
            .create_async()
            .await;

        let user = client_for(&server).fetch_user().await.unwrap();
        assert_eq!(user.first_name(), "First");
    }

    #[tokio::test]
    async fn test_fetch_user_server_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api")
            .with_status(503)
            .with_body("Service Unavailable")
            .create_async()
            .await;

        let err = client_for(&server).fetch_user().await.unwrap_err();
        assert!(matches!(err, ApiError::ServerError(body) if body == "Service Unavailable"));
    }

    #[tokio::test]
    async fn test_fetch_user_empty_results() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api")
            .with_status(200)
            .with_body(r#"{"results":[]}"#)
            .create_async()
            .await;

        let err = client_for(&server).fetch_user().await.unwrap_err();
        assert!(matches!(err, ApiError::NoResults));
    }

    #[tokio::test]
    async fn test_fetch_user_malformed_json() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let err = client_for(&server).fetch_user().await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_fetch_user_missing_fields() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api")
            .with_status(200)
            .with_body(r#"{"results":[{"name":{"first":"NoEmail","last":"Person"}}]}"#)
            .create_async()
            .await;

        let err = client_for(&server).fetch_user().await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_fetch_user_timeout() {
        // Connections queue in the backlog but never get an answer
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/api", listener.local_addr().unwrap());
        let client = ApiClient::new(url, Duration::from_millis(200)).unwrap();

        let err = client.fetch_user().await.unwrap_err();
        assert!(matches!(err, ApiError::Timeout), "unexpected error: {err:?}");

        drop(listener);
    }
}

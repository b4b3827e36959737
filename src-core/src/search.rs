//! YouTube Data API v3 search.
//!
//! The whole request runs under one explicit deadline. Errors render as the
//! short codes the UI matches on (`API_KEY_MISSING`, `TIMEOUT`, ...).

use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/search";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_RESULTS: &str = "12";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SearchError {
    #[error("API_KEY_MISSING")]
    ApiKeyMissing,
    #[error("INVALID_QUERY")]
    InvalidQuery,
    #[error("API_ERROR: {0}")]
    Api(String),
    #[error("PARSE_ERROR")]
    Parse,
    #[error("NETWORK_ERROR: {0}")]
    Network(String),
    #[error("TIMEOUT")]
    Timeout,
}

pub struct SearchClient {
    http: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl SearchClient {
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Search for videos. A successful response body is returned as-is.
    pub async fn search(&self, query: &str, api_key: &str) -> Result<Value, SearchError> {
        if api_key.is_empty() {
            return Err(SearchError::ApiKeyMissing);
        }
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::InvalidQuery);
        }

        debug!(query, "Searching YouTube");
        match tokio::time::timeout(self.timeout, self.fetch(query, api_key)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(query, timeout = ?self.timeout, "Search timed out");
                Err(SearchError::Timeout)
            }
        }
    }

    async fn fetch(&self, query: &str, api_key: &str) -> Result<Value, SearchError> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("q", query),
                ("maxResults", MAX_RESULTS),
                ("key", api_key),
            ])
            .send()
            .await
            .map_err(network)?;

        let status = response.status();
        let body = response.bytes().await.map_err(network)?;
        let json: Value = serde_json::from_slice(&body).map_err(|_| SearchError::Parse)?;

        if status.is_success() {
            return Ok(json);
        }

        let message = json
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(Value::as_str)
            .unwrap_or("Unknown error")
            .to_string();
        warn!(%status, %message, "Search API error");
        Err(SearchError::Api(message))
    }
}

impl Default for SearchClient {
    fn default() -> Self {
        Self::new()
    }
}

// The request URL carries the API key, so it is stripped from the message.
fn network(err: reqwest::Error) -> SearchError {
    SearchError::Network(err.without_url().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Serve one canned response and report the request line.
    async fn serve_once(status: &str, body: &str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let n = socket.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();
            let line = request.lines().next().unwrap_or_default().to_string();
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            let _ = tx.send(line);
        });
        (format!("http://{}/youtube/v3/search", addr), rx)
    }

    #[tokio::test]
    async fn test_missing_key_checked_before_query() {
        let client = SearchClient::with_endpoint("http://127.0.0.1:9/unused");
        assert_eq!(client.search("", "").await, Err(SearchError::ApiKeyMissing));
        assert_eq!(
            client.search("   ", "key").await,
            Err(SearchError::InvalidQuery)
        );
        assert_eq!(SearchError::ApiKeyMissing.to_string(), "API_KEY_MISSING");
    }

    #[tokio::test]
    async fn test_success_returns_body_and_encodes_query() {
        let body = r#"{"kind":"youtube#searchListResponse","pageInfo":{"totalResults":1},"items":[{"id":{"videoId":"abc"},"snippet":{"title":"Lo-fi"}}]}"#;
        let (endpoint, request) = serve_once("200 OK", body).await;
        let client = SearchClient::with_endpoint(endpoint);

        let result = client.search("  lo-fi & chill  ", "secret").await.unwrap();
        assert_eq!(result, serde_json::from_str::<Value>(body).unwrap());

        let line = request.await.unwrap();
        assert!(line.starts_with("GET /youtube/v3/search?"));
        assert!(line.contains("part=snippet"));
        assert!(line.contains("type=video"));
        assert!(line.contains("q=lo-fi+%26+chill&"));
        assert!(line.contains("maxResults=12"));
        assert!(line.contains("key=secret"));
    }

    #[tokio::test]
    async fn test_api_error_message() {
        let body = r#"{"error":{"code":403,"message":"quotaExceeded"}}"#;
        let (endpoint, _request) = serve_once("403 Forbidden", body).await;
        let client = SearchClient::with_endpoint(endpoint);

        let err = client.search("cats", "key").await.unwrap_err();
        assert_eq!(err.to_string(), "API_ERROR: quotaExceeded");
    }

    #[tokio::test]
    async fn test_api_error_without_message() {
        let (endpoint, _request) = serve_once("500 Internal Server Error", "{}").await;
        let client = SearchClient::with_endpoint(endpoint);

        let err = client.search("cats", "key").await.unwrap_err();
        assert_eq!(err, SearchError::Api("Unknown error".to_string()));
    }

    #[tokio::test]
    async fn test_non_json_body_is_parse_error() {
        let (endpoint, _request) = serve_once("200 OK", "<html>nope</html>").await;
        let client = SearchClient::with_endpoint(endpoint);

        let err = client.search("cats", "key").await.unwrap_err();
        assert_eq!(err.to_string(), "PARSE_ERROR");
    }

    #[tokio::test]
    async fn test_network_error_hides_key() {
        // Bind then drop so the port refuses connections
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = SearchClient::with_endpoint(format!("http://{}/search", addr));
        let err = client.search("cats", "top-secret-key").await.unwrap_err();
        match &err {
            SearchError::Network(msg) => assert!(!msg.contains("top-secret-key")),
            other => panic!("expected network error, got {other:?}"),
        }
        assert!(err.to_string().starts_with("NETWORK_ERROR: "));
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let client = SearchClient::with_endpoint(format!("http://{}/search", addr))
            .timeout(Duration::from_millis(200));
        let err = client.search("cats", "key").await.unwrap_err();
        assert_eq!(err, SearchError::Timeout);
    }
}

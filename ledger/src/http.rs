//! HTTP adapter for a ledger gateway.
//!
//! - `POST {endpoint}/claims` with [`ClaimParams`]
//! - `POST {endpoint}/claims/revoke` with [`RevokeParams`]
//!
//! Both answer `{"deploy_hash": "<64 hex>"}` on success.

use std::time::Duration;

use agegate_types::{ClaimType, SubmissionHash};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::{LedgerClient, DEFAULT_LEDGER_TIMEOUT};
use crate::{ClaimParams, LedgerError, RevokeParams};

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

pub struct HttpLedgerClient {
    /// HTTP client (reusable connection pool).
    http_client: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct SubmissionResponse {
    deploy_hash: String,
}

impl HttpLedgerClient {
    pub fn new(endpoint: &str) -> Self {
        Self::with_timeout(endpoint, DEFAULT_LEDGER_TIMEOUT)
    }

    pub fn with_timeout(endpoint: &str, timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http_client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<SubmissionHash, LedgerError> {
        let url = format!("{}{}", self.endpoint, path);

        let response = self
            .http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LedgerError::Unreachable(format!("request timed out: {e}"))
                } else if e.is_connect() {
                    LedgerError::Unreachable(format!("connection failed: {e}"))
                } else {
                    LedgerError::RequestFailed(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(LedgerError::RequestFailed(format!(
                "HTTP status {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LedgerError::RequestFailed(e.to_string()))?;
        parse_submission_response(&body)
    }
}

/// Extract the submission hash from a gateway response body.
pub fn parse_submission_response(body: &str) -> Result<SubmissionHash, LedgerError> {
    let parsed: SubmissionResponse = serde_json::from_str(body)
        .map_err(|e| LedgerError::MalformedResponse(format!("unexpected body: {e}")))?;
    SubmissionHash::parse(&parsed.deploy_hash)
        .map_err(|e| LedgerError::MalformedResponse(e.to_string()))
}

#[async_trait]
impl LedgerClient for HttpLedgerClient {
    async fn submit(&self, params: &ClaimParams) -> Result<SubmissionHash, LedgerError> {
        tracing::debug!(endpoint = %self.endpoint, claim_type = %params.claim_type, "submitting claim");
        self.post("/claims", params).await
    }

    async fn revoke(
        &self,
        user_hash: &str,
        claim_type: ClaimType,
    ) -> Result<SubmissionHash, LedgerError> {
        tracing::debug!(endpoint = %self.endpoint, claim_type = %claim_type, "submitting revocation");
        let body = RevokeParams {
            user_hash: user_hash.to_string(),
            claim_type,
        };
        self.post("/claims/revoke", &body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agegate_types::Timestamp;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn params() -> ClaimParams {
        ClaimParams {
            user_hash: "ab".repeat(32),
            claim_type: ClaimType::AgeOver18,
            is_major: true,
            valid_from: Timestamp::new(1_717_200_000),
            valid_until: Timestamp::new(1_780_272_000),
        }
    }

    /// Serve one canned HTTP response and hand back the raw request.
    async fn serve_once(status: &'static str, body: String) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                if request_complete(&buf) {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&buf).into_owned()
        });
        (format!("http://{addr}"), handle)
    }

    fn request_complete(buf: &[u8]) -> bool {
        let text = String::from_utf8_lossy(buf);
        let Some(split) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..split]
            .lines()
            .find_map(|l| {
                let (name, value) = l.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        buf.len() >= split + 4 + content_length
    }

    #[test]
    fn parses_deploy_hash() {
        let hash = parse_submission_response(&format!(r#"{{"deploy_hash":"{}"}}"#, "AB".repeat(32)))
            .unwrap();
        assert_eq!(hash.as_str(), "ab".repeat(32));
    }

    #[test]
    fn rejects_missing_or_bad_hash() {
        assert!(matches!(
            parse_submission_response(r#"{"hash":"00"}"#),
            Err(LedgerError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_submission_response(r#"{"deploy_hash":"1234"}"#),
            Err(LedgerError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_submission_response("not json"),
            Err(LedgerError::MalformedResponse(_))
        ));
    }

    #[test]
    fn endpoint_trailing_slash_trimmed() {
        let client = HttpLedgerClient::new("http://ledger.local/");
        assert_eq!(client.endpoint(), "http://ledger.local");
    }

    #[tokio::test]
    async fn submit_posts_claim_params() {
        let hash = "cd".repeat(32);
        let (url, server) = serve_once("200 OK", format!(r#"{{"deploy_hash":"{hash}"}}"#)).await;
        let client = HttpLedgerClient::new(&url);

        let got = client.submit(&params()).await.unwrap();
        assert_eq!(got.as_str(), hash);

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /claims HTTP/1.1"));
        assert!(request.contains(r#""claim_type":"age_over_18""#));
        assert!(request.contains(r#""valid_from":1717200000"#));
    }

    #[tokio::test]
    async fn revoke_posts_to_revoke_path() {
        let hash = "ef".repeat(32);
        let (url, server) = serve_once("200 OK", format!(r#"{{"deploy_hash":"{hash}"}}"#)).await;
        let client = HttpLedgerClient::new(&url);

        let got = client.revoke("ab", ClaimType::AgeOver18).await.unwrap();
        assert_eq!(got.as_str(), hash);

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /claims/revoke HTTP/1.1"));
        assert!(request.contains(r#""user_hash":"ab""#));
    }

    #[tokio::test]
    async fn error_status_is_request_failed() {
        let (url, _server) = serve_once("500 Internal Server Error", "{}".to_string()).await;
        let client = HttpLedgerClient::new(&url);
        assert!(matches!(
            client.submit(&params()).await,
            Err(LedgerError::RequestFailed(_))
        ));
    }

    #[tokio::test]
    async fn closed_port_is_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = HttpLedgerClient::with_timeout(&format!("http://{addr}"), Duration::from_secs(2));
        assert!(matches!(
            client.submit(&params()).await,
            Err(LedgerError::Unreachable(_))
        ));
    }
}

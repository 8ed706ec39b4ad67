//! The forwarding handler.
//!
//! Non-POST requests are rejected before any I/O. POST bodies are sent to the
//! upstream webhook as JSON. Sending, waiting for headers and reading the body
//! all share one deadline; whichever step is pending when it fires is dropped,
//! which closes the upstream connection.

use axum::{
    body::Body,
    http::{header, Method, Request, Uri},
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::time::{Duration, Instant};

use crate::config::UpstreamConfig;
use crate::observability::metrics;
use crate::relay::envelope::{InboundBody, RelayResponse, UpstreamReply};
use crate::relay::error::RelayError;

/// Forwards sign-up submissions to the upstream webhook.
///
/// Cheap to share: the inner client pools connections and is thread-safe.
#[derive(Clone)]
pub struct SignupRelay {
    client: Client<HttpConnector, Body>,
    upstream: Uri,
    timeout: Duration,
    max_response_size: usize,
}

impl SignupRelay {
    pub fn new(config: &UpstreamConfig) -> Result<Self, RelayError> {
        let upstream = config.url.parse::<Uri>().map_err(RelayError::InvalidUri)?;
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        Ok(Self {
            client,
            upstream,
            timeout: config.timeout(),
            max_response_size: config.max_response_size,
        })
    }

    pub fn upstream(&self) -> &Uri {
        &self.upstream
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Handle one inbound request. Never fails: every outcome is a response.
    pub async fn handle(&self, method: &Method, body: InboundBody) -> RelayResponse {
        if method != Method::POST {
            tracing::debug!(method = %method, "Rejecting non-POST request");
            metrics::record_request("rejected", 405, None);
            return RelayResponse::method_not_allowed();
        }

        let start = Instant::now();
        match self.forward(&body).await {
            Ok(reply) => {
                tracing::info!(
                    status = reply.status.as_u16(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Upstream responded"
                );
                metrics::record_request("relayed", reply.status.as_u16(), Some(start));
                reply.into()
            }
            Err(e) => {
                tracing::error!(
                    error = %e.detail(),
                    code = e.code().unwrap_or("none"),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Failed to reach upstream"
                );
                metrics::record_request("failed", 502, Some(start));
                RelayResponse::transport_failure(&e)
            }
        }
    }

    /// Perform the single upstream call.
    pub async fn forward(&self, body: &InboundBody) -> Result<UpstreamReply, RelayError> {
        let request = Request::builder()
            .method(Method::POST)
            .uri(self.upstream.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_payload()?))
            .map_err(RelayError::Request)?;

        let deadline = tokio::time::Instant::now() + self.timeout;

        let response = tokio::time::timeout_at(deadline, self.client.request(request))
            .await
            .map_err(|_| RelayError::Timeout(self.timeout))?
            .map_err(RelayError::Transport)?;

        let status = response.status();
        let bytes = tokio::time::timeout_at(
            deadline,
            axum::body::to_bytes(Body::new(response.into_body()), self.max_response_size),
        )
        .await
        .map_err(|_| RelayError::Timeout(self.timeout))?
        .map_err(RelayError::Body)?;

        Ok(UpstreamReply::from_text(status, &String::from_utf8_lossy(&bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    fn config(url: &str, timeout_ms: u64) -> UpstreamConfig {
        UpstreamConfig {
            url: url.to_string(),
            timeout_ms,
            max_response_size: 1024,
        }
    }

    #[test]
    fn test_new_parses_upstream() {
        let relay = SignupRelay::new(&config("http://127.0.0.1:5678/webhook/signup-form", 15_000)).unwrap();
        assert_eq!(relay.upstream().path(), "/webhook/signup-form");
        assert_eq!(relay.timeout(), Duration::from_secs(15));
    }

    #[test]
    fn test_new_rejects_bad_uri() {
        let err = SignupRelay::new(&config("http://exa mple.com/", 1000)).err().unwrap();
        assert!(matches!(err, RelayError::InvalidUri(_)));
    }

    #[tokio::test]
    async fn test_non_post_is_rejected() {
        // Port 9 (discard) is never contacted: the method gate comes first.
        let relay = SignupRelay::new(&config("http://127.0.0.1:9/webhook/signup-form", 1000)).unwrap();

        for method in [Method::GET, Method::PUT, Method::DELETE, Method::PATCH, Method::HEAD] {
            let response = relay.handle(&method, InboundBody::Empty).await;
            assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(response.body, json!({ "error": "Method not allowed" }));
        }
    }

    #[tokio::test]
    async fn test_refused_connection_becomes_502() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let relay = SignupRelay::new(&config(&format!("http://{}/webhook/signup-form", addr), 1000)).unwrap();
        let response = relay
            .handle(&Method::POST, InboundBody::Json(json!({ "email": "a@b.com" })))
            .await;

        assert_eq!(response.status, StatusCode::BAD_GATEWAY);
        assert_eq!(response.body["error"], "Failed to reach onboarding service");
        assert_eq!(response.body["code"], "ECONNREFUSED");
        assert!(response.body["detail"].as_str().unwrap().contains("upstream request failed"));
    }
}

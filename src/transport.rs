use crate::config::ClientConfig;
use crate::errors::ClientError;
use crate::models::ServiceErrorBody;
use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use std::{fmt, sync::Arc, time::Duration};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// One outgoing exchange, fully assembled.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Performs a single network exchange. Status interpretation is left to
/// [`TransportClient`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ClientError>;
}

/// `reqwest`-backed transport; the inner client pools connections across calls.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, ClientError> {
        let mut builder = self.client.request(request.method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(RawResponse { status, body })
    }
}

/// Per-call deadline and cancellation.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    pub timeout: Option<Duration>,
    pub cancel: Option<CancellationToken>,
}

impl CallOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

#[derive(Clone)]
pub struct TransportClient {
    base_url: String,
    api_key: String,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for TransportClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl TransportClient {
    pub fn new(config: &ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            transport,
        }
    }

    /// Issues one authenticated request and decodes a 200 body into `T`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
        opts: &CallOptions,
    ) -> Result<T, ClientError> {
        let request = ApiRequest {
            method: method.clone(),
            url: format!("{}{}", self.base_url, path),
            headers: vec![("Authorization".to_string(), self.api_key.clone())],
            query: query
                .iter()
                .map(|(key, value)| (key.to_string(), value.clone()))
                .collect(),
            body,
        };

        let response = self.exchange(request, opts).await.inspect_err(|err| {
            warn!(%method, path, "habitify request failed: {err}");
        })?;
        debug!(%method, path, status = response.status, "habitify exchange");

        // Anything other than an exact 200 is a failure, 201 and 204 included.
        if response.status != 200 {
            let err = failure_from(&response);
            warn!(%method, path, status = response.status, "habitify request rejected: {err}");
            return Err(err);
        }

        Ok(serde_json::from_slice(&response.body)?)
    }

    async fn exchange(
        &self,
        request: ApiRequest,
        opts: &CallOptions,
    ) -> Result<RawResponse, ClientError> {
        let send = async {
            match opts.timeout {
                Some(limit) => tokio::time::timeout(limit, self.transport.send(request))
                    .await
                    .unwrap_or_else(|_| Err(ClientError::timed_out())),
                None => self.transport.send(request).await,
            }
        };

        match &opts.cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(ClientError::Cancelled),
                result = send => result,
            },
            None => send.await,
        }
    }
}

fn failure_from(response: &RawResponse) -> ClientError {
    match serde_json::from_slice::<ServiceErrorBody>(&response.body) {
        Ok(body) => ClientError::Service {
            status: response.status,
            reason: body.reason,
            detail: body.additional_info.filter(|detail| {
                !detail.actual_unit_category.is_empty() || !detail.expected_unit_category.is_empty()
            }),
        },
        Err(_) => ClientError::status(response.status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubTransport;
    use serde_json::json;

    fn client(stub: &Arc<StubTransport>) -> TransportClient {
        let config = ClientConfig::new("key-123").with_base_url("https://habits.test/");
        TransportClient::new(&config, stub.clone())
    }

    #[tokio::test]
    async fn attaches_api_key_and_query() {
        let stub = Arc::new(StubTransport::new().respond(200, "[]"));
        let items: Vec<serde_json::Value> = client(&stub)
            .request(
                Method::GET,
                "/journal",
                &[("target_date", "2024-03-01T00:00:00Z".to_string())],
                None,
                &CallOptions::default(),
            )
            .await
            .unwrap();
        assert!(items.is_empty());

        let sent = stub.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, Method::GET);
        assert_eq!(sent[0].url, "https://habits.test/journal");
        assert_eq!(sent[0].header("authorization"), Some("key-123"));
        assert_eq!(sent[0].query_param("target_date"), Some("2024-03-01T00:00:00Z"));
        assert_eq!(sent[0].body, None);
    }

    #[tokio::test]
    async fn non_200_success_codes_are_failures() {
        let stub = Arc::new(StubTransport::new().respond(201, r#"{"id":"x"}"#));
        let err = client(&stub)
            .request::<serde_json::Value>(Method::POST, "/habits/h/logs", &[], Some(json!({})), &CallOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Transport { status: Some(201), .. }));
    }

    #[tokio::test]
    async fn structured_error_body_becomes_service_error() {
        let body = r#"{"reason":"unit_mismatch","additional_info":{"actual_unit_category":"time","expected_unit_category":"count"}}"#;
        let stub = Arc::new(StubTransport::new().respond(400, body));
        let err = client(&stub)
            .request::<serde_json::Value>(Method::POST, "/habits/h/logs", &[], Some(json!({})), &CallOptions::default())
            .await
            .unwrap_err();
        match err {
            ClientError::Service { status, reason, detail } => {
                assert_eq!(status, 400);
                assert_eq!(reason, "unit_mismatch");
                let detail = detail.expect("detail");
                assert_eq!(detail.actual_unit_category, "time");
                assert_eq!(detail.expected_unit_category, "count");
            }
            other => panic!("expected service error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unparseable_error_body_keeps_status() {
        let stub = Arc::new(StubTransport::new().respond(502, "<html>bad gateway</html>"));
        let err = client(&stub)
            .request::<Vec<serde_json::Value>>(Method::GET, "/habits", &[], None, &CallOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Transport { status: Some(502), .. }));
    }

    #[tokio::test]
    async fn malformed_success_body_is_decode_error() {
        let stub = Arc::new(StubTransport::new().respond(200, "{not json"));
        let err = client(&stub)
            .request::<Vec<serde_json::Value>>(Method::GET, "/habits", &[], None, &CallOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn connection_failure_has_no_status() {
        let stub = Arc::new(StubTransport::new().fail(ClientError::connection("dns error")));
        let err = client(&stub)
            .request::<Vec<serde_json::Value>>(Method::GET, "/habits", &[], None, &CallOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Transport { status: None, .. }));
    }

    #[tokio::test]
    async fn deadline_elapses_as_transport_error() {
        let stub = Arc::new(
            StubTransport::new()
                .respond(200, "[]")
                .with_delay(Duration::from_secs(5)),
        );
        let opts = CallOptions::default().with_timeout(Duration::from_millis(20));
        let err = client(&stub)
            .request::<Vec<serde_json::Value>>(Method::GET, "/habits", &[], None, &opts)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Transport { status: None, .. }));
        assert_eq!(err.to_string(), "transport error: request timed out");
    }

    #[tokio::test]
    async fn cancelled_token_stops_the_call() {
        let stub = Arc::new(
            StubTransport::new()
                .respond(200, "[]")
                .with_delay(Duration::from_secs(5)),
        );
        let token = CancellationToken::new();
        token.cancel();
        let opts = CallOptions::default().with_cancel(token);
        let err = client(&stub)
            .request::<Vec<serde_json::Value>>(Method::GET, "/habits", &[], None, &opts)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Cancelled));
    }

    #[tokio::test]
    async fn reason_only_error_body_has_no_detail() {
        let stub = Arc::new(
            StubTransport::new()
                .respond(404, r#"{"reason":"not_found"}"#)
                .respond(400, r#"{"reason":"bad_unit","additional_info":{}}"#),
        );
        let client = client(&stub);

        let err = client
            .request::<serde_json::Value>(Method::GET, "/habits/h", &[], None, &CallOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "not_found");
        assert!(matches!(
            err,
            ClientError::Service { status: 404, ref reason, detail: None } if reason == "not_found"
        ));

        let err = client
            .request::<serde_json::Value>(Method::POST, "/habits/h/logs", &[], Some(json!({})), &CallOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "bad_unit");
        assert!(matches!(err, ClientError::Service { status: 400, detail: None, .. }));
    }
}

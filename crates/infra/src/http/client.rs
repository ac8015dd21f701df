use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client as ReqwestClient;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use wikisave_core::SaveTransport;
use wikisave_domain::{Result, SavePayload, TransportOutcome, WikiSaveError};

use crate::errors::InfraError;

const ABORTED_MESSAGE: &str = "request aborted";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// [`SaveTransport`] over reqwest.
///
/// Each `post` races the request against its own deadline and the shared
/// shutdown token. Retries are the orchestrator's business, not this
/// client's.
#[derive(Clone)]
pub struct HttpSaveTransport {
    client: ReqwestClient,
    shutdown: CancellationToken,
}

impl HttpSaveTransport {
    /// Start building a new transport.
    pub fn builder() -> HttpSaveTransportBuilder {
        HttpSaveTransportBuilder::default()
    }

    async fn execute(&self, endpoint: &str, payload: &SavePayload<'_>) -> TransportOutcome {
        let response = match self.client.post(endpoint).json(payload).send().await {
            Ok(response) => response,
            Err(err) => return failure_outcome(err),
        };

        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        debug!(%status, retry_count = payload.retry_count, "received save response");

        let body = match response.text().await {
            Ok(body) => body,
            Err(err) if err.is_timeout() => return TransportOutcome::TimedOut,
            Err(err) => {
                debug!(error = %err, "failed to read save response body");
                String::new()
            }
        };

        TransportOutcome::Response { status: status.as_u16(), status_text, body }
    }
}

#[async_trait]
impl SaveTransport for HttpSaveTransport {
    async fn post(
        &self,
        endpoint: &str,
        payload: &SavePayload<'_>,
        timeout: Duration,
    ) -> TransportOutcome {
        debug!(
            endpoint,
            retry_count = payload.retry_count,
            timeout_secs = timeout.as_secs(),
            "sending save request"
        );

        tokio::select! {
            biased;
            () = self.shutdown.cancelled() => TransportOutcome::Failed(ABORTED_MESSAGE.into()),
            () = tokio::time::sleep(timeout) => {
                debug!(endpoint, "save request deadline elapsed");
                TransportOutcome::TimedOut
            }
            outcome = self.execute(endpoint, payload) => outcome,
        }
    }
}

fn failure_outcome(err: reqwest::Error) -> TransportOutcome {
    if err.is_timeout() {
        return TransportOutcome::TimedOut;
    }

    debug!(error = %err, "save request failed");
    let infra: InfraError = err.into();
    match WikiSaveError::from(infra) {
        WikiSaveError::Network(message) | WikiSaveError::Config(message) => {
            TransportOutcome::Failed(message)
        }
        other => TransportOutcome::Failed(other.to_string()),
    }
}

/// Builder for [`HttpSaveTransport`].
///
/// Proxies come from the usual `HTTP_PROXY`/`HTTPS_PROXY`/`NO_PROXY`
/// environment variables unless [`proxy_from_env`](Self::proxy_from_env)
/// turns that off.
#[derive(Debug)]
pub struct HttpSaveTransportBuilder {
    user_agent: Option<String>,
    default_headers: Option<HeaderMap>,
    shutdown: Option<CancellationToken>,
    proxy_from_env: bool,
}

impl Default for HttpSaveTransportBuilder {
    fn default() -> Self {
        Self { user_agent: None, default_headers: None, shutdown: None, proxy_from_env: true }
    }
}

impl HttpSaveTransportBuilder {
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Headers sent with every request. `Accept: application/json` is added
    /// unless already present.
    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    pub fn proxy_from_env(mut self, enabled: bool) -> Self {
        self.proxy_from_env = enabled;
        self
    }

    /// Share an existing shutdown token instead of creating a fresh one.
    pub fn shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = Some(token);
        self
    }

    pub fn build(self) -> Result<HttpSaveTransport> {
        let mut headers = self.default_headers.unwrap_or_default();
        headers.entry(ACCEPT).or_insert(HeaderValue::from_static("application/json"));

        let mut builder =
            ReqwestClient::builder().connect_timeout(CONNECT_TIMEOUT).default_headers(headers);

        if !self.proxy_from_env {
            builder = builder.no_proxy();
        }

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        let client = builder.build().map_err(|err| {
            let infra: InfraError = err.into();
            WikiSaveError::from(infra)
        })?;

        Ok(HttpSaveTransport { client, shutdown: self.shutdown.unwrap_or_default() })
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use serde_json::json;
    use wikisave_domain::Credential;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    // Proxy variables on the test host must not reroute requests to the mock server
    fn builder() -> HttpSaveTransportBuilder {
        HttpSaveTransport::builder().proxy_from_env(false)
    }

    fn transport() -> HttpSaveTransport {
        builder().user_agent("wikisave-test").build().expect("transport")
    }

    fn credential() -> Credential {
        Credential::new("hunter2").expect("non-empty credential")
    }

    #[tokio::test]
    async fn posts_json_payload_and_returns_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/save"))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(json!({
                "content": "<html/>",
                "password": "hunter2",
                "retryCount": 2
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"commit":"abc"}"#))
            .expect(1)
            .mount(&server)
            .await;

        let credential = credential();
        let payload = SavePayload::new("<html/>", &credential, 2);
        let outcome = transport()
            .post(&format!("{}/save", server.uri()), &payload, Duration::from_secs(5))
            .await;

        assert_eq!(
            outcome,
            TransportOutcome::Response {
                status: 200,
                status_text: "OK".into(),
                body: r#"{"commit":"abc"}"#.into(),
            }
        );
    }

    #[tokio::test]
    async fn default_headers_are_sent_with_accept() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("x-wiki-origin", "https://wiki.example"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let mut headers = HeaderMap::new();
        headers.insert("x-wiki-origin", HeaderValue::from_static("https://wiki.example"));
        let transport = builder().default_headers(headers).build().unwrap();

        let credential = credential();
        let payload = SavePayload::new("x", &credential, 0);
        let outcome = transport.post(&server.uri(), &payload, Duration::from_secs(5)).await;

        assert!(outcome.is_success(), "{outcome:?}");
    }

    #[tokio::test]
    async fn error_statuses_are_responses_not_failures() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string(r#"{"resetIn":30}"#))
            .mount(&server)
            .await;

        let credential = credential();
        let payload = SavePayload::new("x", &credential, 0);
        let outcome = transport().post(&server.uri(), &payload, Duration::from_secs(5)).await;

        match outcome {
            TransportOutcome::Response { status, status_text, body } => {
                assert_eq!(status, 429);
                assert_eq!(status_text, "Too Many Requests");
                assert_eq!(body, r#"{"resetIn":30}"#);
            }
            other => panic!("expected response, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&server)
            .await;

        let credential = credential();
        let payload = SavePayload::new("x", &credential, 0);
        let outcome = transport().post(&server.uri(), &payload, Duration::from_millis(100)).await;

        assert_eq!(outcome, TransportOutcome::TimedOut);
    }

    #[tokio::test]
    async fn refused_connection_is_a_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener); // release the port so that requests fail with ECONNREFUSED

        let credential = credential();
        let payload = SavePayload::new("x", &credential, 0);
        let outcome =
            transport().post(&format!("http://{addr}"), &payload, Duration::from_secs(5)).await;

        match outcome {
            TransportOutcome::Failed(message) => {
                assert!(message.starts_with("HTTP connection failure"), "{message}");
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn invalid_endpoint_is_a_failure() {
        let credential = credential();
        let payload = SavePayload::new("x", &credential, 0);
        let outcome = transport().post("not a url", &payload, Duration::from_secs(5)).await;

        assert!(matches!(outcome, TransportOutcome::Failed(_)));
    }

    #[tokio::test]
    async fn shutdown_aborts_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let shutdown = CancellationToken::new();
        let transport = builder().shutdown(shutdown.clone()).build().unwrap();
        shutdown.cancel();

        let credential = credential();
        let payload = SavePayload::new("x", &credential, 0);
        let outcome = transport.post(&server.uri(), &payload, Duration::from_secs(10)).await;

        assert_eq!(outcome, TransportOutcome::Failed("request aborted".into()));
    }
}

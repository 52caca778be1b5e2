//! Client layer: prepares messages and drives gateway calls in order.

mod error;

use std::error::Error as StdError;
use std::future::Future;
use std::num::NonZeroUsize;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{Instrument, debug, warn};
use url::Url;

use crate::domain::{
    AllowList, Credentials, DEFAULT_PLACEHOLDER, MAX_CHUNK_LENGTH, MessageText, Sanitizer,
    SendResponse, chunk,
};

pub use error::FreeMobileError;

const DEFAULT_ENDPOINT: &str = "https://smsapi.free-mobile.fr/sendmsg";

/// Boxed future returned by [`HttpTransport`] implementations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Error type for failures where no HTTP response was received.
pub type BoxError = Box<dyn StdError + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Raw HTTP response as seen by the client.
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// HTTP capability used to deliver one chunk.
///
/// Implementations must return `Ok` whenever the gateway answered, whatever the
/// status and even if the body could not be read, and `Err` only when no status
/// was received (DNS, TLS, connection, timeout). Status classification is done by
/// the client.
pub trait HttpTransport: Send + Sync {
    fn post_json<'a>(
        &'a self,
        url: &'a Url,
        body: Value,
    ) -> BoxFuture<'a, Result<HttpResponse, BoxError>>;
}

#[derive(Debug, Clone)]
/// Default [`HttpTransport`] backed by `reqwest`.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl HttpTransport for ReqwestTransport {
    fn post_json<'a>(
        &'a self,
        url: &'a Url,
        body: Value,
    ) -> BoxFuture<'a, Result<HttpResponse, BoxError>> {
        Box::pin(async move {
            let response = self.client.post(url.as_str()).json(&body).send().await?;
            let status = response.status().as_u16();
            // The gateway has answered once the status line arrived; a cut-off body
            // must not turn an accepted chunk into a network failure.
            let body = match response.text().await {
                Ok(body) => body,
                Err(err) => {
                    debug!(status, error = %err, "failed to read gateway response body");
                    String::new()
                }
            };
            Ok(HttpResponse { status, body })
        })
    }
}

fn default_endpoint() -> Url {
    Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL")
}

#[derive(Clone)]
/// Builder for [`FreeMobileClient`].
///
/// Use this when you need to customize the endpoint, HTTP settings, or how messages
/// are prepared. Every value is fixed once [`FreeMobileClientBuilder::build`] returns.
pub struct FreeMobileClientBuilder {
    credentials: Credentials,
    endpoint: Url,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    transport: Option<Arc<dyn HttpTransport>>,
    allow_list: AllowList,
    placeholder: String,
    max_chunk_length: NonZeroUsize,
    unsupported_note: Option<String>,
}

impl FreeMobileClientBuilder {
    /// Create a builder with the default endpoint, allow-list, placeholder, and chunk length.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            endpoint: default_endpoint(),
            timeout: None,
            user_agent: None,
            transport: None,
            allow_list: AllowList::default(),
            placeholder: DEFAULT_PLACEHOLDER.to_owned(),
            max_chunk_length: MAX_CHUNK_LENGTH,
            unsupported_note: None,
        }
    }

    /// Override the gateway URL.
    pub fn endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Set an HTTP client timeout applied to each gateway call.
    ///
    /// Ignored when a custom transport is set.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    ///
    /// Ignored when a custom transport is set.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Use a custom HTTP transport instead of the default `reqwest` one.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Replace the set of symbols that pass sanitization unchanged.
    pub fn allow_list(mut self, allow_list: AllowList) -> Self {
        self.allow_list = allow_list;
        self
    }

    /// Override the text substituted for unsupported symbols (default `[]`).
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Override the maximum number of characters per gateway call (default 999).
    pub fn max_chunk_length(mut self, length: NonZeroUsize) -> Self {
        self.max_chunk_length = length;
        self
    }

    /// Append `note` to messages in which at least one symbol was replaced.
    ///
    /// See [`crate::domain::DEFAULT_UNSUPPORTED_NOTE`] for a ready-made text.
    pub fn unsupported_symbol_note(mut self, note: impl Into<String>) -> Self {
        self.unsupported_note = Some(note.into());
        self
    }

    /// Build a [`FreeMobileClient`].
    ///
    /// Fails only when the default `reqwest` client cannot be created (TLS backend
    /// or invalid settings). That failure is reported as `NETWORK_ERROR` with a
    /// message naming the HTTP client setup; no gateway call has been made.
    pub fn build(self) -> Result<FreeMobileClient, FreeMobileError> {
        let http = match self.transport {
            Some(transport) => transport,
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                if let Some(user_agent) = self.user_agent {
                    builder = builder.user_agent(user_agent);
                }
                let client = builder
                    .build()
                    .map_err(|err| FreeMobileError::client_setup(Box::new(err)))?;
                Arc::new(ReqwestTransport::new(client))
            }
        };

        Ok(FreeMobileClient {
            credentials: self.credentials,
            endpoint: self.endpoint,
            sanitizer: Sanitizer::new(self.allow_list, self.placeholder),
            max_chunk_length: self.max_chunk_length,
            unsupported_note: self.unsupported_note,
            http,
        })
    }
}

#[derive(Clone)]
/// High-level Free Mobile SMS client.
///
/// [`FreeMobileClient::send`] sanitizes the text, splits it into chunks the gateway
/// accepts, and posts the chunks one after another to
/// `https://smsapi.free-mobile.fr/sendmsg`. A chunk is only posted once the
/// previous one succeeded; the first failure stops the message.
///
/// The client holds no per-message state and can be shared between tasks.
pub struct FreeMobileClient {
    credentials: Credentials,
    endpoint: Url,
    sanitizer: Sanitizer,
    max_chunk_length: NonZeroUsize,
    unsupported_note: Option<String>,
    http: Arc<dyn HttpTransport>,
}

impl FreeMobileClient {
    /// Create a client with default settings.
    ///
    /// For more customization, use [`FreeMobileClient::builder`].
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            endpoint: default_endpoint(),
            sanitizer: Sanitizer::default(),
            max_chunk_length: MAX_CHUNK_LENGTH,
            unsupported_note: None,
            http: Arc::new(ReqwestTransport::new(reqwest::Client::new())),
        }
    }

    /// Create a client from untyped credentials, e.g. a parsed JSON config entry.
    ///
    /// Fails with `INVALID_CREDENTIALS`, `INVALID_USER`, or `INVALID_PASS`.
    pub fn from_value(credentials: &Value) -> Result<Self, FreeMobileError> {
        Ok(Self::new(Credentials::from_value(credentials)?))
    }

    /// Start building a client with custom settings.
    pub fn builder(credentials: Credentials) -> FreeMobileClientBuilder {
        FreeMobileClientBuilder::new(credentials)
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Sanitize and chunk `message` without sending anything.
    ///
    /// Returns the exact chunks [`FreeMobileClient::send`] would post, in order.
    /// Fails with `EMPTY_MESSAGE` when nothing but whitespace is left after sanitization.
    pub fn prepare(&self, message: &str) -> Result<Vec<String>, FreeMobileError> {
        let sanitized = self.sanitizer.sanitize(message);
        let mut text = MessageText::new(sanitized.text)?;
        let note = self.unsupported_note.as_deref();
        if let Some(note) = note.filter(|_| sanitized.replaced > 0) {
            text = text.with_note(note);
        }

        Ok(chunk(text.as_str(), self.max_chunk_length)
            .into_iter()
            .map(str::to_owned)
            .collect())
    }

    /// Send a text message through the gateway.
    ///
    /// On success the response holds one entry per chunk, in send order.
    ///
    /// Errors:
    /// - `EMPTY_MESSAGE` before any network call,
    /// - a gateway kind (`BAD_REQUEST`, `RATE_LIMITED`, `ACCESS_DENIED`, `SERVER_ERROR`,
    ///   `HTTP_ERROR`, `NETWORK_ERROR`) for the first chunk that fails. Earlier chunks stay
    ///   delivered; see [`FreeMobileError::chunks_delivered`].
    pub async fn send(&self, message: &str) -> Result<SendResponse, FreeMobileError> {
        let chunks = self.prepare(message)?;
        let span = tracing::debug_span!("send", chunks = chunks.len());
        self.dispatch(&chunks).instrument(span).await
    }

    /// Send a message given as an untyped value.
    ///
    /// Anything other than a string fails with `INVALID_MESSAGE_TYPE` before any network call.
    pub async fn send_value(&self, message: &Value) -> Result<SendResponse, FreeMobileError> {
        let message = MessageText::input_from_value(message)?;
        self.send(message).await
    }

    async fn dispatch(&self, chunks: &[String]) -> Result<SendResponse, FreeMobileError> {
        let total = chunks.len();
        let mut response = SendResponse::default();

        for (index, text) in chunks.iter().enumerate() {
            let body = crate::transport::encode_send_message_body(&self.credentials, text);
            let outcome = self.http.post_json(&self.endpoint, body).await;

            match error::classify_outcome(outcome, response.len()) {
                Ok(delivered) => {
                    debug!(
                        chunk = index + 1,
                        total,
                        status = delivered.status,
                        "chunk delivered"
                    );
                    response.chunks.push(delivered);
                }
                Err(err) => {
                    warn!(
                        chunk = index + 1,
                        total,
                        delivered = err.chunks_delivered(),
                        kind = %err.kind(),
                        status = ?err.status(),
                        "chunk delivery failed, skipping remaining chunks"
                    );
                    return Err(err);
                }
            }
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io;
    use std::sync::Mutex;

    use serde_json::json;

    use crate::domain::ErrorKind;

    use super::*;

    #[derive(Debug, Clone)]
    enum Outcome {
        Status(u16, &'static str),
        NoResponse(&'static str),
    }

    #[derive(Debug, Clone, Default)]
    struct FakeTransport {
        state: Arc<Mutex<FakeTransportState>>,
    }

    #[derive(Debug, Default)]
    struct FakeTransportState {
        outcomes: VecDeque<Outcome>,
        urls: Vec<String>,
        bodies: Vec<Value>,
        in_flight: usize,
        max_in_flight: usize,
    }

    impl FakeTransport {
        fn with_outcomes(outcomes: impl IntoIterator<Item = Outcome>) -> Self {
            let transport = Self::default();
            transport.state.lock().unwrap().outcomes = outcomes.into_iter().collect();
            transport
        }

        fn bodies(&self) -> Vec<Value> {
            self.state.lock().unwrap().bodies.clone()
        }

        fn sent_chunks(&self) -> Vec<String> {
            self.bodies()
                .iter()
                .map(|body| body["msg"].as_str().unwrap().to_owned())
                .collect()
        }

        fn calls(&self) -> usize {
            self.state.lock().unwrap().bodies.len()
        }
    }

    impl HttpTransport for FakeTransport {
        fn post_json<'a>(
            &'a self,
            url: &'a Url,
            body: Value,
        ) -> BoxFuture<'a, Result<HttpResponse, BoxError>> {
            Box::pin(async move {
                let outcome = {
                    let mut state = self.state.lock().unwrap();
                    state.urls.push(url.to_string());
                    state.bodies.push(body);
                    state.in_flight += 1;
                    state.max_in_flight = state.max_in_flight.max(state.in_flight);
                    state
                        .outcomes
                        .pop_front()
                        .unwrap_or(Outcome::Status(200, ""))
                };

                tokio::task::yield_now().await;
                self.state.lock().unwrap().in_flight -= 1;

                match outcome {
                    Outcome::Status(status, body) => Ok(HttpResponse {
                        status,
                        body: body.to_owned(),
                    }),
                    Outcome::NoResponse(message) => Err(Box::new(io::Error::new(
                        io::ErrorKind::ConnectionRefused,
                        message,
                    )) as BoxError),
                }
            })
        }
    }

    fn make_client(transport: FakeTransport) -> FreeMobileClient {
        FreeMobileClient::builder(Credentials::new("12345678", "secret").unwrap())
            .endpoint(Url::parse("https://example.invalid/sendmsg").unwrap())
            .transport(Arc::new(transport))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn send_posts_credentials_and_text_once_for_short_messages() {
        let transport = FakeTransport::default();
        let client = make_client(transport.clone());

        let response = client.send("hello").await.unwrap();
        assert_eq!(response.len(), 1);
        assert_eq!(response.last().map(|it| it.status), Some(200));

        assert_eq!(
            transport.bodies(),
            vec![json!({ "user": "12345678", "pass": "secret", "msg": "hello" })]
        );
        let urls = transport.state.lock().unwrap().urls.clone();
        assert_eq!(urls, vec!["https://example.invalid/sendmsg".to_owned()]);
    }

    #[tokio::test]
    async fn send_delivers_chunks_in_order_and_collects_all_responses() {
        let transport = FakeTransport::with_outcomes([
            Outcome::Status(200, "first"),
            Outcome::Status(200, "second"),
            Outcome::Status(200, "third"),
        ]);
        let client = make_client(transport.clone());
        let message = format!("{}{}{}", "a".repeat(999), "b".repeat(999), "c".repeat(502));

        let response = client.send(&message).await.unwrap();

        let bodies = response
            .chunks
            .iter()
            .map(|it| it.body.as_str())
            .collect::<Vec<_>>();
        assert_eq!(bodies, vec!["first", "second", "third"]);
        assert_eq!(response.last().unwrap().body, "third");
        assert_eq!(
            transport.sent_chunks(),
            vec!["a".repeat(999), "b".repeat(999), "c".repeat(502)]
        );
        assert_eq!(transport.state.lock().unwrap().max_in_flight, 1);
    }

    #[tokio::test]
    async fn send_stops_at_first_failed_chunk() {
        let transport = FakeTransport::with_outcomes([
            Outcome::Status(200, ""),
            Outcome::Status(403, ""),
            Outcome::Status(200, ""),
        ]);
        let client = make_client(transport.clone());
        let message = "x".repeat(2500);

        let err = client.send(&message).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::AccessDenied);
        assert_eq!(err.status(), Some(403));
        assert_eq!(err.chunks_delivered(), 1);
        assert!(err.is_partial_delivery());
        assert_eq!(transport.calls(), 2);
        let sizes = transport
            .sent_chunks()
            .iter()
            .map(|it| it.chars().count())
            .collect::<Vec<_>>();
        assert_eq!(sizes, vec![999, 999]);
    }

    #[tokio::test]
    async fn first_chunk_failure_reports_nothing_delivered() {
        let transport = FakeTransport::with_outcomes([Outcome::Status(402, "")]);
        let client = make_client(transport.clone());

        let err = client.send(&"x".repeat(1500)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RateLimited);
        assert_eq!(err.chunks_delivered(), 0);
        assert!(!err.is_partial_delivery());
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn send_maps_gateway_statuses() {
        for (status, kind) in [
            (400, ErrorKind::BadRequest),
            (402, ErrorKind::RateLimited),
            (403, ErrorKind::AccessDenied),
            (500, ErrorKind::ServerError),
            (503, ErrorKind::HttpError),
        ] {
            let transport = FakeTransport::with_outcomes([Outcome::Status(status, "")]);
            let client = make_client(transport);
            let err = client.send("hello").await.unwrap_err();
            assert_eq!(err.kind(), kind, "status {status}");
            assert_eq!(err.status(), Some(status));
        }
    }

    #[tokio::test]
    async fn send_maps_missing_response_to_network_error() {
        let transport = FakeTransport::with_outcomes([
            Outcome::Status(200, ""),
            Outcome::NoResponse("dns lookup failed"),
        ]);
        let client = make_client(transport.clone());

        let err = client.send(&"x".repeat(1200)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NetworkError);
        assert_eq!(err.status(), None);
        assert!(err.message().contains("dns lookup failed"));
        assert_eq!(err.chunks_delivered(), 1);
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn non_string_message_fails_without_network() {
        let transport = FakeTransport::default();
        let client = make_client(transport.clone());

        let err = client.send_value(&json!(123)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidMessageType);
        assert_eq!(transport.calls(), 0);

        client.send_value(&json!("hi")).await.unwrap();
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn blank_message_fails_without_network() {
        let transport = FakeTransport::default();
        let client = make_client(transport.clone());

        for message in ["", "   ", "\n\t "] {
            let err = client.send(message).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::EmptyMessage);
        }
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn message_blank_after_sanitization_is_empty() {
        let transport = FakeTransport::default();
        let client = FreeMobileClient::builder(Credentials::new("u", "p").unwrap())
            .transport(Arc::new(transport.clone()))
            .allow_list(AllowList::empty())
            .placeholder("")
            .build()
            .unwrap();

        let err = client.send("\u{1F600} \u{1F680}").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyMessage);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn unsupported_symbols_are_masked_before_sending() {
        let transport = FakeTransport::default();
        let client = make_client(transport.clone());

        client.send("ok \u{1F600} \u{2764}\u{FE0F}").await.unwrap();
        assert_eq!(transport.sent_chunks(), vec!["ok [] \u{2764}\u{FE0F}"]);
    }

    #[test]
    fn note_is_appended_only_when_symbols_were_replaced() {
        let client = FreeMobileClient::builder(Credentials::new("u", "p").unwrap())
            .transport(Arc::new(FakeTransport::default()))
            .unsupported_symbol_note(crate::domain::DEFAULT_UNSUPPORTED_NOTE)
            .build()
            .unwrap();

        assert_eq!(client.prepare("plain").unwrap(), vec!["plain"]);
        assert_eq!(
            client.prepare("hi \u{1F600}").unwrap(),
            vec![format!(
                "hi []\n\n{}",
                crate::domain::DEFAULT_UNSUPPORTED_NOTE
            )]
        );
    }

    #[test]
    fn prepare_honors_configured_chunk_length_and_placeholder() {
        let client = FreeMobileClient::builder(Credentials::new("u", "p").unwrap())
            .transport(Arc::new(FakeTransport::default()))
            .max_chunk_length(NonZeroUsize::new(4).unwrap())
            .placeholder("?")
            .build()
            .unwrap();

        assert_eq!(
            client.prepare("abc\u{1F600}defgh").unwrap(),
            vec!["abc?", "defg", "h"]
        );
    }

    #[tokio::test]
    async fn concurrent_sends_do_not_share_state() {
        let transport = FakeTransport::default();
        let client = make_client(transport.clone());

        let (first, second) = tokio::join!(client.send("one"), client.send("two"));
        assert_eq!(first.unwrap().len(), 1);
        assert_eq!(second.unwrap().len(), 1);

        let mut sent = transport.sent_chunks();
        sent.sort();
        assert_eq!(sent, vec!["one", "two"]);
    }

    #[test]
    fn construction_from_untyped_credentials_is_validated() {
        let err = FreeMobileClient::from_value(&Value::Null).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidCredentials);

        let err = FreeMobileClient::from_value(&json!({ "user": "", "pass": "x" }))
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidUser);

        let err = FreeMobileClient::from_value(&json!({ "user": "u" }))
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidPass);

        let client = FreeMobileClient::from_value(&json!({ "user": "u", "pass": "p" })).unwrap();
        assert_eq!(client.credentials().user().as_str(), "u");
    }

    #[test]
    fn builder_overrides_are_applied() {
        let endpoint = Url::parse("https://example.invalid/custom").unwrap();
        let client = FreeMobileClient::builder(Credentials::new("u", "p").unwrap())
            .endpoint(endpoint.clone())
            .timeout(Duration::from_secs(5))
            .user_agent("freemobile-tests")
            .allow_list(AllowList::empty().with("\u{1F600}"))
            .build()
            .unwrap();

        assert_eq!(client.endpoint, endpoint);
        assert_eq!(client.max_chunk_length, MAX_CHUNK_LENGTH);
        assert!(client.sanitizer.allow_list().contains("\u{1F600}"));
        assert_eq!(client.sanitizer.placeholder(), "[]");
    }

    #[test]
    fn default_client_targets_the_gateway() {
        let client = FreeMobileClient::new(Credentials::new("u", "p").unwrap());
        assert_eq!(client.endpoint.as_str(), DEFAULT_ENDPOINT);
        assert_eq!(client.max_chunk_length.get(), 999);
    }
}

//! Fluent builder for a single HTTP call.
//!
//! # Design
//! The request shape is a type parameter chosen by the constructor:
//! `get`/`delete` return `RequestBuilder<NonEntityEnclosing>` and
//! `post`/`put` return `RequestBuilder<EntityEnclosing>`. Operations shared by
//! both shapes live on the generic impl; body handling and URL resolution are
//! implemented once per shape, so no method re-checks the shape at runtime.
//!
//! Every configuration call takes the builder by value and returns it.
//! `execute` consumes the builder, so a builder can only ever be sent once.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use url::Url;

use crate::config::TransportConfig;
use crate::error::{Error, Result};
use crate::http::{HttpMethod, HttpRequest, RequestShape};
use crate::response::Response;
use crate::transport::{Transport, UreqTransport};

/// Start a GET request to `url`.
pub fn get(url: &str) -> Result<RequestBuilder<NonEntityEnclosing>> {
    RequestBuilder::new(HttpMethod::Get, url, NonEntityEnclosing::default())
}

/// Start a DELETE request to `url`.
pub fn delete(url: &str) -> Result<RequestBuilder<NonEntityEnclosing>> {
    RequestBuilder::new(HttpMethod::Delete, url, NonEntityEnclosing::default())
}

/// Start a POST request to `url`.
pub fn post(url: &str) -> Result<RequestBuilder<EntityEnclosing>> {
    RequestBuilder::new(HttpMethod::Post, url, EntityEnclosing::default())
}

/// Start a PUT request to `url`.
pub fn put(url: &str) -> Result<RequestBuilder<EntityEnclosing>> {
    RequestBuilder::new(HttpMethod::Put, url, EntityEnclosing::default())
}

mod sealed {
    pub trait Sealed {}
}

/// Shape-specific state of a builder.
pub trait Shape: sealed::Sealed {
    const SHAPE: RequestShape;

    /// Produce the final URL and body from the base URL and the accumulated
    /// query pairs.
    fn finish(self, method: HttpMethod, url: Url, query: &[(String, String)]) -> (Url, Option<String>);
}

/// State for POST and PUT: an optional body. Query pairs are not sent.
#[derive(Debug, Default)]
pub struct EntityEnclosing {
    body: Option<String>,
}

/// State for GET and DELETE: never a body, query pairs go in the URL.
#[derive(Debug, Default)]
pub struct NonEntityEnclosing {
    ignored: Vec<IgnoredConfig>,
}

/// A configuration call that had no effect on the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoredConfig {
    /// `body` on a method without a body.
    Body,
    /// `body_as_json` on a method without a body.
    JsonBody,
}

impl sealed::Sealed for EntityEnclosing {}
impl sealed::Sealed for NonEntityEnclosing {}

impl Shape for EntityEnclosing {
    const SHAPE: RequestShape = RequestShape::EntityEnclosing;

    fn finish(self, method: HttpMethod, url: Url, query: &[(String, String)]) -> (Url, Option<String>) {
        if !query.is_empty() {
            tracing::debug!(%method, %url, dropped = query.len(), "query parameters are not sent with a body request");
        }
        (url, self.body)
    }
}

impl Shape for NonEntityEnclosing {
    const SHAPE: RequestShape = RequestShape::NonEntityEnclosing;

    fn finish(self, _method: HttpMethod, mut url: Url, query: &[(String, String)]) -> (Url, Option<String>) {
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }
        (url, None)
    }
}

/// Host and port a set of credentials was registered for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthScope {
    pub host: String,
    pub port: Option<u16>,
}

/// Basic-auth credentials attached to a builder.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub scope: AuthScope,
    pub user_id: String,
    password: String,
}

impl Credentials {
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("scope", &self.scope)
            .field("user_id", &self.user_id)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Accumulates the configuration of one HTTP call.
#[derive(Debug)]
pub struct RequestBuilder<S> {
    method: HttpMethod,
    url: Url,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    credentials: Option<Credentials>,
    config: TransportConfig,
    shape: S,
}

impl<S: Shape> RequestBuilder<S> {
    fn new(method: HttpMethod, url: &str, shape: S) -> Result<Self> {
        Ok(Self {
            method,
            url: parse_url(url)?,
            query: Vec::new(),
            headers: Vec::new(),
            credentials: None,
            config: TransportConfig::default(),
            shape,
        })
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn shape(&self) -> RequestShape {
        S::SHAPE
    }

    /// The base URL, without any query pairs added through the builder.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn config(&self) -> TransportConfig {
        self.config
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Connection-establishment timeout in milliseconds. `0` disables it.
    pub fn set_connection_timeout(mut self, millis: u64) -> Self {
        self.config = self.config.with_connect_timeout(millis);
        self
    }

    /// Socket timeout in milliseconds. `0` disables it.
    ///
    /// Bounds the wait for the response head and, separately, the whole body
    /// download. It is not an idle timeout between reads: a slow but steady
    /// body that takes longer than `millis` to arrive fails with
    /// `Error::Timeout`.
    pub fn set_socket_timeout(mut self, millis: u64) -> Self {
        self.config = self.config.with_socket_timeout(millis);
        self
    }

    /// Replace both timeouts at once.
    pub fn with_config(mut self, config: TransportConfig) -> Self {
        self.config = config;
        self
    }

    /// Append a header. Repeated names are all sent.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Register credentials for the URL's host and port and attach a
    /// pre-emptive `Authorization: Basic` header.
    ///
    /// An `Authorization` header added separately through `header` is not
    /// replaced; both are sent.
    pub fn basic_auth(mut self, user_id: &str, password: &str) -> Result<Self> {
        let value = encode_basic(user_id, password)?;
        self.credentials = Some(Credentials {
            scope: AuthScope {
                host: self.url.host_str().unwrap_or_default().to_string(),
                port: self.url.port_or_known_default(),
            },
            user_id: user_id.to_string(),
            password: password.to_string(),
        });
        self.headers.push(("Authorization".to_string(), value));
        Ok(self)
    }

    /// Append one query pair. Only GET and DELETE send query pairs.
    pub fn query_string(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Append every pair from `pairs`, in iteration order.
    pub fn query_strings<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Append the fields of `value`, form-encoded the same way as query
    /// pairs.
    pub fn query<T: Serialize + ?Sized>(mut self, value: &T) -> Result<Self> {
        let encoded = serde_urlencoded::to_string(value)?;
        self.query.extend(url::form_urlencoded::parse(encoded.as_bytes()).into_owned());
        Ok(self)
    }

    /// Resolve the final URL and produce the request without sending it.
    pub fn into_request(self) -> HttpRequest {
        let (url, body) = self.shape.finish(self.method, self.url, &self.query);
        HttpRequest {
            method: self.method,
            url: url.into(),
            headers: self.headers,
            body,
        }
    }

    /// Send the request and wait for the full response.
    ///
    /// A fresh transport is built from the current timeouts and dropped before
    /// this returns, on success and on failure alike.
    ///
    /// The builder is consumed, so it cannot be executed twice:
    ///
    /// ```compile_fail
    /// let builder = weakrest::get("http://localhost/").unwrap();
    /// let _ = builder.execute();
    /// let _ = builder.execute();
    /// ```
    pub fn execute(self) -> Result<Response> {
        let transport = UreqTransport::new(&self.config);
        self.execute_with(transport)
    }

    /// Like `execute`, but through the given transport. The transport is
    /// dropped before this returns.
    pub fn execute_with<T: Transport>(self, mut transport: T) -> Result<Response> {
        let request = self.into_request();
        tracing::debug!(method = %request.method, url = %request.url, "sending request");

        let result = transport.send(&request);
        drop(transport);

        let response = result?;
        tracing::debug!(url = %request.url, status = response.status, "received response");
        Ok(response.into())
    }
}

impl RequestBuilder<EntityEnclosing> {
    /// Set the body verbatim. Replaces any body set earlier.
    pub fn body(mut self, content: impl Into<String>) -> Self {
        self.shape.body = Some(content.into());
        self
    }

    /// Serialize `value` to compact JSON and use it as the body. Replaces
    /// any body set earlier. No `Content-Type` header is added.
    pub fn body_as_json<T: Serialize + ?Sized>(self, value: &T) -> Result<Self> {
        let content = serde_json::to_string(value).map_err(Error::Serialization)?;
        Ok(self.body(content))
    }

    /// The body that will be sent, if any.
    pub fn body_content(&self) -> Option<&str> {
        self.shape.body.as_deref()
    }
}

impl RequestBuilder<NonEntityEnclosing> {
    /// GET and DELETE carry no body: logs a warning and records the call in
    /// `ignored`.
    pub fn body(mut self, content: impl Into<String>) -> Self {
        let content = content.into();
        tracing::warn!(method = %self.method, url = %self.url, len = content.len(), "ignoring body on a request without a body");
        self.shape.ignored.push(IgnoredConfig::Body);
        self
    }

    /// GET and DELETE carry no body: `value` is not serialized, a warning is
    /// logged and the call is recorded in `ignored`.
    pub fn body_as_json<T: Serialize + ?Sized>(mut self, _value: &T) -> Self {
        tracing::warn!(method = %self.method, url = %self.url, "ignoring JSON body on a request without a body");
        self.shape.ignored.push(IgnoredConfig::JsonBody);
        self
    }

    /// Configuration calls that were dropped, in order.
    pub fn ignored(&self) -> &[IgnoredConfig] {
        &self.shape.ignored
    }
}

fn parse_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| Error::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(Error::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme `{scheme}`"),
        }),
    }
}

fn encode_basic(user_id: &str, password: &str) -> Result<String> {
    if user_id.contains(':') {
        return Err(Error::AuthEncoding("user id must not contain ':'".to_string()));
    }
    if user_id.chars().chain(password.chars()).any(char::is_control) {
        return Err(Error::AuthEncoding(
            "credentials must not contain control characters".to_string(),
        ));
    }
    Ok(format!("Basic {}", STANDARD.encode(format!("{user_id}:{password}"))))
}

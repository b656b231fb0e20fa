//! Execution of a resolved `HttpRequest`.
//!
//! # Design
//! `Transport` is the seam between the builder and the network. The default
//! `UreqTransport` owns one `ureq::Agent` built from a `TransportConfig` and is
//! meant for a single call: the builder drops it right after `send` returns,
//! which closes any pooled connection whether the call succeeded or not.

use ureq::http::Uri;
use ureq::typestate::{WithBody, WithoutBody};

use crate::config::TransportConfig;
use crate::error::{Error, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs one HTTP round-trip.
pub trait Transport {
    /// Send `request` and drain the full response body.
    ///
    /// Non-2xx statuses must be returned as `Ok`.
    fn send(&mut self, request: &HttpRequest) -> Result<HttpResponse>;
}

/// Blocking transport backed by a private `ureq::Agent`.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(config: &TransportConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_connect(config.connect_timeout())
            .timeout_recv_response(config.socket_timeout())
            .timeout_recv_body(config.socket_timeout())
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn send(&mut self, request: &HttpRequest) -> Result<HttpResponse> {
        let url = request.url.as_str();
        let uri = url.parse::<Uri>().map_err(|e| Error::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let result = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, _) => without_body(self.agent.get(uri), request).call(),
            (HttpMethod::Delete, _) => without_body(self.agent.delete(uri), request).call(),
            (HttpMethod::Post, Some(body)) => with_body(self.agent.post(uri), request).send(body),
            (HttpMethod::Post, None) => with_body(self.agent.post(uri), request).send_empty(),
            (HttpMethod::Put, Some(body)) => with_body(self.agent.put(uri), request).send(body),
            (HttpMethod::Put, None) => with_body(self.agent.put(uri), request).send_empty(),
        };
        let mut response = result.map_err(|e| call_error(url, e))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        // No size cap: the whole body is always drained.
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_string()
            .map_err(|e| match e {
                ureq::Error::Timeout(_) => Error::Timeout {
                    url: url.to_string(),
                    source: Box::new(e),
                },
                e => Error::BodyDecode {
                    url: url.to_string(),
                    source: Box::new(e),
                },
            })?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

impl Drop for UreqTransport {
    fn drop(&mut self) {
        tracing::trace!("releasing transport agent");
    }
}

fn without_body(
    mut builder: ureq::RequestBuilder<WithoutBody>,
    request: &HttpRequest,
) -> ureq::RequestBuilder<WithoutBody> {
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn with_body(
    mut builder: ureq::RequestBuilder<WithBody>,
    request: &HttpRequest,
) -> ureq::RequestBuilder<WithBody> {
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn call_error(url: &str, error: ureq::Error) -> Error {
    match error {
        ureq::Error::BadUri(reason) => Error::InvalidUrl {
            url: url.to_string(),
            reason,
        },
        ureq::Error::Timeout(_) => Error::Timeout {
            url: url.to_string(),
            source: Box::new(error),
        },
        e => Error::Transport {
            url: url.to_string(),
            source: Box::new(e),
        },
    }
}

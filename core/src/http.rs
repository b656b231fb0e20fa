//! HTTP request and response types described as plain data.
//!
//! # Design
//! A builder materializes into an `HttpRequest` value and a `Transport` turns
//! it into an `HttpResponse`. Keeping both ends as owned data means the URL
//! resolution and header layout of a builder can be inspected without a
//! network, and any transport can be slotted in behind `execute_with`.

use std::fmt;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// The request-line token for this method.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    pub fn shape(&self) -> RequestShape {
        match self {
            HttpMethod::Get | HttpMethod::Delete => RequestShape::NonEntityEnclosing,
            HttpMethod::Post | HttpMethod::Put => RequestShape::EntityEnclosing,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a request carries a message body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestShape {
    /// POST and PUT. May carry a body; query parameters are not sent.
    EntityEnclosing,
    /// GET and DELETE. Never carries a body; query parameters go in the URL.
    NonEntityEnclosing,
}

/// A fully resolved HTTP request.
///
/// `url` already includes any query string the builder appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Values of every header named `name`, compared case-insensitively, in
    /// the order they were added.
    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response as returned by a `Transport`, body fully drained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

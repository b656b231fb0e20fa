//! Fluent, single-use HTTP client for one-off REST calls.
//!
//! # Overview
//! A call starts from [`get`], [`post`], [`put`] or [`delete`], is configured
//! through chained builder methods, and ends with `execute`, which performs
//! exactly one blocking round-trip and returns a [`Response`].
//!
//! ```no_run
//! let response = weakrest::post("http://localhost:8080/runtime/tasks")?
//!     .set_socket_timeout(5_000)
//!     .header("Content-Type", "application/json")
//!     .basic_auth("kermit", "kermit")?
//!     .body_as_json(&serde_json::json!({"action": "complete"}))?
//!     .execute()?;
//!
//! if response.is_success() {
//!     let task = response.as_json()?;
//!     println!("{task}");
//! }
//! # Ok::<(), weakrest::Error>(())
//! ```
//!
//! # Design
//! - GET and DELETE builders never carry a body; POST and PUT builders never
//!   send query pairs. The distinction is a type parameter, see [`builder`].
//! - Requests and responses cross the transport boundary as plain data
//!   ([`HttpRequest`], [`HttpResponse`]), so any [`Transport`] can execute them.
//! - Non-2xx statuses are data. [`Error`] only covers calls that could not be
//!   built or performed, and explicit JSON conversions.

pub mod builder;
pub mod config;
pub mod error;
pub mod http;
pub mod response;
pub mod transport;

pub use builder::{
    delete, get, post, put, AuthScope, Credentials, EntityEnclosing, IgnoredConfig, NonEntityEnclosing,
    RequestBuilder,
};
pub use config::TransportConfig;
pub use error::{Error, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestShape};
pub use response::Response;
pub use transport::{Transport, UreqTransport};

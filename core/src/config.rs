//! Timeout configuration for the transport.
//!
//! `TransportConfig` is an immutable value. Changing a timeout produces a new
//! config, and the transport agent is built from whatever config the builder
//! holds when it executes.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_SOCKET_TIMEOUT_MS: u64 = 30_000;

/// Connect and socket timeouts, in milliseconds.
///
/// A value of `0` disables that timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    pub connect_timeout_ms: u64,
    pub socket_timeout_ms: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            socket_timeout_ms: DEFAULT_SOCKET_TIMEOUT_MS,
        }
    }
}

impl TransportConfig {
    pub fn with_connect_timeout(self, millis: u64) -> Self {
        Self {
            connect_timeout_ms: millis,
            ..self
        }
    }

    pub fn with_socket_timeout(self, millis: u64) -> Self {
        Self {
            socket_timeout_ms: millis,
            ..self
        }
    }

    /// Bound on establishing the connection, `None` when disabled.
    pub fn connect_timeout(&self) -> Option<Duration> {
        non_zero(self.connect_timeout_ms)
    }

    /// Bound on waiting for the response head, and separately on the whole
    /// body download. `None` when disabled.
    pub fn socket_timeout(&self) -> Option<Duration> {
        non_zero(self.socket_timeout_ms)
    }
}

fn non_zero(millis: u64) -> Option<Duration> {
    (millis > 0).then(|| Duration::from_millis(millis))
}

//! Routing backend error types

use thiserror::Error;

/// Errors that can occur while querying a routing backend
#[derive(Debug, Error)]
pub enum RoutingError {
    /// The backend needs an API key and none is configured
    #[error("Not configured: {0}")]
    NotConfigured(String),

    /// Connection to the routing service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP request returned a non-success status
    #[error("Request failed: HTTP {status}")]
    RequestFailed {
        /// HTTP status code
        status: u16,
    },

    /// Failed to parse response from the routing service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after_secs:?} seconds")]
    RateLimitExceeded {
        /// Seconds to wait before retrying (if provided by API)
        retry_after_secs: Option<u64>,
    },

    /// The service answered but knows no route between the points
    #[error("No route found from {from} to {to}")]
    NoRouteFound {
        /// Origin description
        from: String,
        /// Destination description
        to: String,
    },

    /// The service answered with a status other than OK
    #[error("Provider status {status}{}", detail(.message.as_deref()))]
    ProviderStatus {
        /// Status code reported in the body
        status: String,
        /// Optional explanation from the service
        message: Option<String>,
    },

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },
}

impl RoutingError {
    /// Returns true if this error indicates the backend itself is unhealthy
    ///
    /// Missing configuration never reaches the network and an empty result
    /// means the backend worked, so neither counts as an outage.
    #[must_use]
    pub const fn is_outage(&self) -> bool {
        !matches!(self, Self::NotConfigured(_) | Self::NoRouteFound { .. })
    }
}

fn detail(message: Option<&str>) -> String {
    message.map(|m| format!(": {m}")).unwrap_or_default()
}

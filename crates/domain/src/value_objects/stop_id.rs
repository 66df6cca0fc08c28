//! Stop identifier value object

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a stop as supplied by the caller's trip store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StopId(String);

impl StopId {
    /// Create a stop ID from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StopId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for StopId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_id_display() {
        let id = StopId::new("stop-42");
        assert_eq!(id.to_string(), "stop-42");
        assert_eq!(id.as_str(), "stop-42");
    }

    #[test]
    fn stop_id_serializes_as_plain_string() {
        let id = StopId::from("abc");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abc\"");

        let parsed: StopId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }
}

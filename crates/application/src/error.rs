//! Application-level errors

use domain::{DomainError, StopId};
use thiserror::Error;

/// Errors that can occur in the application layer
///
/// Provider failures never show up here: they are recovered by the
/// fallback estimator before a result is returned.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A stop passed to a single-leg calculation has no coordinates
    #[error("Stop {stop_id} has no coordinates")]
    MissingCoordinates {
        /// The stop that cannot be located
        stop_id: StopId,
    },

    /// The calculation was superseded by a call to `cancel_pending`
    #[error("Route calculation was cancelled")]
    Cancelled,
}

impl ApplicationError {
    /// Create a missing coordinates error
    pub fn missing_coordinates(stop_id: &StopId) -> Self {
        Self::MissingCoordinates {
            stop_id: stop_id.clone(),
        }
    }

    /// Check if this error reports a cancelled calculation
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

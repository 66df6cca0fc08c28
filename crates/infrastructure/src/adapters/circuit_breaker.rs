//! Circuit breaker for routing backend calls
//!
//! Stops hammering a backend that keeps failing. While the circuit is open
//! calls fail fast without network I/O, and the route service falls back to
//! its geometric estimate.
//!
//! # States
//!
//! - **Closed**: normal operation, calls pass through
//! - **Open**: the backend is considered down, calls are rejected
//! - **Half-Open**: probing whether the backend has recovered

use std::{
    fmt,
    time::{Duration, Instant},
};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Thresholds of a circuit breaker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures before the circuit opens
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u32,
    /// Consecutive half-open successes before the circuit closes
    #[serde(default = "default_success_threshold")]
    pub success_threshold: u32,
    /// Seconds an open circuit waits before letting a probe through
    #[serde(default = "default_half_open_timeout_secs")]
    pub half_open_timeout_secs: u64,
}

const fn default_failure_threshold() -> u32 {
    5
}

const fn default_success_threshold() -> u32 {
    2
}

const fn default_half_open_timeout_secs() -> u64 {
    30
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: default_failure_threshold(),
            success_threshold: default_success_threshold(),
            half_open_timeout_secs: default_half_open_timeout_secs(),
        }
    }
}

impl CircuitBreakerConfig {
    /// Creates a custom configuration
    #[must_use]
    pub const fn custom(
        failure_threshold: u32,
        success_threshold: u32,
        half_open_timeout_secs: u64,
    ) -> Self {
        Self {
            failure_threshold,
            success_threshold,
            half_open_timeout_secs,
        }
    }

    /// Validate the thresholds
    ///
    /// # Errors
    ///
    /// Returns an error if either threshold is zero.
    pub fn validate(&self) -> Result<(), String> {
        if self.failure_threshold == 0 {
            return Err("failure_threshold must be greater than 0".to_string());
        }
        if self.success_threshold == 0 {
            return Err("success_threshold must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// State of a circuit breaker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Calls pass through
    Closed,
    /// Calls are rejected
    Open,
    /// A probe call is allowed through
    HalfOpen,
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "closed"),
            Self::Open => write!(f, "open"),
            Self::HalfOpen => write!(f, "half-open"),
        }
    }
}

/// Error returned when the circuit is open
#[derive(Debug, Clone, thiserror::Error)]
#[error("Circuit breaker open for '{service_name}': backend is temporarily unavailable")]
pub struct CircuitOpenError {
    /// Name of the guarded backend
    pub service_name: String,
}

/// Error type for calls made through a circuit breaker
#[derive(Debug, thiserror::Error)]
pub enum CircuitBreakerError<E> {
    /// The circuit is open and the call was not made
    #[error(transparent)]
    CircuitOpen(CircuitOpenError),
    /// The call was made and failed
    #[error(transparent)]
    ServiceError(E),
}

impl<E> CircuitBreakerError<E> {
    /// Returns true if the call was rejected by an open circuit
    #[must_use]
    pub const fn is_circuit_open(&self) -> bool {
        matches!(self, Self::CircuitOpen(_))
    }
}

struct BreakerState {
    state: CircuitState,
    failure_count: u32,
    success_count: u32,
    opened_at: Option<Instant>,
}

impl BreakerState {
    const fn closed() -> Self {
        Self {
            state: CircuitState::Closed,
            failure_count: 0,
            success_count: 0,
            opened_at: None,
        }
    }

    fn open(&mut self) {
        self.state = CircuitState::Open;
        self.opened_at = Some(Instant::now());
        self.failure_count = 0;
        self.success_count = 0;
    }
}

/// Circuit breaker guarding one routing backend
pub struct CircuitBreaker {
    name: String,
    config: CircuitBreakerConfig,
    state: RwLock<BreakerState>,
}

impl fmt::Debug for CircuitBreaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircuitBreaker")
            .field("name", &self.name)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl CircuitBreaker {
    /// Creates a circuit breaker with default thresholds
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, CircuitBreakerConfig::default())
    }

    /// Creates a circuit breaker with custom thresholds
    #[must_use]
    pub fn with_config(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        Self {
            name: name.into(),
            config,
            state: RwLock::new(BreakerState::closed()),
        }
    }

    /// Name of the guarded backend
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current state, moving Open to HalfOpen once the timeout has passed
    #[must_use]
    pub fn state(&self) -> CircuitState {
        let mut state = self.state.write();

        if state.state == CircuitState::Open {
            let timeout = Duration::from_secs(self.config.half_open_timeout_secs);
            if state.opened_at.is_some_and(|at| at.elapsed() >= timeout) {
                info!(service = %self.name, "Circuit transitioning from Open to HalfOpen");
                state.state = CircuitState::HalfOpen;
                state.success_count = 0;
            }
        }

        state.state
    }

    /// Returns true if calls currently pass through
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state() == CircuitState::Closed
    }

    /// Returns true if calls are currently rejected
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state() == CircuitState::Open
    }

    fn on_success(&self) {
        let mut state = self.state.write();
        state.failure_count = 0;

        if state.state == CircuitState::HalfOpen {
            state.success_count += 1;
            if state.success_count >= self.config.success_threshold {
                info!(
                    service = %self.name,
                    successes = state.success_count,
                    "Circuit transitioning from HalfOpen to Closed"
                );
                *state = BreakerState::closed();
            }
        }
    }

    fn on_failure(&self) {
        let mut state = self.state.write();
        state.failure_count += 1;
        state.success_count = 0;

        match state.state {
            CircuitState::Closed => {
                if state.failure_count >= self.config.failure_threshold {
                    info!(
                        service = %self.name,
                        failures = state.failure_count,
                        "Circuit transitioning from Closed to Open"
                    );
                    state.open();
                }
            },
            CircuitState::HalfOpen => {
                info!(
                    service = %self.name,
                    "Circuit transitioning from HalfOpen to Open after failed probe"
                );
                state.open();
            },
            CircuitState::Open => {},
        }
    }

    /// Run an async call through the circuit breaker
    ///
    /// `is_failure` decides which errors count against the backend; an
    /// error it rejects (e.g. "no route between these points") proves the
    /// backend is reachable and counts as a success.
    ///
    /// # Errors
    ///
    /// Returns [`CircuitBreakerError::CircuitOpen`] without calling `f` when
    /// the circuit is open, or [`CircuitBreakerError::ServiceError`] with
    /// the call's own error.
    pub async fn call<F, Fut, T, E>(
        &self,
        f: F,
        is_failure: impl Fn(&E) -> bool,
    ) -> Result<T, CircuitBreakerError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let current_state = self.state();
        if current_state == CircuitState::Open {
            debug!(service = %self.name, "Circuit open, rejecting call");
            return Err(CircuitBreakerError::CircuitOpen(CircuitOpenError {
                service_name: self.name.clone(),
            }));
        }

        match f().await {
            Ok(result) => {
                self.on_success();
                Ok(result)
            },
            Err(e) => {
                if is_failure(&e) {
                    warn!(service = %self.name, error = %e, "Call failed, recording failure");
                    self.on_failure();
                } else {
                    self.on_success();
                }
                Err(CircuitBreakerError::ServiceError(e))
            },
        }
    }
}

//! Circuit breaker wrapping synchronous units of work.
//!
//! Prevents cascading failures when a downstream dependency becomes
//! unhealthy: after enough consecutive failures the circuit opens and
//! callers fail fast instead of piling onto the failing dependency.
//!
//! # Circuit Breaker States
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    CIRCUIT BREAKER STATE MACHINE                    │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │                                                                     │
//! │      ┌──────────┐          ┌──────────┐          ┌──────────┐       │
//! │      │  CLOSED  │ ───────► │   OPEN   │ ───────► │HALF-OPEN │       │
//! │      │ (normal) │ failures │ (reject) │  timeout │  (trial) │       │
//! │      └──────────┘          └──────────┘          └──────────┘       │
//! │            ▲                     ▲                     │            │
//! │            │      trial success  │    trial failure    │            │
//! │            └─────────────────────┼─────────────────────┘            │
//! │                                  └───────────────────────           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! - `failure_threshold`: failures before the circuit opens (default: 5)
//! - `reset_timeout`: time in open before the half-open trial (default: 30s)
//! - `call_timeout`: per-call deadline, independent of circuit state
//!   (default: 10s); an elapsed call counts as a failure
//!
//! State and counters are shared across all concurrent callers of one
//! breaker instance (process-wide, not per-caller) behind a single mutex.

use std::future::Future;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Circuit breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Normal operation - calls pass through.
    Closed,
    /// Circuit is open - calls are rejected immediately.
    Open,
    /// Testing if the dependency recovered - one trial call allowed.
    HalfOpen,
}

impl std::fmt::Display for CircuitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CircuitState::Closed => write!(f, "closed"),
            CircuitState::Open => write!(f, "open"),
            CircuitState::HalfOpen => write!(f, "half-open"),
        }
    }
}

/// Circuit breaker configuration.
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Number of failures before opening the circuit.
    pub failure_threshold: u32,
    /// Duration before the half-open trial once open.
    pub reset_timeout: Duration,
    /// Per-call deadline; elapsing counts as a failure.
    pub call_timeout: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            reset_timeout: Duration::from_secs(30),
            call_timeout: Duration::from_secs(10),
        }
    }
}

/// Failure modes surfaced to callers of [`CircuitBreaker::execute`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CircuitBreakerError<E> {
    /// The circuit is open; the work was not executed.
    #[error("circuit breaker '{0}' is open, call rejected")]
    Open(String),

    /// The work did not complete within the per-call timeout.
    #[error("call exceeded the {0:?} deadline")]
    Timeout(Duration),

    /// The work executed and failed.
    #[error("call failed: {0}")]
    Inner(E),
}

/// Mutable breaker state, updated atomically under one lock.
struct BreakerState {
    state: CircuitState,
    /// Failures counted while closed.
    failure_count: u32,
    /// When the circuit last opened.
    opened_at: Option<Instant>,
    /// Whether the half-open trial call is currently in flight.
    trial_in_flight: bool,
    total_calls: u64,
    total_failures: u64,
    total_short_circuits: u64,
}

impl BreakerState {
    fn new() -> Self {
        Self {
            state: CircuitState::Closed,
            failure_count: 0,
            opened_at: None,
            trial_in_flight: false,
            total_calls: 0,
            total_failures: 0,
            total_short_circuits: 0,
        }
    }

    fn open(&mut self) {
        self.state = CircuitState::Open;
        self.opened_at = Some(Instant::now());
        self.trial_in_flight = false;
    }

    fn close(&mut self) {
        self.state = CircuitState::Closed;
        self.failure_count = 0;
        self.opened_at = None;
        self.trial_in_flight = false;
    }
}

/// A named circuit breaker guarding one downstream dependency.
pub struct CircuitBreaker {
    name: String,
    config: CircuitBreakerConfig,
    state: Mutex<BreakerState>,
}

impl CircuitBreaker {
    /// Create a breaker with the default configuration.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, CircuitBreakerConfig::default())
    }

    /// Create a breaker with a specific configuration.
    #[must_use]
    pub fn with_config(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        Self {
            name: name.into(),
            config,
            state: Mutex::new(BreakerState::new()),
        }
    }

    /// Execute a unit of work under the breaker.
    ///
    /// Rejects immediately with [`CircuitBreakerError::Open`] while the
    /// circuit is open; otherwise runs the work under the per-call timeout
    /// and records the outcome.
    pub async fn execute<T, E, F>(&self, work: F) -> Result<T, CircuitBreakerError<E>>
    where
        F: Future<Output = Result<T, E>>,
    {
        if !self.try_acquire() {
            return Err(CircuitBreakerError::Open(self.name.clone()));
        }

        match tokio::time::timeout(self.config.call_timeout, work).await {
            Ok(Ok(value)) => {
                self.record_success();
                Ok(value)
            }
            Ok(Err(e)) => {
                self.record_failure();
                Err(CircuitBreakerError::Inner(e))
            }
            Err(_) => {
                self.record_failure();
                Err(CircuitBreakerError::Timeout(self.config.call_timeout))
            }
        }
    }

    /// Whether a call may proceed right now, updating state as needed.
    fn try_acquire(&self) -> bool {
        let mut state = self.state.lock();
        state.total_calls += 1;

        match state.state {
            CircuitState::Closed => true,
            CircuitState::Open => {
                let elapsed = state.opened_at.map(|at| at.elapsed()).unwrap_or_default();
                if elapsed >= self.config.reset_timeout {
                    info!(breaker = %self.name, "circuit breaker transitioning to half-open");
                    state.state = CircuitState::HalfOpen;
                    state.trial_in_flight = true;
                    true
                } else {
                    debug!(
                        breaker = %self.name,
                        remaining_ms =
                            (self.config.reset_timeout - elapsed).as_millis() as u64,
                        "circuit breaker is open, rejecting call"
                    );
                    state.total_short_circuits += 1;
                    false
                }
            }
            CircuitState::HalfOpen => {
                // Exactly one trial call probes the dependency; everyone
                // else keeps failing fast until it reports back.
                if state.trial_in_flight {
                    state.total_short_circuits += 1;
                    false
                } else {
                    state.trial_in_flight = true;
                    true
                }
            }
        }
    }

    fn record_success(&self) {
        let mut state = self.state.lock();
        match state.state {
            CircuitState::Closed => {
                state.failure_count = 0;
            }
            CircuitState::HalfOpen => {
                info!(breaker = %self.name, "circuit breaker closing after successful trial");
                state.close();
            }
            CircuitState::Open => {
                // A call admitted before the circuit opened finished late;
                // the open state stands until the reset timeout.
            }
        }
    }

    fn record_failure(&self) {
        let mut state = self.state.lock();
        state.total_failures += 1;
        match state.state {
            CircuitState::Closed => {
                state.failure_count += 1;
                if state.failure_count >= self.config.failure_threshold {
                    warn!(
                        breaker = %self.name,
                        failures = state.failure_count,
                        threshold = self.config.failure_threshold,
                        reset_timeout_secs = self.config.reset_timeout.as_secs(),
                        "circuit breaker opening due to failures"
                    );
                    state.open();
                }
            }
            CircuitState::HalfOpen => {
                warn!(breaker = %self.name, "circuit breaker reopening after trial failure");
                state.open();
            }
            CircuitState::Open => {
                // Late failure from a call admitted earlier: restart the
                // cooldown window.
                state.opened_at = Some(Instant::now());
            }
        }
    }

    /// Force the circuit open (calls reject until the reset timeout).
    pub fn force_open(&self) {
        info!(breaker = %self.name, "circuit breaker forced open");
        self.state.lock().open();
    }

    /// Force the circuit closed (counters reset).
    pub fn force_close(&self) {
        info!(breaker = %self.name, "circuit breaker forced closed");
        self.state.lock().close();
    }

    /// The breaker's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current state (as last recorded; an open circuit shows `Open` until
    /// the next call attempts the half-open transition).
    #[must_use]
    pub fn state(&self) -> CircuitState {
        self.state.lock().state
    }

    /// Outcome totals for the surrounding metrics layer.
    #[must_use]
    pub fn stats(&self) -> CircuitStats {
        let state = self.state.lock();
        CircuitStats {
            state: state.state,
            failure_count: state.failure_count,
            total_calls: state.total_calls,
            total_failures: state.total_failures,
            total_short_circuits: state.total_short_circuits,
        }
    }
}

/// Point-in-time counters for one breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircuitStats {
    pub state: CircuitState,
    pub failure_count: u32,
    pub total_calls: u64,
    pub total_failures: u64,
    pub total_short_circuits: u64,
}

//! # Shared Resilience - Failure Isolation for Synchronous Paths
//!
//! Provides the circuit breaker that wraps synchronous units of work
//! executed on behalf of inbound requests, isolating callers from a
//! failing downstream.

pub mod circuit_breaker;

pub use circuit_breaker::{
    CircuitBreaker, CircuitBreakerConfig, CircuitBreakerError, CircuitState, CircuitStats,
};

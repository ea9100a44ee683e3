//! Error types for the fake-DNS engine
//!
//! Errors are categorized by subsystem: configuration errors are raised
//! synchronously from `start` and leave the holder unusable, engine errors
//! signal contract violations at runtime. Lookup misses are never errors;
//! they surface as `None` or trigger a fresh allocation.

use thiserror::Error;

/// Top-level error type for the fake-DNS engine
#[derive(Debug, Error)]
pub enum FakeDnsError {
    /// Configuration errors (CIDR parsing, capacity validation)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Engine runtime errors (lifecycle contract, allocation invariant)
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
}

impl FakeDnsError {
    /// Check if this error is recoverable (can retry operation)
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::Config(e) => e.is_recoverable(),
            Self::Engine(e) => e.is_recoverable(),
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The pool string is not a valid IPv4 CIDR
    #[error("Invalid IPv4 CIDR '{cidr}': {reason}")]
    InvalidCidr { cidr: String, reason: String },

    /// The cache capacity is zero
    #[error("Cache capacity must be greater than zero")]
    ZeroCacheSize,

    /// The cache capacity is not strictly smaller than the pool
    #[error("Cache capacity {lru_size} does not fit a pool with {rooms} host bits")]
    CapacityExceedsPool { lru_size: usize, rooms: u8 },
}

impl ConfigError {
    /// Config errors are static misconfigurations, never recoverable
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        false
    }

    /// Create an invalid CIDR error
    pub fn invalid_cidr(cidr: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCidr {
            cidr: cidr.into(),
            reason: reason.into(),
        }
    }
}

/// Engine runtime errors
#[derive(Debug, Error)]
pub enum EngineError {
    /// Operation on a holder that has not been started or has been closed
    #[error("Fake-DNS holder is not active")]
    NotActive,

    /// The allocation walk visited the whole pool without finding a free
    /// address; unreachable while the capacity invariant holds
    #[error("Fake-IP pool exhausted after {attempts} attempts")]
    PoolExhausted { attempts: u64 },
}

impl EngineError {
    /// Engine errors are contract violations, never recoverable
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        false
    }
}

/// Type alias for Result with FakeDnsError
pub type Result<T> = std::result::Result<T, FakeDnsError>;

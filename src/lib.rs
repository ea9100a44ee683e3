//! fakedns: synthetic IPv4 allocation for domain-based proxy routing
//!
//! This crate is the fake-DNS subsystem of a traffic-proxying platform.
//! It assigns fake IPv4 addresses from a configured pool to domain names,
//! so that routing logic dispatching purely on destination address can
//! transparently forward connections for domains whose real resolution is
//! deferred or unnecessary. When the proxy core later intercepts a
//! connection to a fake address, it reverse-maps the address back to the
//! original domain for protocol-level dialing (SNI, HTTP Host).
//!
//! # Features
//!
//! - **Bidirectional mapping**: domain -> address and address -> domain
//!   lookups over one capacity-bounded cache
//! - **LRU eviction**: the least-recently-used mapping is dropped when a
//!   new one is inserted past capacity, freeing its address for reuse
//! - **Thread-safe**: one mutex covers the whole allocate-or-lookup
//!   sequence, so the mapping stays bijective under concurrent callers
//! - **Pool arithmetic**: cursor-based allocation with wraparound and
//!   collision avoidance inside the configured CIDR block
//!
//! # Architecture
//!
//! ```text
//! DNS query  → FakeDnsHolder::get_fake_ip_for_domain → fake address
//!                        ↓ (bounded bidirectional cache)
//! Proxy core → FakeDnsHolder::get_domain_from_fake_ip → original domain
//! ```
//!
//! # Quick Start
//!
//! ```
//! use fakedns::{FakeDnsConfig, FakeDnsHolder};
//!
//! # fn main() -> Result<(), fakedns::FakeDnsError> {
//! let holder = FakeDnsHolder::new(
//!     FakeDnsConfig::new()
//!         .with_ip_pool("198.18.0.0/16")
//!         .with_lru_size(1024),
//! );
//! holder.start()?;
//!
//! let ips = holder.get_fake_ip_for_domain("example.com")?;
//! assert_eq!(
//!     holder.get_domain_from_fake_ip(ips[0]),
//!     Some("example.com".to_string()),
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`cache`]: bounded bidirectional LRU cache
//! - [`config`]: configuration types
//! - [`engine`]: capability trait and factory for host wiring
//! - [`error`]: error types
//! - [`holder`]: the allocator aggregate
//! - [`pool`]: address pool and allocation cursor

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod holder;
pub mod pool;

// Re-export commonly used types at the crate root
pub use cache::BidiLruCache;
pub use config::FakeDnsConfig;
pub use engine::{engine_from_config, FakeDnsEngine};
pub use error::{ConfigError, EngineError, FakeDnsError};
pub use holder::{FakeDnsHolder, HolderStats, HolderStatsSnapshot};
pub use pool::{AddressCursor, Ipv4Pool};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}

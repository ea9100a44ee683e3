//! Configuration for the fake-DNS engine
//!
//! The host's config decoder hands over two fields: the CIDR block the
//! fake addresses are drawn from and the capacity of the bounded mapping
//! cache. Both have the defaults used when no configuration section is
//! present at all.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::pool::Ipv4Pool;

/// Default fake-IP pool (class E, never routed)
pub const DEFAULT_IP_POOL: &str = "240.0.0.0/8";

/// Default capacity of the domain mapping cache
pub const DEFAULT_LRU_SIZE: usize = 65535;

/// Configuration for the fake-DNS engine
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FakeDnsConfig {
    /// CIDR block naming the fake-address pool
    #[serde(default = "default_ip_pool")]
    pub ip_pool: String,

    /// Maximum number of live domain mappings; the least-recently-used
    /// mapping is evicted past this bound
    #[serde(default = "default_lru_size")]
    pub lru_size: usize,
}

fn default_ip_pool() -> String {
    DEFAULT_IP_POOL.to_string()
}

fn default_lru_size() -> usize {
    DEFAULT_LRU_SIZE
}

impl Default for FakeDnsConfig {
    fn default() -> Self {
        Self {
            ip_pool: default_ip_pool(),
            lru_size: default_lru_size(),
        }
    }
}

impl FakeDnsConfig {
    /// Create a configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fake-address pool CIDR
    #[must_use]
    pub fn with_ip_pool(mut self, ip_pool: impl Into<String>) -> Self {
        self.ip_pool = ip_pool.into();
        self
    }

    /// Set the mapping cache capacity
    #[must_use]
    pub fn with_lru_size(mut self, lru_size: usize) -> Self {
        self.lru_size = lru_size;
        self
    }

    /// Validate the configuration
    ///
    /// Runs the same checks `FakeDnsHolder::start` performs: the CIDR must
    /// parse and the cache capacity must fit strictly inside the pool.
    ///
    /// # Errors
    /// Returns `ConfigError` if validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pool = Ipv4Pool::parse(&self.ip_pool)?;
        pool.check_capacity(self.lru_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FakeDnsConfig::default();
        assert_eq!(config.ip_pool, "240.0.0.0/8");
        assert_eq!(config.lru_size, 65535);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = FakeDnsConfig::new()
            .with_ip_pool("198.18.0.0/15")
            .with_lru_size(1024);

        assert_eq!(config.ip_pool, "198.18.0.0/15");
        assert_eq!(config.lru_size, 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_cidr() {
        let config = FakeDnsConfig::new().with_ip_pool("240.0.0.0/40");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidCidr { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_oversized_cache() {
        let config = FakeDnsConfig::new()
            .with_ip_pool("240.0.0.0/30")
            .with_lru_size(4);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CapacityExceedsPool { .. })
        ));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: FakeDnsConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.ip_pool, DEFAULT_IP_POOL);
        assert_eq!(config.lru_size, DEFAULT_LRU_SIZE);

        let config: FakeDnsConfig =
            serde_json::from_str(r#"{"ip_pool": "198.18.0.0/16"}"#).unwrap();
        assert_eq!(config.ip_pool, "198.18.0.0/16");
        assert_eq!(config.lru_size, DEFAULT_LRU_SIZE);
    }

    #[test]
    fn test_deserialize_full() {
        let config: FakeDnsConfig =
            serde_json::from_str(r#"{"ip_pool": "10.0.0.0/24", "lru_size": 100}"#).unwrap();
        assert_eq!(config.ip_pool, "10.0.0.0/24");
        assert_eq!(config.lru_size, 100);
    }
}

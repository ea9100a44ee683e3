//! Capability surface for wiring the engine into a host
//!
//! The host's composition root binds its DNS-query and routing
//! collaborators against [`FakeDnsEngine`] rather than the concrete
//! holder, and registers [`engine_from_config`] as the constructor for the
//! fake-DNS section of its configuration.

use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;

use crate::config::FakeDnsConfig;
use crate::error::FakeDnsError;
use crate::holder::FakeDnsHolder;

/// Capability implemented by a fake-DNS engine
pub trait FakeDnsEngine: Send + Sync + fmt::Debug {
    /// Resolve or allocate the fake address for a domain
    ///
    /// # Errors
    /// Fails fast when the engine is not active, or on an internal
    /// invariant violation.
    fn get_fake_ip_for_domain(&self, domain: &str) -> Result<Vec<IpAddr>, FakeDnsError>;

    /// Map a fake address back to the domain that owns it
    fn get_domain_from_fake_ip(&self, ip: IpAddr) -> Option<String>;

    /// Whether an address belongs to the engine's fake pool
    fn is_fake_ip(&self, ip: IpAddr) -> bool;
}

impl FakeDnsEngine for FakeDnsHolder {
    fn get_fake_ip_for_domain(&self, domain: &str) -> Result<Vec<IpAddr>, FakeDnsError> {
        FakeDnsHolder::get_fake_ip_for_domain(self, domain)
    }

    fn get_domain_from_fake_ip(&self, ip: IpAddr) -> Option<String> {
        FakeDnsHolder::get_domain_from_fake_ip(self, ip)
    }

    fn is_fake_ip(&self, ip: IpAddr) -> bool {
        FakeDnsHolder::is_fake_ip(self, ip)
    }
}

/// Construct and start a holder, handing it back as the engine capability
///
/// # Errors
/// Returns `ConfigError` if the configuration fails validation; no engine
/// is registered in that case.
pub fn engine_from_config(config: FakeDnsConfig) -> Result<Arc<dyn FakeDnsEngine>, FakeDnsError> {
    let holder = FakeDnsHolder::new(config);
    holder.start()?;
    Ok(Arc::new(holder))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_from_config() {
        let engine =
            engine_from_config(FakeDnsConfig::new().with_ip_pool("198.18.0.0/16")).unwrap();

        let ips = engine.get_fake_ip_for_domain("example.com").unwrap();
        assert_eq!(ips.len(), 1);
        assert!(engine.is_fake_ip(ips[0]));
        assert_eq!(
            engine.get_domain_from_fake_ip(ips[0]),
            Some("example.com".to_string())
        );
    }

    #[test]
    fn test_engine_from_config_rejects_bad_config() {
        let result = engine_from_config(
            FakeDnsConfig::new()
                .with_ip_pool("240.0.0.0/30")
                .with_lru_size(4),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_engine_is_object_safe() {
        fn wire(engine: &dyn FakeDnsEngine) -> Option<String> {
            let ips = engine.get_fake_ip_for_domain("dyn.example").ok()?;
            engine.get_domain_from_fake_ip(ips[0])
        }

        let holder = FakeDnsHolder::with_defaults().unwrap();
        assert_eq!(wire(&holder), Some("dyn.example".to_string()));
    }
}

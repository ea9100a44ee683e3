//! Fake-IP address pool and allocation cursor
//!
//! The pool is carved once out of a configured CIDR block and is immutable
//! afterwards; it answers range-membership queries and sizes the capacity
//! check. The cursor walks the pool one address at a time and wraps back to
//! the pool base when an increment would leave the range.

use std::net::Ipv4Addr;

use ipnet::Ipv4Net;

use crate::error::ConfigError;

/// IPv4 address pool derived from a CIDR block
#[derive(Debug, Clone, Copy)]
pub struct Ipv4Pool {
    /// The network range for membership testing
    network: Ipv4Net,
    /// First address of the block
    base: Ipv4Addr,
}

impl Ipv4Pool {
    /// Parse a pool from a CIDR string (e.g. `"240.0.0.0/8"`)
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidCidr` if the string is not a valid
    /// IPv4 CIDR.
    pub fn parse(cidr: &str) -> Result<Self, ConfigError> {
        let network: Ipv4Net = cidr
            .parse()
            .map_err(|e: ipnet::AddrParseError| ConfigError::invalid_cidr(cidr, e.to_string()))?;
        Ok(Self {
            network,
            base: network.network(),
        })
    }

    /// First address of the block
    #[must_use]
    pub fn base(&self) -> Ipv4Addr {
        self.base
    }

    /// The network range
    #[must_use]
    pub fn network(&self) -> Ipv4Net {
        self.network
    }

    /// Check if an address is within this pool's range
    #[must_use]
    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        self.network.contains(&addr)
    }

    /// Number of host bits in the block
    #[must_use]
    pub fn rooms(&self) -> u8 {
        32 - self.network.prefix_len()
    }

    /// Total number of addresses in the pool
    #[must_use]
    pub fn size(&self) -> u64 {
        1u64 << self.rooms()
    }

    /// Check that a cache of `lru_size` entries fits strictly inside the
    /// pool, so the allocation walk always has at least one free address
    ///
    /// The requirement is `log2(lru_size) < rooms`, evaluated in exact
    /// integer form as `lru_size < 2^rooms`.
    ///
    /// # Errors
    /// Returns `ConfigError::ZeroCacheSize` for an empty cache and
    /// `ConfigError::CapacityExceedsPool` when the capacity does not fit.
    pub fn check_capacity(&self, lru_size: usize) -> Result<(), ConfigError> {
        if lru_size == 0 {
            return Err(ConfigError::ZeroCacheSize);
        }
        if lru_size as u64 >= self.size() {
            return Err(ConfigError::CapacityExceedsPool {
                lru_size,
                rooms: self.rooms(),
            });
        }
        Ok(())
    }
}

/// Allocation cursor pointing at the next candidate address
///
/// Mutated only by the holder during allocation attempts; always inside
/// the pool range it was created from.
#[derive(Debug, Clone, Copy)]
pub struct AddressCursor {
    pos: u32,
}

impl AddressCursor {
    /// Create a cursor at the pool's base address
    #[must_use]
    pub fn new(pool: &Ipv4Pool) -> Self {
        Self {
            pos: u32::from(pool.base()),
        }
    }

    /// Address the cursor currently points at
    #[must_use]
    pub fn current(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.pos)
    }

    /// Step to the next candidate, wrapping to the pool base when the
    /// increment leaves the range
    pub fn advance(&mut self, pool: &Ipv4Pool) {
        let next = self.pos.wrapping_add(1);
        if pool.contains(Ipv4Addr::from(next)) {
            self.pos = next;
        } else {
            self.pos = u32::from(pool.base());
        }
    }
}

//! Fake-DNS holder: the allocator aggregate
//!
//! The holder owns the address pool, the allocation cursor and the bounded
//! bidirectional cache, and guards all three behind a single mutex so the
//! whole allocate-or-lookup sequence is one atomic unit. Two concurrent
//! allocations can therefore never pass the reverse-lookup check for the
//! same candidate address, and a reverse lookup always observes a
//! consistent forward/reverse snapshot.
//!
//! Lifecycle: a holder is created from configuration in an inactive state,
//! activated by [`FakeDnsHolder::start`], and torn down by
//! [`FakeDnsHolder::close`], which releases all owned state. A closed
//! holder fails allocation fast until it is started again.

use std::net::{IpAddr, Ipv4Addr};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::cache::BidiLruCache;
use crate::config::FakeDnsConfig;
use crate::error::{ConfigError, EngineError, FakeDnsError};
use crate::pool::{AddressCursor, Ipv4Pool};

/// Counters for holder activity
#[derive(Debug, Default)]
pub struct HolderStats {
    /// Fresh fake-address allocations
    pub allocations: AtomicU64,
    /// Forward lookups answered from the cache
    pub cache_hits: AtomicU64,
    /// Forward lookups that required an allocation
    pub cache_misses: AtomicU64,
    /// Mappings evicted to stay within capacity
    pub evictions: AtomicU64,
    /// Reverse (address to domain) lookups
    pub reverse_lookups: AtomicU64,
}

impl HolderStats {
    /// Get a snapshot of current stats
    #[must_use]
    pub fn snapshot(&self) -> HolderStatsSnapshot {
        HolderStatsSnapshot {
            allocations: self.allocations.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            reverse_lookups: self.reverse_lookups.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of holder statistics
#[derive(Debug, Clone, Copy)]
pub struct HolderStatsSnapshot {
    /// Fresh fake-address allocations
    pub allocations: u64,
    /// Forward lookups answered from the cache
    pub cache_hits: u64,
    /// Forward lookups that required an allocation
    pub cache_misses: u64,
    /// Mappings evicted to stay within capacity
    pub evictions: u64,
    /// Reverse lookups
    pub reverse_lookups: u64,
}

/// State owned exclusively by an active holder
#[derive(Debug)]
struct PoolState {
    pool: Ipv4Pool,
    cursor: AddressCursor,
    cache: BidiLruCache<String, Ipv4Addr>,
}

/// Fake-DNS allocator
///
/// Hands out synthetic IPv4 addresses from the configured pool and keeps
/// the domain/address mapping bijective in both directions.
#[derive(Debug)]
pub struct FakeDnsHolder {
    config: FakeDnsConfig,
    state: Mutex<Option<PoolState>>,
    stats: HolderStats,
}

impl FakeDnsHolder {
    /// Create a holder from configuration; it stays inactive until
    /// [`FakeDnsHolder::start`] is called
    #[must_use]
    pub fn new(config: FakeDnsConfig) -> Self {
        Self {
            config,
            state: Mutex::new(None),
            stats: HolderStats::default(),
        }
    }

    /// Create and start a holder with the default pool and cache size
    ///
    /// # Errors
    /// Returns `ConfigError` if the defaults fail validation.
    pub fn with_defaults() -> Result<Self, FakeDnsError> {
        let holder = Self::new(FakeDnsConfig::default());
        holder.start()?;
        Ok(holder)
    }

    /// The configuration this holder was created from
    #[must_use]
    pub fn config(&self) -> &FakeDnsConfig {
        &self.config
    }

    /// Initialize the pool, cursor and cache from configuration
    ///
    /// Starting an already-active holder re-initializes it with an empty
    /// cache, as does starting again after [`FakeDnsHolder::close`].
    ///
    /// # Errors
    /// Returns `ConfigError` if the CIDR is invalid or the cache capacity
    /// does not fit the pool. On error the holder stays inactive with no
    /// partial state.
    pub fn start(&self) -> Result<(), FakeDnsError> {
        let pool = Ipv4Pool::parse(&self.config.ip_pool)?;
        pool.check_capacity(self.config.lru_size)?;
        let capacity =
            NonZeroUsize::new(self.config.lru_size).ok_or(ConfigError::ZeroCacheSize)?;

        let mut state = self.state.lock();
        *state = Some(PoolState {
            pool,
            cursor: AddressCursor::new(&pool),
            cache: BidiLruCache::new(capacity),
        });
        debug!(
            "fakedns holder started: pool {} ({} addresses), capacity {}",
            pool.network(),
            pool.size(),
            self.config.lru_size
        );
        Ok(())
    }

    /// Release all owned state
    ///
    /// Acquires the same mutex as the runtime operations, so no lookup or
    /// allocation can be in flight while state is torn down. The holder
    /// requires [`FakeDnsHolder::start`] before reuse.
    pub fn close(&self) {
        let mut state = self.state.lock();
        if state.take().is_some() {
            debug!("fakedns holder closed");
        }
    }

    /// Whether the holder is active
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state.lock().is_some()
    }

    /// Resolve or allocate the fake address for a domain
    ///
    /// A cached mapping is returned as-is and refreshed as most-recently
    /// used. Otherwise the cursor walks the pool, skipping addresses that
    /// still have a live reverse mapping, and the accepted candidate is
    /// inserted, evicting the least-recently-used mapping when the cache
    /// is full. The result is a single-element list to match the
    /// multi-address DNS answer convention.
    ///
    /// # Errors
    /// Returns `EngineError::NotActive` if called before `start` or after
    /// `close`, and `EngineError::PoolExhausted` if the walk visits the
    /// whole pool without finding a free address (unreachable while the
    /// capacity invariant holds).
    pub fn get_fake_ip_for_domain(&self, domain: &str) -> Result<Vec<IpAddr>, FakeDnsError> {
        let mut guard = self.state.lock();
        let state = guard.as_mut().ok_or(EngineError::NotActive)?;

        if let Some(ip) = state.cache.get(domain) {
            self.stats.cache_hits.fetch_add(1, Ordering::Relaxed);
            trace!("fakedns cache hit: {} -> {}", domain, ip);
            return Ok(vec![IpAddr::V4(ip)]);
        }
        self.stats.cache_misses.fetch_add(1, Ordering::Relaxed);

        let max_attempts = state.pool.size();
        let mut attempts = 0u64;
        let candidate = loop {
            if attempts >= max_attempts {
                warn!(
                    "fakedns pool exhausted for domain {} after {} attempts",
                    domain, attempts
                );
                return Err(EngineError::PoolExhausted { attempts }.into());
            }
            attempts += 1;

            let candidate = state.cursor.current();
            state.cursor.advance(&state.pool);

            // The cursor may lap into addresses still held by live
            // mappings; skip those.
            if state.cache.reverse_lookup(&candidate).is_none() {
                break candidate;
            }
        };

        if let Some((evicted_domain, evicted_ip)) = state.cache.put(domain.to_string(), candidate)
        {
            self.stats.evictions.fetch_add(1, Ordering::Relaxed);
            trace!("fakedns evicted: {} -> {}", evicted_domain, evicted_ip);
        }
        self.stats.allocations.fetch_add(1, Ordering::Relaxed);
        trace!("fakedns allocated: {} -> {}", domain, candidate);
        Ok(vec![IpAddr::V4(candidate)])
    }

    /// Map a fake address back to the domain that owns it
    ///
    /// Addresses that are not IPv4 or fall outside the configured pool can
    /// never have been issued here and short-circuit to `None` without
    /// touching the cache. The lookup does not affect recency ordering. A
    /// holder that is not active owns no pool and returns `None`.
    #[must_use]
    pub fn get_domain_from_fake_ip(&self, ip: IpAddr) -> Option<String> {
        let IpAddr::V4(ipv4) = ip else {
            return None;
        };
        let guard = self.state.lock();
        let state = guard.as_ref()?;
        if !state.pool.contains(ipv4) {
            return None;
        }
        self.stats.reverse_lookups.fetch_add(1, Ordering::Relaxed);
        state.cache.reverse_lookup(&ipv4).cloned()
    }

    /// Whether an address belongs to the configured fake pool
    #[must_use]
    pub fn is_fake_ip(&self, ip: IpAddr) -> bool {
        let IpAddr::V4(ipv4) = ip else {
            return false;
        };
        self.state
            .lock()
            .as_ref()
            .is_some_and(|state| state.pool.contains(ipv4))
    }

    /// Number of live domain mappings
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().as_ref().map_or(0, |state| state.cache.len())
    }

    /// Check if no mappings are live
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get a snapshot of holder statistics
    #[must_use]
    pub fn stats(&self) -> HolderStatsSnapshot {
        self.stats.snapshot()
    }
}

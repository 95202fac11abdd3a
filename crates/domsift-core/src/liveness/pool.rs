//! DNS endpoint pool with uniform random selection

use crate::error::{Error, Result};
use rand::Rng;
use std::collections::HashSet;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Port assumed when an endpoint omits one
pub const DEFAULT_DNS_PORT: u16 = 53;

/// Resolver used when no endpoints are configured
pub const FALLBACK_RESOLVER: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8)), DEFAULT_DNS_PORT);

/// A non-empty set of DNS endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverPool {
    endpoints: Vec<SocketAddr>,
}

impl ResolverPool {
    /// Build a pool from already parsed endpoints.
    ///
    /// Repeats are dropped (first occurrence wins) so every distinct
    /// endpoint is equally likely. An empty input yields the single
    /// [`FALLBACK_RESOLVER`].
    pub fn new(endpoints: Vec<SocketAddr>) -> Self {
        if endpoints.is_empty() {
            return Self::default();
        }
        let mut seen = HashSet::with_capacity(endpoints.len());
        let endpoints = endpoints.into_iter().filter(|ep| seen.insert(*ep)).collect();
        Self { endpoints }
    }

    /// Parse `ip:port`, `[ipv6]:port` or bare IP endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEndpoint`] for anything that is not an IP
    /// literal with an optional port. Host names are rejected so the pool
    /// never depends on a resolver to find its resolvers.
    pub fn parse<S: AsRef<str>>(endpoints: &[S]) -> Result<Self> {
        let parsed = endpoints
            .iter()
            .map(|e| parse_endpoint(e.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(parsed))
    }

    /// Pick one endpoint uniformly at random
    pub fn pick(&self) -> SocketAddr {
        let idx = rand::thread_rng().gen_range(0..self.endpoints.len());
        self.endpoints[idx]
    }

    /// All endpoints in configuration order
    pub fn endpoints(&self) -> &[SocketAddr] {
        &self.endpoints
    }

    /// Number of endpoints (never zero)
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Always `false`; present for API symmetry
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

impl Default for ResolverPool {
    fn default() -> Self {
        Self {
            endpoints: vec![FALLBACK_RESOLVER],
        }
    }
}

impl fmt::Display for ResolverPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, ep) in self.endpoints.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{ep}")?;
        }
        Ok(())
    }
}

/// Parse a single endpoint
///
/// # Errors
///
/// Returns [`Error::InvalidEndpoint`] when `s` is not an IP literal.
pub fn parse_endpoint(s: &str) -> Result<SocketAddr> {
    let s = s.trim();
    if let Ok(addr) = s.parse::<SocketAddr>() {
        return Ok(addr);
    }
    if let Ok(ip) = s.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, DEFAULT_DNS_PORT));
    }
    if s.is_empty() {
        return Err(Error::invalid_endpoint(s, "empty"));
    }
    Err(Error::invalid_endpoint(
        s,
        "expected an IP address with optional port",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        assert_eq!(parse_endpoint("1.1.1.1:5353").unwrap().port(), 5353);
        assert_eq!(
            parse_endpoint("9.9.9.9").unwrap(),
            "9.9.9.9:53".parse().unwrap()
        );
        assert_eq!(parse_endpoint("[2606:4700::1111]:53").unwrap().port(), 53);
        assert_eq!(parse_endpoint("2606:4700::1111").unwrap().port(), 53);
    }

    #[test]
    fn test_parse_rejects_hostnames() {
        assert!(matches!(
            parse_endpoint("dns.google:53"),
            Err(Error::InvalidEndpoint { .. })
        ));
        assert!(parse_endpoint("").is_err());
        assert!(ResolverPool::parse(&["8.8.8.8", "nope"]).is_err());
    }

    #[test]
    fn test_empty_falls_back() {
        let pool = ResolverPool::parse::<&str>(&[]).unwrap();
        assert_eq!(pool.endpoints(), &[FALLBACK_RESOLVER]);
        assert!(!pool.is_empty());
    }

    #[test]
    fn test_pick_stays_in_pool() {
        let pool = ResolverPool::parse(&["1.1.1.1", "8.8.4.4:53", "9.9.9.9"]).unwrap();
        for _ in 0..100 {
            assert!(pool.endpoints().contains(&pool.pick()));
        }
    }

    #[test]
    fn test_repeats_removed_anywhere() {
        let pool = ResolverPool::parse(&["1.1.1.1", "8.8.8.8", "1.1.1.1:53", "8.8.8.8"]).unwrap();
        assert_eq!(
            pool.endpoints(),
            &["1.1.1.1:53".parse().unwrap(), "8.8.8.8:53".parse().unwrap()]
        );
    }

    #[test]
    fn test_pick_is_roughly_uniform() {
        let pool = ResolverPool::parse(&["1.1.1.1", "8.8.8.8", "1.1.1.1"]).unwrap();
        let first: SocketAddr = "1.1.1.1:53".parse().unwrap();
        let hits = (0..10_000).filter(|_| pool.pick() == first).count();
        assert!((4_000..6_000).contains(&hits), "1.1.1.1 picked {hits} times");
    }

    #[test]
    fn test_display() {
        let pool = ResolverPool::parse(&["1.1.1.1", "9.9.9.9:5353"]).unwrap();
        assert_eq!(pool.to_string(), "1.1.1.1:53, 9.9.9.9:5353");
    }
}

//! hickory-backed DNS probe

use super::{Probe, ResolverPool};
use hickory_resolver::config::{
    NameServerConfig, NameServerConfigGroup, Protocol, ResolverConfig, ResolverOpts,
};
use hickory_resolver::TokioAsyncResolver;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::{debug, trace};

/// Probe that asks one specific upstream per lookup.
///
/// One single-upstream resolver is built per pool endpoint up front, with
/// caching off and a single attempt, so each call maps to exactly one
/// query against the chosen endpoint.
pub struct HickoryProbe {
    resolvers: HashMap<SocketAddr, TokioAsyncResolver>,
    timeout: Duration,
}

impl HickoryProbe {
    /// Build resolvers for every endpoint in `pool`
    pub fn new(pool: &ResolverPool, timeout: Duration) -> Self {
        let resolvers = pool
            .endpoints()
            .iter()
            .map(|&ep| (ep, single_upstream(ep, timeout)))
            .collect();
        debug!(endpoints = pool.len(), ?timeout, "DNS probe ready");
        Self { resolvers, timeout }
    }
}

impl std::fmt::Debug for HickoryProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HickoryProbe")
            .field("endpoints", &self.resolvers.keys().collect::<Vec<_>>())
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn single_upstream(endpoint: SocketAddr, timeout: Duration) -> TokioAsyncResolver {
    let name_server = NameServerConfig {
        socket_addr: endpoint,
        protocol: Protocol::Udp,
        tls_dns_name: None,
        trust_negative_responses: true,
        bind_addr: None,
    };
    let config = ResolverConfig::from_parts(
        None,
        vec![],
        NameServerConfigGroup::from(vec![name_server]),
    );

    let mut opts = ResolverOpts::default();
    opts.timeout = timeout;
    opts.attempts = 1;
    opts.cache_size = 0;

    TokioAsyncResolver::tokio(config, opts)
}

impl Probe for HickoryProbe {
    async fn resolves(&self, domain: &str, endpoint: SocketAddr) -> bool {
        let Some(resolver) = self.resolvers.get(&endpoint) else {
            debug!(%endpoint, "No resolver for endpoint");
            return false;
        };

        // Fully qualified so search domains never apply
        match resolver.lookup_ip(format!("{domain}.")).await {
            Ok(lookup) => !lookup.as_lookup().records().is_empty(),
            Err(e) => {
                trace!(domain, %endpoint, error = %e, "Lookup failed");
                false
            }
        }
    }
}

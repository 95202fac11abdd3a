//! DNS liveness filtering
//!
//! Every candidate gets its own task. A task asks a randomly chosen pool
//! endpoint whether the domain resolves; on any failure it asks one more,
//! freshly chosen endpoint. A record survives if either attempt succeeds.
//! Failure causes (NXDOMAIN, network error, timeout) are not told apart.
//!
//! Concurrency is bounded by a semaphore. Each task pushes its survivor
//! into a shared collector; the filter returns once every task finished.

mod pool;
mod resolver;

pub use pool::{parse_endpoint, ResolverPool, DEFAULT_DNS_PORT, FALLBACK_RESOLVER};
pub use resolver::HickoryProbe;

use crate::record::DomainRecord;
use parking_lot::Mutex;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

/// Attempts per domain: the first plus one retry
pub const MAX_ATTEMPTS: usize = 2;

/// Default number of domains checked at once
pub const DEFAULT_CONCURRENCY: usize = 64;

/// Default per-attempt timeout
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(3);

/// A single resolution attempt against one endpoint
///
/// Implementations return `true` when the endpoint returned at least one
/// A/AAAA/CNAME record for `domain`. Every failure is `false`.
pub trait Probe: Send + Sync + 'static {
    /// Ask `endpoint` whether `domain` resolves
    fn resolves(&self, domain: &str, endpoint: SocketAddr)
        -> impl Future<Output = bool> + Send;
}

/// Concurrent DNS liveness filter
#[derive(Debug)]
pub struct LivenessFilter<P> {
    probe: Arc<P>,
    pool: Arc<ResolverPool>,
    concurrency: usize,
    attempt_timeout: Duration,
}

impl LivenessFilter<HickoryProbe> {
    /// Filter backed by real DNS lookups against `pool`
    pub fn hickory(pool: ResolverPool, attempt_timeout: Duration) -> Self {
        let probe = HickoryProbe::new(&pool, attempt_timeout);
        Self::new(probe, pool).attempt_timeout(attempt_timeout)
    }
}

impl<P: Probe> LivenessFilter<P> {
    /// Create a filter with default concurrency and timeout
    pub fn new(probe: P, pool: ResolverPool) -> Self {
        Self {
            probe: Arc::new(probe),
            pool: Arc::new(pool),
            concurrency: DEFAULT_CONCURRENCY,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }

    /// Set how many domains may be in flight at once (minimum 1)
    #[must_use]
    pub fn concurrency(mut self, limit: usize) -> Self {
        self.concurrency = limit.max(1);
        self
    }

    /// Set the timeout applied to each individual attempt
    #[must_use]
    pub fn attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    /// The endpoint pool in use
    pub fn pool(&self) -> &ResolverPool {
        &self.pool
    }

    /// Check a single domain
    pub async fn is_alive(&self, domain: &str) -> bool {
        check(&*self.probe, &self.pool, self.attempt_timeout, domain).await
    }

    /// Keep the records whose domain resolves, sorted by domain.
    #[instrument(skip_all, fields(records = records.len(), concurrency = self.concurrency))]
    pub async fn filter(&self, records: Vec<DomainRecord>) -> Vec<DomainRecord> {
        let total = records.len();
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let alive = Arc::new(Mutex::new(Vec::with_capacity(total)));
        let mut tasks = JoinSet::new();

        for record in records {
            let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                break;
            };
            let probe = Arc::clone(&self.probe);
            let pool = Arc::clone(&self.pool);
            let alive = Arc::clone(&alive);
            let timeout = self.attempt_timeout;

            tasks.spawn(async move {
                let _permit = permit;
                if check(&*probe, &pool, timeout, record.domain()).await {
                    alive.lock().push(record);
                }
            });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "Liveness task failed");
            }
        }

        let mut alive = std::mem::take(&mut *alive.lock());
        alive.sort_by(|a, b| a.domain().cmp(b.domain()));

        info!(
            checked = total,
            alive = alive.len(),
            dead = total - alive.len(),
            "Liveness check complete"
        );
        alive
    }
}

async fn check<P: Probe>(probe: &P, pool: &ResolverPool, timeout: Duration, domain: &str) -> bool {
    for attempt in 1..=MAX_ATTEMPTS {
        let endpoint = pool.pick();
        let ok = tokio::time::timeout(timeout, probe.resolves(domain, endpoint))
            .await
            .unwrap_or(false);
        if ok {
            return true;
        }
        debug!(domain, %endpoint, attempt, "Attempt failed");
    }
    false
}

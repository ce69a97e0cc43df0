//! Fingerprint Store: shares captured fingerprints between the capture
//! paths (TCP agent, TLS/HTTP2 connection handling) and the query endpoints.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use ahash::RandomState;
use tracing::{info, warn};

use crate::fingerprint::CombinedFingerprint;
use crate::telemetry::Metrics;

/// In-memory map from client address to the latest `CombinedFingerprint`.
///
/// Every write populates both the `ip:port` key and the bare `ip` key so
/// that `/api/*` lookups (which only have the peer IP) and per-connection
/// lookups (which have the full address) both resolve to the same record.
/// Capacity policy is wholesale-clear on overflow, not LRU: this is a
/// short-lived cache, not a database, and traffic rate naturally rotates it.
pub struct FingerprintStore {
    inner: RwLock<HashMap<String, Arc<CombinedFingerprint>, RandomState>>,
    capacity: usize,
    metrics: Option<Arc<Metrics>>,
}

impl FingerprintStore {
    pub fn new(capacity: usize) -> Arc<Self> {
        Self::with_metrics(capacity, None)
    }

    pub fn with_metrics(capacity: usize, metrics: Option<Arc<Metrics>>) -> Arc<Self> {
        Arc::new(FingerprintStore {
            inner: RwLock::new(HashMap::with_hasher(RandomState::new())),
            capacity,
            metrics,
        })
    }

    /// Inserts `fp` under both `{ip}:{port}` and bare `{ip}`. If this push
    /// takes the map over capacity, the whole map is cleared first.
    pub fn insert(&self, ip: &str, port: u16, fp: CombinedFingerprint) {
        let fp = Arc::new(fp);
        let mut map = self.inner.write().expect("fingerprint store lock poisoned");
        let len_before = map.len();
        if map.len() >= self.capacity {
            warn!(capacity = self.capacity, "fingerprint store at capacity, clearing");
            map.clear();
            if let Some(ref m) = self.metrics {
                m.store_overflow_clears_total.add(1, &[]);
                m.store_entries.add(-(len_before as i64), &[]);
            }
        }
        let len_before = map.len();
        map.insert(format!("{ip}:{port}"), fp.clone());
        map.insert(ip.to_string(), fp);
        if let Some(ref m) = self.metrics {
            m.store_entries.add(map.len() as i64 - len_before as i64, &[]);
        }
    }

    /// Readers check `ip:port` first, then fall back to bare `ip` — this is
    /// what lets HTTP/2 keep-alive requests (many requests, one connection)
    /// and initial connection setup both resolve the same record.
    pub fn get(&self, ip: &str, port: Option<u16>) -> Option<Arc<CombinedFingerprint>> {
        let map = self.inner.read().expect("fingerprint store lock poisoned");
        if let Some(port) = port {
            if let Some(fp) = map.get(&format!("{ip}:{port}")) {
                return Some(fp.clone());
            }
        }
        map.get(ip).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().expect("fingerprint store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Spawns the periodic cap-enforcement task described in spec §4.1/§5: even
/// though every write already checks capacity, this catches the case where
/// TCP-only rows (never paired with a TLS connection) accumulate between
/// writes.
pub fn spawn_cap_enforcer(store: Arc<FingerprintStore>, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let len = store.len();
            if len >= store.capacity {
                let mut map = store.inner.write().expect("fingerprint store lock poisoned");
                let len_before = map.len();
                if len_before >= store.capacity {
                    info!(entries = len_before, "periodic cap enforcement clearing fingerprint store");
                    map.clear();
                    if let Some(ref m) = store.metrics {
                        m.store_overflow_clears_total.add(1, &[]);
                        m.store_entries.add(-(len_before as i64), &[]);
                    }
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::tls::TlsFingerprint;

    fn sample_fp() -> CombinedFingerprint {
        CombinedFingerprint::new(TlsFingerprint::default())
    }

    #[test]
    fn insert_populates_both_keys() {
        let store = FingerprintStore::new(10);
        store.insert("10.0.0.1", 443, sample_fp());
        assert!(store.get("10.0.0.1", Some(443)).is_some());
        assert!(store.get("10.0.0.1", None).is_some());
    }

    #[test]
    fn get_falls_back_from_port_key_to_bare_ip() {
        let store = FingerprintStore::new(10);
        store.insert("10.0.0.1", 443, sample_fp());
        assert!(store.get("10.0.0.1", Some(9999)).is_some());
    }

    #[test]
    fn overflow_clears_whole_map() {
        let store = FingerprintStore::new(2);
        store.insert("1.1.1.1", 1, sample_fp());
        store.insert("2.2.2.2", 2, sample_fp());
        assert!(store.len() >= 2);
        store.insert("3.3.3.3", 3, sample_fp());
        assert!(store.get("1.1.1.1", None).is_none());
        assert!(store.get("3.3.3.3", None).is_some());
    }

    #[test]
    fn overflow_clear_increments_store_metrics() {
        let (metrics, registry) = crate::telemetry::init_metrics().expect("metrics init");
        let store = FingerprintStore::with_metrics(2, Some(metrics));
        store.insert("1.1.1.1", 1, sample_fp());
        store.insert("2.2.2.2", 2, sample_fp());
        store.insert("3.3.3.3", 3, sample_fp());

        let families = registry.gather();
        let overflow = families
            .iter()
            .find(|f| f.get_name() == "wireprint_store_overflow_clears_total")
            .expect("store_overflow_clears_total metric registered");
        let value = overflow.get_metric()[0].get_counter().get_value();
        assert!(value >= 1.0);
    }
}

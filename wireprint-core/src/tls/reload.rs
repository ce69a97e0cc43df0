use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use notify::{RecursiveMode, Watcher};
use tokio_rustls::TlsAcceptor;
use tracing::{info, warn};

use crate::config::TlsConfig;
use crate::error::Result;
use crate::tls::acceptor::{build_acceptor, load_certs_and_key};

/// Holds the live `TlsAcceptor`, swapped atomically whenever the certificate
/// or key file on disk changes. Readers (the accept loop) call
/// [`current`](TlsHotReload::current) once per connection.
pub struct TlsHotReload {
    current: Arc<ArcSwap<TlsAcceptor>>,
    _watcher: notify::RecommendedWatcher,
}

impl TlsHotReload {
    pub fn current(&self) -> Arc<TlsAcceptor> {
        self.current.load_full()
    }
}

/// Build the initial acceptor and start a filesystem watcher that rebuilds it
/// whenever the cert or key file changes, debounced by `watch_delay_secs`.
pub fn setup_tls_with_hot_reload(cfg: &TlsConfig) -> Result<TlsHotReload> {
    let certs_keys = load_certs_and_key(cfg)?;
    let acceptor = build_acceptor(&certs_keys, &cfg.alpn)?;
    let current = Arc::new(ArcSwap::from_pointee(acceptor));

    let cert_path = PathBuf::from(&cfg.cert_path);
    let key_path = PathBuf::from(&cfg.key_path);
    let alpn = cfg.alpn.clone();
    let debounce = Duration::from_secs(cfg.watch_delay_secs.max(1));
    let watch_current = current.clone();
    // A single `cp file` typically fires several notify events (CREATE,
    // MODIFY, CLOSE_WRITE); without this, each one would re-read and
    // re-parse the cert/key from disk.
    let last_reload: Mutex<Option<Instant>> = Mutex::new(None);

    let cfg_for_reload = cfg.clone();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        if let Err(e) = res {
            warn!(error = %e, "TLS certificate watcher error");
            return;
        }
        {
            let mut last = last_reload.lock().expect("TLS reload debounce lock poisoned");
            let now = Instant::now();
            if let Some(prev) = *last {
                if now.duration_since(prev) < debounce {
                    return;
                }
            }
            *last = Some(now);
        }

        match load_certs_and_key(&cfg_for_reload).and_then(|ck| build_acceptor(&ck, &alpn)) {
            Ok(new_acceptor) => {
                watch_current.store(Arc::new(new_acceptor));
                info!("TLS certificate reloaded");
            }
            Err(e) => {
                warn!(error = %e, "failed to reload TLS certificate, keeping previous acceptor");
            }
        }
    })
    .map_err(|e| crate::error::CoreError::Tls(format!("failed to start cert watcher: {e}")))?;

    if let Some(parent) = cert_path.parent() {
        let _ = watcher.watch(parent, RecursiveMode::NonRecursive);
    }
    if let Some(parent) = key_path.parent() {
        let _ = watcher.watch(parent, RecursiveMode::NonRecursive);
    }

    Ok(TlsHotReload { current, _watcher: watcher })
}

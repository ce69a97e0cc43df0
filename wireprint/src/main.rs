#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, warn};
use wireprint_core::capture::{CaptureAgent, StubCaptureAgent};
use wireprint_core::config::load_from_path;
use wireprint_core::db::FingerprintDatabase;
use wireprint_core::store::{spawn_cap_enforcer, FingerprintStore};
use wireprint_core::telemetry::{init_metrics, init_tracing_with_otel, start_observability_server};
use wireprint_core::tls::setup_tls_with_hot_reload;

#[derive(Parser, Debug)]
#[command(author, version, about = "Passive multi-layer network fingerprinting engine")]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(long, default_value = "config/wireprint.toml")]
    config: PathBuf,

    /// Overrides `listen`'s port.
    #[arg(long)]
    port: Option<u16>,

    /// Overrides `listen`'s host.
    #[arg(long)]
    host: Option<String>,

    /// Overrides `tls.cert_path`.
    #[arg(long)]
    cert: Option<PathBuf>,

    /// Overrides `tls.key_path`.
    #[arg(long)]
    key: Option<PathBuf>,

    /// Overrides `fingerprint.iface`.
    #[arg(long)]
    iface: Option<String>,

    /// Disables TCP SYN fingerprinting regardless of config/compiled features.
    #[arg(long)]
    disable_tcp: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut config = match load_from_path(&cli.config) {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("failed to load configuration from {}: {err}", cli.config.display());
            std::process::exit(1);
        }
    };

    apply_cli_overrides(&mut config, &cli);

    if let Err(e) = init_tracing_with_otel(
        config.logging.level.clone(),
        config.logging.show_target,
        "warn".to_string(),
    ) {
        eprintln!("failed to initialize tracing: {e}");
    }

    info!(listen = %config.listen, "configuration loaded");
    let config = Arc::new(config);

    let (metrics, registry) = match init_metrics() {
        Ok((metrics, registry)) => (Some(metrics), Some(registry)),
        Err(e) => {
            warn!(error = %e, "failed to initialize metrics, continuing without them");
            (None, None)
        }
    };

    let db_dir = wireprint_core::config::data_dir::resolve(config.fingerprint.data_dir.as_deref());
    let db = Arc::new(FingerprintDatabase::load(&db_dir));
    info!(
        dir = %db_dir.display(),
        ja3_loaded = !db.ja3.is_empty(),
        ja4_loaded = !db.ja4.is_empty(),
        http2_loaded = !db.http2.is_empty(),
        "reference catalogs loaded"
    );

    let store = FingerprintStore::with_metrics(config.fingerprint.store_capacity, metrics.clone());
    spawn_cap_enforcer(store.clone(), Duration::from_secs(60));

    let tls = match setup_tls_with_hot_reload(&config.tls) {
        Ok(t) => Arc::new(t),
        Err(err) => {
            error!(%err, "failed to load TLS certificate material");
            std::process::exit(1);
        }
    };

    let capture: Arc<dyn CaptureAgent> = build_capture_agent(&config);
    capture.start();

    if config.telemetry.enabled {
        if let Some(registry) = registry {
            let db_loaded = Arc::new(AtomicBool::new(
                !db.ja3.is_empty() || !db.ja4.is_empty() || !db.http2.is_empty(),
            ));
            tokio::spawn(start_observability_server(config.telemetry.port, registry, db_loaded));
        }
    }

    let result = wireprint_core::net::run(config, tls, store, db, capture, metrics).await;

    wireprint_core::telemetry::shutdown_tracing();

    match result {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            error!(%err, "listener exited with error");
            std::process::exit(1);
        }
    }
}

fn apply_cli_overrides(config: &mut wireprint_core::config::Config, cli: &Cli) {
    if cli.port.is_some() || cli.host.is_some() {
        let host = cli.host.clone().unwrap_or_else(|| config.listen.ip().to_string());
        let port = cli.port.unwrap_or(config.listen.port());
        match format!("{host}:{port}").parse() {
            Ok(addr) => config.listen = addr,
            Err(e) => warn!(%e, host, port, "ignoring invalid --host/--port override"),
        }
    }
    if let Some(cert) = &cli.cert {
        config.tls.cert_path = cert.display().to_string();
    }
    if let Some(key) = &cli.key {
        config.tls.key_path = key.display().to_string();
    }
    if let Some(iface) = &cli.iface {
        config.fingerprint.iface = Some(iface.clone());
    }
    if cli.disable_tcp {
        config.fingerprint.tcp_enabled = false;
    }
}

#[cfg(all(target_os = "linux", feature = "ebpf-tcp"))]
fn build_capture_agent(config: &wireprint_core::config::Config) -> Arc<dyn CaptureAgent> {
    if !config.fingerprint.tcp_enabled {
        return Arc::new(StubCaptureAgent::disabled());
    }
    match wireprint_capture::LiveCaptureAgent::new(config.fingerprint.iface.as_deref(), config.listen.port()) {
        Ok(agent) => Arc::new(agent),
        Err(err) => {
            warn!(%err, "failed to start eBPF/XDP TCP capture, falling back to stub");
            Arc::new(StubCaptureAgent::unavailable())
        }
    }
}

#[cfg(not(all(target_os = "linux", feature = "ebpf-tcp")))]
fn build_capture_agent(_config: &wireprint_core::config::Config) -> Arc<dyn CaptureAgent> {
    Arc::new(StubCaptureAgent::not_compiled())
}

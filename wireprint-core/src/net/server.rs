//! Connection Multiplexer (spec §4.3): accept loop, ClientHello capture,
//! transparent TLS handshake via [`crate::net::replay::ReplayStream`], and
//! ALPN-based dispatch to the HTTP/1.1-or-HTTP/2 query endpoints.
//!
//! Grounded in the teacher's `proxy::server::run` — same `tokio::select!`
//! shape over signal handlers and `listener.accept()`, same
//! `ConnectionGuard`/graceful-drain sequence on shutdown.

use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use http_body_util::combinators::BoxBody;
use hyper::body::{Bytes, Incoming};
use hyper::Request;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use opentelemetry::KeyValue;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::watch;
use tokio::time::{Duration, Instant};
use tracing::{info, warn};

use crate::capture::CaptureAgent;
use crate::config::Config;
use crate::db::FingerprintDatabase;
use crate::error::Result;
use crate::fingerprint::http2::Http2Fingerprint;
use crate::fingerprint::tls::fingerprint_client_hello;
use crate::fingerprint::CombinedFingerprint;
use crate::net::capture_stream::Http2CapturingStream;
use crate::net::endpoints;
use crate::net::guards::ConnectionGuard;
use crate::net::handshake::read_client_hello_prefix;
use crate::net::replay::ReplayStream;
use crate::store::FingerprintStore;
use crate::telemetry::Metrics;
use crate::tls::TlsHotReload;

type RespBody = BoxBody<Bytes, hyper::Error>;

#[allow(clippy::too_many_arguments)]
pub async fn run(
    config: Arc<Config>,
    tls: Arc<TlsHotReload>,
    store: Arc<FingerprintStore>,
    db: Arc<FingerprintDatabase>,
    capture: Arc<dyn CaptureAgent>,
    metrics: Option<Arc<Metrics>>,
) -> Result<()> {
    let listener = TcpListener::bind(config.listen).await?;
    info!(addr = %config.listen, "fingerprinting listener started");

    let mut builder = ConnBuilder::new(TokioExecutor::new());
    builder.http2().max_concurrent_streams(100).initial_stream_window_size(65535);

    let active_connections = Arc::new(AtomicUsize::new(0));
    let (connections_closed_tx, mut connections_closed_rx) = watch::channel(());

    let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
        .map_err(|e| std::io::Error::other(format!("failed to install SIGTERM handler: {e}")))?;
    let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt())
        .map_err(|e| std::io::Error::other(format!("failed to install SIGINT handler: {e}")))?;

    loop {
        tokio::select! {
            _ = sigterm.recv() => {
                info!("received SIGTERM, initiating graceful shutdown");
                break;
            }
            _ = sigint.recv() => {
                info!("received SIGINT, initiating graceful shutdown");
                break;
            }
            result = listener.accept() => {
                let (stream, peer) = match result {
                    Ok(v) => v,
                    Err(e) => {
                        warn!(error = %e, "accept error");
                        continue;
                    }
                };

                active_connections.fetch_add(1, Ordering::Relaxed);
                if let Some(ref m) = metrics {
                    m.connections_total.add(1, &[]);
                    m.connections_active.add(1, &[]);
                }

                let builder = builder.clone();
                let tls = tls.clone();
                let store = store.clone();
                let db = db.clone();
                let capture = capture.clone();
                let config = config.clone();
                let metrics = metrics.clone();
                let active_connections = active_connections.clone();
                let connections_closed_tx = connections_closed_tx.clone();

                tokio::spawn(async move {
                    let _guard = ConnectionGuard::new(
                        active_connections,
                        connections_closed_tx,
                        metrics.as_ref().map(|m| m.connections_active.clone()),
                    );
                    handle_connection(stream, peer, builder, tls, store, db, capture, config, metrics).await;
                });
            }
        }
    }

    info!(timeout_secs = config.timeout.shutdown_secs, "waiting for in-flight connections to drain");
    let deadline = Instant::now() + Duration::from_secs(config.timeout.shutdown_secs);
    tokio::select! {
        _ = connections_closed_rx.changed() => {
            info!("all connections closed, shutdown complete");
        }
        _ = tokio::time::sleep_until(deadline) => {
            let remaining = active_connections.load(Ordering::Relaxed);
            if remaining > 0 {
                warn!(remaining, "shutdown timeout reached with connections still active");
            }
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn handle_connection(
    mut stream: tokio::net::TcpStream,
    peer: std::net::SocketAddr,
    builder: ConnBuilder<TokioExecutor>,
    tls: Arc<TlsHotReload>,
    store: Arc<FingerprintStore>,
    db: Arc<FingerprintDatabase>,
    capture: Arc<dyn CaptureAgent>,
    config: Arc<Config>,
    metrics: Option<Arc<Metrics>>,
) {
    let peer_ip = peer.ip().to_string();
    let peer_port = peer.port();

    let first_read_deadline = Duration::from_secs(config.timeout.first_read_secs);
    let prefix = match read_client_hello_prefix(&mut stream, first_read_deadline).await {
        Ok(p) => p,
        Err(e) => {
            warn!(peer = %peer, error = %e, "failed to read ClientHello prefix");
            if let Some(ref m) = metrics {
                m.tls_fingerprint_failures_total.add(1, &[]);
            }
            return;
        }
    };

    let start = Instant::now();
    let tls_fp = match fingerprint_client_hello(&prefix) {
        Ok(fp) => fp,
        Err(e) => {
            warn!(peer = %peer, error = %e, "malformed ClientHello, dropping connection");
            if let Some(ref m) = metrics {
                m.tls_fingerprint_failures_total.add(1, &[]);
            }
            return;
        }
    };
    if let Some(ref m) = metrics {
        m.tls_fingerprints_extracted_total.add(1, &[]);
        m.tls_fingerprint_extraction_duration_seconds.record(start.elapsed().as_secs_f64(), &[]);
    }

    let tcp_fp = capture.lookup(&peer_ip, peer_port);
    if let Some(ref m) = metrics {
        if tcp_fp.is_some() {
            m.tcp_fingerprints_captured_total.add(1, &[]);
        }
    }

    let replayed = ReplayStream::new(prefix, stream);
    let acceptor = tls.current();
    let tls_stream = match acceptor.accept(replayed).await {
        Ok(s) => s,
        Err(e) => {
            warn!(peer = %peer, error = %e, "TLS handshake failed");
            if let Some(ref m) = metrics {
                m.errors_total.add(1, &[KeyValue::new("error_type", "tls_handshake")]);
            }
            return;
        }
    };

    let is_h2 = tls_stream.get_ref().1.alpn_protocol() == Some(b"h2");

    if is_h2 && config.fingerprint.http2_enabled {
        let (tx, rx) = watch::channel(None::<Http2Fingerprint>);
        let (capturing, _extracted) =
            Http2CapturingStream::new(tls_stream, config.fingerprint.max_capture, tx, metrics.clone());

        let svc = make_service(
            store.clone(),
            db.clone(),
            peer_ip.clone(),
            Some(peer_port),
            tls_fp.clone(),
            tcp_fp.clone(),
            Some(rx),
            metrics.clone(),
        );

        if let Err(e) = builder.serve_connection(TokioIo::new(capturing), svc).await {
            warn!(peer = %peer, error = %e, "serve_connection error");
        }
    } else {
        let combined = CombinedFingerprint::new(tls_fp.clone());
        let combined = match tcp_fp.clone() {
            Some(t) => combined.with_tcp(t),
            None => combined,
        };
        store.insert(&peer_ip, peer_port, combined);

        let svc = make_service(
            store.clone(),
            db.clone(),
            peer_ip.clone(),
            Some(peer_port),
            tls_fp,
            tcp_fp,
            None,
            metrics.clone(),
        );

        if let Err(e) = builder.serve_connection(TokioIo::new(tls_stream), svc).await {
            warn!(peer = %peer, error = %e, "serve_connection error");
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn make_service(
    store: Arc<FingerprintStore>,
    db: Arc<FingerprintDatabase>,
    client_ip: String,
    client_port: Option<u16>,
    tls_fp: crate::fingerprint::tls::TlsFingerprint,
    tcp_fp: Option<crate::fingerprint::tcp::TcpFingerprint>,
    http2_rx: Option<watch::Receiver<Option<Http2Fingerprint>>>,
    metrics: Option<Arc<Metrics>>,
) -> impl hyper::service::Service<
    Request<Incoming>,
    Response = hyper::Response<RespBody>,
    Error = Infallible,
    Future = impl Send,
> + Clone {
    hyper::service::service_fn(move |req: Request<Incoming>| {
        let store = store.clone();
        let db = db.clone();
        let client_ip = client_ip.clone();
        let tls_fp = tls_fp.clone();
        let tcp_fp = tcp_fp.clone();
        let http2_rx = http2_rx.clone();
        let metrics = metrics.clone();

        async move {
            let mut combined = CombinedFingerprint::new(tls_fp);
            if let Some(ref t) = tcp_fp {
                combined = combined.with_tcp(t.clone());
            }
            if let Some(ref rx) = http2_rx {
                if let Some(h2) = rx.borrow().clone() {
                    combined = combined.with_http2(h2);
                }
            }
            store.insert(&client_ip, client_port.unwrap_or(0), combined);

            let path = req.uri().path().to_string();
            let query = req.uri().query().map(|q| q.to_string());
            let user_agent = req
                .headers()
                .get(hyper::header::USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string());

            if path == "/api/analysis" {
                if let Some(ref m) = metrics {
                    m.analysis_requests_total.add(1, &[]);
                }
            }

            let result = endpoints::route(
                &path,
                &store,
                &db,
                &client_ip,
                client_port,
                user_agent.as_deref(),
                query.as_deref(),
            );

            match result {
                Ok(resp) => {
                    if let Some(ref m) = metrics {
                        m.requests_total
                            .add(1, &[KeyValue::new("status_code", resp.status().as_u16().to_string())]);
                    }
                    Ok::<_, Infallible>(resp)
                }
                Err(e) => {
                    tracing::error!(error = %e, "query endpoint error");
                    if let Some(ref m) = metrics {
                        m.errors_total.add(1, &[KeyValue::new("error_type", "endpoint")]);
                    }
                    let body = http_body_util::Full::new(Bytes::from("internal error"))
                        .map_err(|never: Infallible| match never {})
                        .boxed();
                    let mut resp = hyper::Response::new(body);
                    *resp.status_mut() = hyper::StatusCode::INTERNAL_SERVER_ERROR;
                    Ok(resp)
                }
            }
        }
    })
}

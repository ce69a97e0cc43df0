use std::sync::Arc;

use rustls_pki_types::pem::PemObject;
use rustls_pki_types::{CertificateDer, PrivateKeyDer};
use tokio_rustls::rustls::ServerConfig;
use tokio_rustls::TlsAcceptor;

use crate::config::TlsConfig;
use crate::error::{CoreError, Result};

/// Loaded certificate chain and private key, kept around so the acceptor can
/// be rebuilt on hot reload without re-reading the files.
#[derive(Clone)]
pub struct ServerCertsKeys {
    pub certs: Vec<CertificateDer<'static>>,
    pub key: Arc<PrivateKeyDer<'static>>,
}

pub fn load_certs_and_key(cfg: &TlsConfig) -> Result<ServerCertsKeys> {
    let cert_bytes = std::fs::read(&cfg.cert_path)
        .map_err(|e| CoreError::Tls(format!("unable to read certificate file: {e}")))?;
    let certs: Vec<CertificateDer<'static>> = CertificateDer::pem_slice_iter(&cert_bytes)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| CoreError::Tls(format!("unable to parse certificate chain: {e}")))?;
    if certs.is_empty() {
        return Err(CoreError::Tls("no certificates found in cert_path".to_string()));
    }

    let key_bytes = std::fs::read(&cfg.key_path)
        .map_err(|e| CoreError::Tls(format!("unable to read key file: {e}")))?;
    let mut keys: Vec<PrivateKeyDer<'static>> = PrivateKeyDer::pem_slice_iter(&key_bytes)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| CoreError::Tls(format!("unable to parse private key: {e}")))?;
    let key = keys.pop().ok_or(CoreError::NoPrivateKey)?;

    Ok(ServerCertsKeys { certs, key: Arc::new(key) })
}

/// Build a `rustls` server config / acceptor from loaded cert material, with
/// the ALPN order the Connection Multiplexer requires (`h2`, `http/1.1`) and
/// a TLS 1.2 floor.
pub fn build_acceptor(certs_keys: &ServerCertsKeys, alpn: &[String]) -> Result<TlsAcceptor> {
    let mut server = ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(certs_keys.certs.clone(), certs_keys.key.clone_key())
        .map_err(|e| CoreError::Tls(format!("failed to build TLS server config: {e}")))?;

    server.alpn_protocols = if alpn.is_empty() {
        vec![b"h2".to_vec(), b"http/1.1".to_vec()]
    } else {
        alpn.iter().map(|s| s.as_bytes().to_vec()).collect()
    };

    Ok(TlsAcceptor::from(Arc::new(server)))
}

pub fn build_rustls(cfg: &TlsConfig) -> Result<TlsAcceptor> {
    let certs_keys = load_certs_and_key(cfg)?;
    build_acceptor(&certs_keys, &cfg.alpn)
}

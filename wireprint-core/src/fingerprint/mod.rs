pub mod http2;
pub mod tcp;
pub mod tls;

use serde::Serialize;

pub use http2::Http2Fingerprint;
pub use tcp::TcpFingerprint;
pub use tls::TlsFingerprint;

/// Everything captured for one connection, merged across the three
/// independently-parsed layers. `http2`/`tcp` are absent when that layer's
/// capture never completed (HTTP/1.1 negotiated, or no TCP capture agent).
#[derive(Debug, Clone, Serialize)]
pub struct CombinedFingerprint {
    pub tls: TlsFingerprint,
    pub http2: Option<Http2Fingerprint>,
    pub tcp: Option<TcpFingerprint>,
}

impl CombinedFingerprint {
    pub fn new(tls: TlsFingerprint) -> Self {
        CombinedFingerprint { tls, http2: None, tcp: None }
    }

    pub fn with_http2(mut self, http2: Http2Fingerprint) -> Self {
        self.http2 = Some(http2);
        self
    }

    pub fn with_tcp(mut self, tcp: TcpFingerprint) -> Self {
        self.tcp = Some(tcp);
        self
    }
}

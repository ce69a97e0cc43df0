use serde::Deserialize;

/// Fingerprinting feature toggles.
#[derive(Debug, Deserialize, Clone)]
pub struct FingerprintConfig {
    /// Enable TLS fingerprinting (JA3/JA4).
    /// Default: true
    #[serde(default = "default_true")]
    pub tls_enabled: bool,
    /// Enable HTTP/2 fingerprinting (Akamai).
    /// Only has an effect for connections that negotiate `h2` via ALPN.
    /// Default: true
    #[serde(default = "default_true")]
    pub http2_enabled: bool,
    /// Enable TCP SYN fingerprinting via eBPF/XDP (p0f-style raw signature).
    /// Requires the `ebpf-tcp` Cargo feature; when false the capture agent
    /// is never started even if the feature is compiled in.
    /// Default: false
    #[serde(default)]
    pub tcp_enabled: bool,
    /// Maximum bytes to buffer while looking for the HTTP/2 preface and
    /// initial control frames.
    /// Default: 65536 (64 KiB)
    #[serde(default = "default_max_capture")]
    pub max_capture: usize,
    /// Network interface for eBPF TCP SYN capture (e.g. "eth0"). Empty means
    /// auto-detect all non-loopback interfaces with addresses, plus loopback.
    #[serde(default)]
    pub iface: Option<String>,
    /// Hard cap on the number of entries the fingerprint store retains
    /// before it is wholesale-cleared.
    /// Default: 10000
    #[serde(default = "default_store_capacity")]
    pub store_capacity: usize,
    /// Directory containing the JA3/JA4/HTTP2 reference catalogs. When
    /// unset, resolved at startup per the executable/cwd/fallback order.
    #[serde(default)]
    pub data_dir: Option<String>,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            tls_enabled: default_true(),
            http2_enabled: default_true(),
            tcp_enabled: false,
            max_capture: default_max_capture(),
            iface: None,
            store_capacity: default_store_capacity(),
            data_dir: None,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_capture() -> usize {
    64 * 1024
}

fn default_store_capacity() -> usize {
    10_000
}

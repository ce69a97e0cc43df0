use serde::Deserialize;

/// TLS listener configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct TlsConfig {
    /// Path to the TLS certificate file (PEM format).
    pub cert_path: String,
    /// Path to the TLS private key file (PEM format).
    pub key_path: String,
    /// ALPN protocols advertised by the listener.
    /// Default: ["h2", "http/1.1"], per the Connection Multiplexer contract.
    #[serde(default = "default_alpn")]
    pub alpn: Vec<String>,
    /// Certificate watch delay in seconds for hot reload.
    #[serde(default = "default_watch_delay_secs")]
    pub watch_delay_secs: u64,
}

fn default_alpn() -> Vec<String> {
    vec!["h2".to_string(), "http/1.1".to_string()]
}

fn default_watch_delay_secs() -> u64 {
    60
}

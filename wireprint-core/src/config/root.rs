use serde::Deserialize;
use std::net::SocketAddr;

use super::fingerprint::FingerprintConfig;
use super::telemetry::{LoggingConfig, TelemetryConfig};
use super::timeout::TimeoutConfig;
use super::tls::TlsConfig;

/// Root configuration structure, loaded from a TOML file and overlaid with
/// CLI flags.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Address and port the fingerprinting listener binds to.
    /// Example: "0.0.0.0:8443"
    pub listen: SocketAddr,
    /// TLS certificate and key paths for the fingerprinting listener.
    /// Required: this system only ever speaks TCP + TLS.
    pub tls: TlsConfig,
    /// Fingerprinting feature toggles and store/catalog settings.
    #[serde(default)]
    pub fingerprint: FingerprintConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Timeout configuration.
    #[serde(default)]
    pub timeout: TimeoutConfig,
    /// Observability server (metrics/health) configuration.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

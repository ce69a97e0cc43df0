use serde::Deserialize;

/// Logging configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Log level passed to `tracing_subscriber::EnvFilter` unless `RUST_LOG`
    /// is set in the environment (which always wins).
    /// Default: "info"
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Include the tracing target (module path) in log lines.
    /// Default: false
    #[serde(default)]
    pub show_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), show_target: false }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Observability server configuration (metrics + health checks).
#[derive(Debug, Deserialize, Clone)]
pub struct TelemetryConfig {
    /// Port for the dedicated observability listener serving `/metrics`,
    /// `/health`, `/ready`, `/live`.
    /// Default: 9090
    #[serde(default = "default_telemetry_port")]
    pub port: u16,
    /// Enable the observability listener at all.
    /// Default: true
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self { port: default_telemetry_port(), enabled: true }
    }
}

fn default_telemetry_port() -> u16 {
    9090
}

fn default_true() -> bool {
    true
}

use serde::Deserialize;

/// Timeout configuration
#[derive(Debug, Deserialize, Clone)]
pub struct TimeoutConfig {
    /// Deadline for reading the raw bytes of the first TLS record (ClientHello).
    /// Default: 10 seconds, per the Connection Multiplexer contract.
    #[serde(default = "default_first_read_secs")]
    pub first_read_secs: u64,
    /// Deadline for subsequent reads on an already-established connection.
    /// Default: 30 seconds.
    #[serde(default = "default_subsequent_read_secs")]
    pub subsequent_read_secs: u64,
    /// Graceful shutdown timeout in seconds: how long the accept loop waits
    /// for in-flight connections to drain before forcing shutdown.
    /// Default: 30.
    #[serde(default = "default_shutdown_secs")]
    pub shutdown_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            first_read_secs: default_first_read_secs(),
            subsequent_read_secs: default_subsequent_read_secs(),
            shutdown_secs: default_shutdown_secs(),
        }
    }
}

fn default_first_read_secs() -> u64 {
    10
}

fn default_subsequent_read_secs() -> u64 {
    30
}

fn default_shutdown_secs() -> u64 {
    30
}

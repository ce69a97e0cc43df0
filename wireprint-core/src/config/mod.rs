pub mod data_dir;
mod fingerprint;
mod loader;
mod root;
mod telemetry;
mod timeout;
mod tls;

pub use fingerprint::FingerprintConfig;
pub use loader::load_from_path;
pub use root::Config;
pub use telemetry::{LoggingConfig, TelemetryConfig};
pub use timeout::TimeoutConfig;
pub use tls::TlsConfig;

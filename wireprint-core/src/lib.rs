#![forbid(unsafe_code)]

pub mod analyzer;
pub mod capture;
pub mod config;
pub mod db;
pub mod error;
pub mod fingerprint;
pub mod net;
pub mod store;
pub mod telemetry;
pub mod tls;

pub use analyzer::{analyze, no_fingerprint_found, to_simple, AnalysisResult, SimpleAnalysisResult};
pub use capture::{CaptureAgent, StubCaptureAgent};
pub use config::{load_from_path, Config};
pub use db::FingerprintDatabase;
pub use error::{CoreError, Result};
pub use fingerprint::{CombinedFingerprint, Http2Fingerprint, TcpFingerprint, TlsFingerprint};
pub use net::run;
pub use store::FingerprintStore;
pub use tls::{setup_tls_with_hot_reload, TlsHotReload};

use tracing::info;

use crate::capture::CaptureAgent;
use crate::fingerprint::tcp::TcpFingerprint;

/// No-op capture agent for non-Linux targets, `ebpf-tcp` disabled at compile
/// time, or `tcp_enabled = false` in configuration. `lookup` always returns
/// `None`; selecting this path is never treated as an error.
pub struct StubCaptureAgent {
    reason: &'static str,
}

impl StubCaptureAgent {
    pub fn disabled() -> Self {
        StubCaptureAgent { reason: "tcp_enabled = false" }
    }

    pub fn unavailable() -> Self {
        StubCaptureAgent { reason: "eBPF initialization failed" }
    }

    #[allow(dead_code)]
    pub fn not_compiled() -> Self {
        StubCaptureAgent { reason: "built without the ebpf-tcp feature" }
    }
}

impl CaptureAgent for StubCaptureAgent {
    fn lookup(&self, _src_ip: &str, _src_port: u16) -> Option<TcpFingerprint> {
        None
    }

    fn start(&self) {
        info!(reason = self.reason, "TCP SYN fingerprinting disabled");
    }
}

//! TCP Capture Agent capability abstraction (spec §4.1, §9's design note).
//!
//! The `ebpf-tcp`/Linux-only implementation ([`wireprint-capture`]'s
//! `LiveCaptureAgent`) lives in its own crate rather than here, since this
//! crate must stay buildable on every platform: `wireprint-core` only owns
//! the trait and the always-available stub. Selecting the stub is never an
//! error — TCP SYN fingerprinting is an optional signal the rest of the
//! engine already tolerates being absent.

mod stub;

pub use stub::StubCaptureAgent;

use crate::fingerprint::tcp::TcpFingerprint;

/// Capability boundary between the TCP SYN capture backend and the rest of
/// the engine. `lookup` is synchronous: the BPF map read it wraps (on
/// Linux) never blocks on I/O, it's a direct kernel map lookup.
pub trait CaptureAgent: Send + Sync {
    /// Looks up the most recently captured SYN for `src_ip:src_port`, builds
    /// its `TcpFingerprint`, and returns it. `None` means no SYN was
    /// captured for this peer (capture disabled, packet missed, or entry
    /// expired) — never treated as an error by callers.
    fn lookup(&self, src_ip: &str, src_port: u16) -> Option<TcpFingerprint>;

    /// Logs the agent's operating mode once at startup. Never fails.
    fn start(&self);
}
